//! Parameter containers passed between the orchestrator and object models.

use std::collections::BTreeMap;

use crate::error::ModelError;

/// Per-object quantities already drawn by the orchestrator.
///
/// All slices have one entry per object.
#[derive(Clone, Copy, Debug)]
pub struct CommonParams<'a> {
    /// Cosmological redshifts
    pub zcos: &'a [f64],
    /// Right ascensions in radians
    pub ra: &'a [f64],
    /// Declinations in radians
    pub dec: &'a [f64],
}

impl CommonParams<'_> {
    /// Number of objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.zcos.len()
    }

    /// Returns true when there are no objects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.zcos.is_empty()
    }
}

/// Model-wide parameters, identical for every object of a type.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneralParams {
    /// Absolute magnitude after any H0 rescaling
    pub m0: f64,
    /// Coherent magnitude scatter width
    pub sig_m: f64,
    /// Whether the source model flux covariance is used downstream
    pub flux_covariance: bool,
    /// Model-specific coefficients, e.g. SALT `alpha` and `beta`
    pub coefficients: BTreeMap<String, f64>,
}

/// Per-object type-specific parameters as named columns.
///
/// Every column holds exactly one value per object.
///
/// # Example
///
/// ```
/// use popsim_models::params::TypeParams;
///
/// let mut params = TypeParams::with_len(2);
/// params.insert("x1", vec![0.1, -0.4]).unwrap();
/// params.insert("c", vec![0.0, 0.02]).unwrap();
/// assert!(params.insert("bad", vec![1.0]).is_err());
///
/// let row = params.row(1);
/// assert_eq!(row, vec![("c", 0.02), ("x1", -0.4)]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeParams {
    len: usize,
    columns: BTreeMap<String, Vec<f64>>,
}

impl TypeParams {
    /// Creates an empty table for `len` objects.
    pub fn with_len(len: usize) -> Self {
        Self {
            len,
            columns: BTreeMap::new(),
        }
    }

    /// Number of objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true for a table of zero objects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds or replaces a column.
    ///
    /// # Errors
    ///
    /// [`ModelError::ColumnLength`] when `values` is not one per object.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<(), ModelError> {
        let name = name.into();
        if values.len() != self.len {
            return Err(ModelError::ColumnLength {
                name,
                got: values.len(),
                expected: self.len,
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Looks up a column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Values of object `i`, one per column in name order.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn row(&self, i: usize) -> Vec<(&str, f64)> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values[i]))
            .collect()
    }
}

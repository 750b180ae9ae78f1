//! Survey footprint polygon.

use crate::types::FootprintError;

/// Immutable sky-coverage polygon in the (ra, dec) plane.
///
/// Vertices are `(ra, dec)` pairs in radians and the polygon is treated as a
/// planar shape in those coordinates, closed implicitly between the last and
/// first vertex. Membership uses the even-odd rule, so self-intersecting
/// outlines behave like their filled regions under that rule.
///
/// # Example
///
/// ```
/// use popsim_core::sky::Footprint;
///
/// let fp = Footprint::new(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 0.5), (0.0, 0.5)]).unwrap();
/// assert!(fp.contains(0.5, 0.25));
/// assert!(!fp.contains(1.5, 0.25));
/// assert!((fp.area() - 0.5).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")
)]
pub struct Footprint {
    vertices: Vec<(f64, f64)>,
    bounds: [f64; 4],
    area: f64,
}

impl Footprint {
    /// Builds a footprint from its vertices.
    ///
    /// # Errors
    ///
    /// - [`FootprintError::TooFewVertices`] for fewer than three vertices
    /// - [`FootprintError::NonFiniteVertex`] for NaN or infinite coordinates
    /// - [`FootprintError::ZeroArea`] when the outline encloses no area
    pub fn new(vertices: Vec<(f64, f64)>) -> Result<Self, FootprintError> {
        if vertices.len() < 3 {
            return Err(FootprintError::TooFewVertices(vertices.len()));
        }
        if let Some((index, &(ra, dec))) = vertices
            .iter()
            .enumerate()
            .find(|(_, (ra, dec))| !(ra.is_finite() && dec.is_finite()))
        {
            return Err(FootprintError::NonFiniteVertex { index, ra, dec });
        }

        let area = shoelace_area(&vertices);
        if area <= f64::EPSILON {
            return Err(FootprintError::ZeroArea);
        }

        let mut bounds = [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY];
        for &(ra, dec) in &vertices {
            bounds[0] = bounds[0].min(ra);
            bounds[1] = bounds[1].min(dec);
            bounds[2] = bounds[2].max(ra);
            bounds[3] = bounds[3].max(dec);
        }

        Ok(Self {
            vertices,
            bounds,
            area,
        })
    }

    /// Polygon vertices as `(ra, dec)` in radians.
    #[inline]
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Planar area enclosed by the outline, in rad².
    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Bounding box `[ra_min, dec_min, ra_max, dec_max]`.
    #[inline]
    pub fn bounds(&self) -> [f64; 4] {
        self.bounds
    }

    /// Returns true when `(ra, dec)` lies inside the polygon.
    pub fn contains(&self, ra: f64, dec: f64) -> bool {
        let [ra_min, dec_min, ra_max, dec_max] = self.bounds;
        if ra < ra_min || ra > ra_max || dec < dec_min || dec > dec_max {
            return false;
        }

        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.vertices[i];
            let (xj, yj) = self.vertices[j];
            if (yi > dec) != (yj > dec) {
                let x_cross = xi + (dec - yi) * (xj - xi) / (yj - yi);
                if ra < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

impl TryFrom<Vec<[f64; 2]>> for Footprint {
    type Error = FootprintError;

    fn try_from(vertices: Vec<[f64; 2]>) -> Result<Self, Self::Error> {
        Self::new(vertices.into_iter().map(|[ra, dec]| (ra, dec)).collect())
    }
}

impl From<Footprint> for Vec<[f64; 2]> {
    fn from(footprint: Footprint) -> Self {
        footprint
            .vertices
            .into_iter()
            .map(|(ra, dec)| [ra, dec])
            .collect()
    }
}

/// Absolute polygon area by the shoelace formula.
fn shoelace_area(vertices: &[(f64, f64)]) -> f64 {
    let n = vertices.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (x0, y0) = vertices[i];
            let (x1, y1) = vertices[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum();
    0.5 * twice.abs()
}

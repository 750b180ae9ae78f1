//! Shape-parameter distributions.
//!
//! - [`ShapeDistribution`]: configured distribution of a light-curve shape
//!   parameter (Gaussian, asymmetric Gaussian or a named redshift-dependent model)
//! - [`asym_gauss`]: asymmetric Gaussian sampler
//! - [`N21Stretch`]: redshift-dependent two-population stretch model

mod n21;

pub use n21::N21Stretch;

use popsim_core::rng::SimRng;

use crate::error::ModelError;
use crate::header::Header;

/// Draws `n` values from an asymmetric Gaussian.
///
/// All `n` side-selection uniforms are drawn first, then `n` standard
/// normals. A value falls below `mean` with probability
/// `sigma_low / (sigma_low + sigma_high)` and is then `mean − sigma_low·|N|`,
/// otherwise it is `mean + sigma_high·|N|`. Equal sigmas give an ordinary
/// Gaussian.
///
/// # Examples
///
/// ```
/// use popsim_core::rng::SimRng;
/// use popsim_models::distributions::asym_gauss;
///
/// let mut rng = SimRng::from_seed(1);
/// let c = asym_gauss(&mut rng, -0.05, 0.04, 0.1, 1000);
/// assert_eq!(c.len(), 1000);
/// ```
pub fn asym_gauss(
    rng: &mut SimRng,
    mean: f64,
    sigma_low: f64,
    sigma_high: f64,
    n: usize,
) -> Vec<f64> {
    let side = rng.uniform_vec(n);
    let mut magnitude = vec![0.0; n];
    rng.fill_normal(&mut magnitude);

    let threshold = sigma_low / (sigma_high + sigma_low);
    side.iter()
        .zip(&magnitude)
        .map(|(&u, &z)| {
            if u < threshold {
                mean - sigma_low * z.abs()
            } else {
                mean + sigma_high * z.abs()
            }
        })
        .collect()
}

/// Configured distribution of one shape parameter.
///
/// In configuration documents it is written as `[mean, sigma]`,
/// `[mean, sigma_low, sigma_high]` or a model name such as `"N21"`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ShapeDistributionRepr", into = "ShapeDistributionRepr"))]
pub enum ShapeDistribution {
    /// Symmetric Gaussian
    Gaussian {
        /// Centre
        mean: f64,
        /// Standard deviation
        sigma: f64,
    },
    /// Asymmetric Gaussian
    Asymmetric {
        /// Mode
        mean: f64,
        /// Width below the mode
        sigma_low: f64,
        /// Width above the mode
        sigma_high: f64,
    },
    /// Redshift-dependent stretch model of Nicolas et al. (2021)
    N21,
}

impl ShapeDistribution {
    /// Named models accepted by [`ShapeDistribution::parse_named`].
    pub const NAMED: &'static [&'static str] = &["N21"];

    /// Builds a Gaussian or asymmetric Gaussian from its parameter list.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidDistribution`] for a list that is not two or
    /// three long, or for negative or non-finite widths.
    pub fn from_values(param: &str, values: &[f64]) -> Result<Self, ModelError> {
        let dist = match *values {
            [mean, sigma] => ShapeDistribution::Gaussian { mean, sigma },
            [mean, sigma_low, sigma_high] => ShapeDistribution::Asymmetric {
                mean,
                sigma_low,
                sigma_high,
            },
            _ => {
                return Err(ModelError::InvalidDistribution {
                    name: param.to_string(),
                    reason: format!("expected [mean, sigma] or [mean, sigma_low, sigma_high], got {} values", values.len()),
                })
            }
        };
        dist.validate(param)?;
        Ok(dist)
    }

    /// Parses a named distribution, ignoring case.
    ///
    /// # Errors
    ///
    /// [`ModelError::Unsupported`] listing [`ShapeDistribution::NAMED`].
    pub fn parse_named(name: &str) -> Result<Self, ModelError> {
        if name.eq_ignore_ascii_case("n21") {
            Ok(ShapeDistribution::N21)
        } else {
            Err(ModelError::Unsupported {
                kind: "shape distribution",
                name: name.to_string(),
                supported: Self::NAMED,
            })
        }
    }

    /// Whether sampling needs the objects' redshifts.
    pub fn is_redshift_dependent(&self) -> bool {
        matches!(self, ShapeDistribution::N21)
    }

    fn validate(&self, param: &str) -> Result<(), ModelError> {
        let (mean, sigma_low, sigma_high) = match *self {
            ShapeDistribution::Gaussian { mean, sigma } => (mean, sigma, sigma),
            ShapeDistribution::Asymmetric {
                mean,
                sigma_low,
                sigma_high,
            } => (mean, sigma_low, sigma_high),
            ShapeDistribution::N21 => return Ok(()),
        };
        let valid_width = |w: f64| w.is_finite() && w >= 0.0;
        if !mean.is_finite() || !valid_width(sigma_low) || !valid_width(sigma_high) {
            return Err(ModelError::InvalidDistribution {
                name: param.to_string(),
                reason: "mean must be finite and widths non-negative".to_string(),
            });
        }
        Ok(())
    }

    /// Samples `n` values from a redshift-independent distribution.
    ///
    /// Returns `None` for redshift-dependent models, which are sampled by
    /// their own tables.
    pub fn sample(&self, rng: &mut SimRng, n: usize) -> Option<Vec<f64>> {
        match *self {
            ShapeDistribution::Gaussian { mean, sigma } => Some(asym_gauss(rng, mean, sigma, sigma, n)),
            ShapeDistribution::Asymmetric {
                mean,
                sigma_low,
                sigma_high,
            } => Some(asym_gauss(rng, mean, sigma_low, sigma_high, n)),
            ShapeDistribution::N21 => None,
        }
    }

    /// Records the distribution of parameter `param` in the header.
    ///
    /// ```
    /// use popsim_models::distributions::ShapeDistribution;
    /// use popsim_models::header::Header;
    ///
    /// let mut header = Header::new();
    /// ShapeDistribution::from_values("c", &[-0.05, 0.04, 0.1])
    ///     .unwrap()
    ///     .update_header("c", &mut header);
    /// assert_eq!(header.get_f64("sig_c_hi"), Some(0.1));
    /// assert_eq!(header.get("dist_c").map(|v| v.to_string()), Some("asym_gauss".into()));
    /// ```
    pub fn update_header(&self, param: &str, header: &mut Header) {
        match *self {
            ShapeDistribution::Gaussian { mean, sigma } => {
                header.insert(format!("dist_{}", param), "gauss");
                header.insert(format!("mean_{}", param), mean);
                header.insert(format!("sig_{}", param), sigma);
            }
            ShapeDistribution::Asymmetric {
                mean,
                sigma_low,
                sigma_high,
            } => {
                header.insert(format!("dist_{}", param), "asym_gauss");
                header.insert(format!("mean_{}", param), mean);
                header.insert(format!("sig_{}_low", param), sigma_low);
                header.insert(format!("sig_{}_hi", param), sigma_high);
            }
            ShapeDistribution::N21 => {
                header.insert(format!("dist_{}", param), "N21");
            }
        }
    }
}

/// Wire form: a parameter list or a model name.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum ShapeDistributionRepr {
    Values(Vec<f64>),
    Named(String),
}

#[cfg(feature = "serde")]
impl TryFrom<ShapeDistributionRepr> for ShapeDistribution {
    type Error = ModelError;

    fn try_from(repr: ShapeDistributionRepr) -> Result<Self, Self::Error> {
        match repr {
            ShapeDistributionRepr::Values(values) => Self::from_values("shape parameter", &values),
            ShapeDistributionRepr::Named(name) => Self::parse_named(&name),
        }
    }
}

#[cfg(feature = "serde")]
impl From<ShapeDistribution> for ShapeDistributionRepr {
    fn from(dist: ShapeDistribution) -> Self {
        match dist {
            ShapeDistribution::Gaussian { mean, sigma } => ShapeDistributionRepr::Values(vec![mean, sigma]),
            ShapeDistribution::Asymmetric {
                mean,
                sigma_low,
                sigma_high,
            } => ShapeDistributionRepr::Values(vec![mean, sigma_low, sigma_high]),
            ShapeDistribution::N21 => ShapeDistributionRepr::Named("N21".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn mean(xs: &[f64]) -> f64 {
        xs.iter().sum::<f64>() / xs.len() as f64
    }

    #[test]
    fn test_asym_gauss_side_fraction_and_mean() {
        let mut rng = SimRng::from_seed(99);
        let xs = asym_gauss(&mut rng, 0.0, 0.1, 0.3, 200_000);

        let below = xs.iter().filter(|&&x| x < 0.0).count() as f64 / xs.len() as f64;
        assert_abs_diff_eq!(below, 0.25, epsilon = 0.005);

        // E[X] - mean = sqrt(2/π)·(σ_high − σ_low)
        let expected = (2.0 / std::f64::consts::PI).sqrt() * 0.2;
        assert_abs_diff_eq!(mean(&xs), expected, epsilon = 0.003);
    }

    #[test]
    fn test_gaussian_uses_asym_gauss_stream() {
        let dist = ShapeDistribution::from_values("x1", &[0.3, 1.2]).unwrap();
        let mut a = SimRng::from_seed(5);
        let mut b = SimRng::from_seed(5);
        assert_eq!(
            dist.sample(&mut a, 10).unwrap(),
            asym_gauss(&mut b, 0.3, 1.2, 1.2, 10)
        );
    }

    #[test]
    fn test_zero_width_is_constant() {
        let dist = ShapeDistribution::from_values("c", &[0.1, 0.0]).unwrap();
        let mut rng = SimRng::from_seed(3);
        assert!(dist.sample(&mut rng, 50).unwrap().iter().all(|&c| c == 0.1));
    }

    #[test]
    fn test_invalid_lists_rejected() {
        assert!(ShapeDistribution::from_values("x1", &[0.0]).is_err());
        assert!(ShapeDistribution::from_values("x1", &[0.0, 1.0, 2.0, 3.0]).is_err());
        assert!(ShapeDistribution::from_values("x1", &[0.0, -1.0]).is_err());
        assert!(ShapeDistribution::from_values("c", &[f64::NAN, 0.1]).is_err());
    }

    #[test]
    fn test_named() {
        assert_eq!(ShapeDistribution::parse_named("n21").unwrap(), ShapeDistribution::N21);
        assert!(ShapeDistribution::parse_named("N22").is_err());
        assert!(ShapeDistribution::N21.is_redshift_dependent());
        assert!(ShapeDistribution::N21.sample(&mut SimRng::from_seed(1), 3).is_none());
    }

    #[test]
    fn test_gaussian_header() {
        let mut header = Header::new();
        ShapeDistribution::from_values("x1", &[0.0, 1.0])
            .unwrap()
            .update_header("x1", &mut header);
        assert_eq!(header.get_f64("mean_x1"), Some(0.0));
        assert_eq!(header.get_f64("sig_x1"), Some(1.0));
        assert!(!header.contains_key("sig_x1_low"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn test_asym_gauss_side_fraction(
                seed in any::<u64>(),
                mean in -1.0f64..1.0,
                sigma_low in 0.01f64..1.0,
                sigma_high in 0.01f64..1.0,
            ) {
                let mut rng = SimRng::from_seed(seed);
                let xs = asym_gauss(&mut rng, mean, sigma_low, sigma_high, 20_000);

                let below = xs.iter().filter(|&&x| x < mean).count() as f64 / xs.len() as f64;
                let expected = sigma_low / (sigma_low + sigma_high);
                // Binomial standard error is below 0.0036 at this size
                prop_assert!((below - expected).abs() < 0.02, "below {} expected {}", below, expected);
            }

            #[test]
            fn test_header_recovers_parameters(
                mean in -2.0f64..2.0,
                sigma_low in 0.0f64..1.5,
                sigma_high in 0.0f64..1.5,
            ) {
                let mut header = Header::new();
                let asym = ShapeDistribution::from_values("c", &[mean, sigma_low, sigma_high]).unwrap();
                asym.update_header("c", &mut header);
                let back = ShapeDistribution::from_values(
                    "c",
                    &[
                        header.get_f64("mean_c").unwrap(),
                        header.get_f64("sig_c_low").unwrap(),
                        header.get_f64("sig_c_hi").unwrap(),
                    ],
                )
                .unwrap();
                prop_assert_eq!(back, asym);

                let gauss = ShapeDistribution::from_values("x1", &[mean, sigma_high]).unwrap();
                gauss.update_header("x1", &mut header);
                let back = ShapeDistribution::from_values(
                    "x1",
                    &[header.get_f64("mean_x1").unwrap(), header.get_f64("sig_x1").unwrap()],
                )
                .unwrap();
                prop_assert_eq!(back, gauss);
            }
        }
    }
}

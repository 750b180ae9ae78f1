//! Sky position sampling.

use std::f64::consts::TAU;

use popsim_core::rng::{SimRng, SEED_HIGH, SEED_LOW};
use popsim_core::sky::Footprint;

use crate::error::GeneratorError;

/// Draws positions uniformly on the celestial sphere, optionally restricted
/// to a survey footprint.
///
/// Without a footprint all `n` right ascensions are drawn first, uniform on
/// `[0, 2π)`, then all `n` declinations as `asin(2u − 1)`. With a footprint
/// one integer from the caller's generator seeds a candidate generator that
/// proposes `(ra, dec)` pairs one at a time; pairs outside are rejected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkySampler {
    region: Option<Region>,
}

/// Footprint together with its rejection cap; there is no cap without one.
#[derive(Clone, Debug, PartialEq)]
struct Region {
    footprint: Footprint,
    max_trials: usize,
}

impl SkySampler {
    /// Sampler over the whole sphere.
    pub fn full_sky() -> Self {
        Self { region: None }
    }

    /// Sampler restricted to `footprint`.
    ///
    /// Sampling fails once `max_trials` consecutive candidates are rejected.
    pub fn with_footprint(footprint: Footprint, max_trials: usize) -> Self {
        Self {
            region: Some(Region {
                footprint,
                max_trials: max_trials.max(1),
            }),
        }
    }

    /// Footprint, if any.
    #[inline]
    pub fn footprint(&self) -> Option<&Footprint> {
        self.region.as_ref().map(|r| &r.footprint)
    }

    /// Consecutive rejection cap, set only alongside a footprint.
    #[inline]
    pub fn max_trials(&self) -> Option<usize> {
        self.region.as_ref().map(|r| r.max_trials)
    }

    /// Draws `n` positions, returned as `(ra, dec)` columns in radians.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::FootprintExhausted`] when the footprint keeps
    /// rejecting candidates.
    pub fn sample(
        &self,
        rng: &mut SimRng,
        n: usize,
    ) -> Result<(Vec<f64>, Vec<f64>), GeneratorError> {
        let Some(Region {
            footprint,
            max_trials,
        }) = &self.region
        else {
            return Ok(draw_sphere(rng, n));
        };

        let mut candidates = SimRng::from_seed(rng.gen_integer(SEED_LOW, SEED_HIGH));
        let mut ra = Vec::with_capacity(n);
        let mut dec = Vec::with_capacity(n);
        let mut rejected = 0usize;
        while ra.len() < n {
            let r = candidates.gen_uniform_range(0.0, TAU);
            let d = (2.0 * candidates.gen_uniform() - 1.0).asin();
            if footprint.contains(r, d) {
                ra.push(r);
                dec.push(d);
                rejected = 0;
            } else {
                rejected += 1;
                if rejected >= *max_trials {
                    return Err(GeneratorError::FootprintExhausted {
                        max_trials: *max_trials,
                    });
                }
            }
        }
        Ok((ra, dec))
    }
}

fn draw_sphere(rng: &mut SimRng, n: usize) -> (Vec<f64>, Vec<f64>) {
    let ra: Vec<f64> = (0..n).map(|_| rng.gen_uniform_range(0.0, TAU)).collect();
    let dec: Vec<f64> = (0..n)
        .map(|_| (2.0 * rng.gen_uniform() - 1.0).asin())
        .collect();
    (ra, dec)
}

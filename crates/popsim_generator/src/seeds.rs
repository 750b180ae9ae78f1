//! Per-call seed table.

use popsim_core::rng::{SeedDeriver, SimRng};

/// Logical consumers of randomness in one generation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeedRole {
    /// Peak times
    PeakTime,
    /// Cosmological redshifts drawn from the rate CDF
    Redshift,
    /// Host catalogue draws
    Host,
    /// Sky coordinates
    Coords,
    /// Peculiar velocities
    PeculiarVelocity,
    /// Object-type parameters
    TypeParams,
}

impl SeedRole {
    /// Every role, in derivation order.
    pub const ALL: [SeedRole; 6] = [
        SeedRole::PeakTime,
        SeedRole::Redshift,
        SeedRole::Host,
        SeedRole::Coords,
        SeedRole::PeculiarVelocity,
        SeedRole::TypeParams,
    ];

    /// Role name as written to logs and headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedRole::PeakTime => "peak_time",
            SeedRole::Redshift => "redshift",
            SeedRole::Host => "host",
            SeedRole::Coords => "coords",
            SeedRole::PeculiarVelocity => "peculiar_velocity",
            SeedRole::TypeParams => "type_params",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Seeds for every [`SeedRole`], derived from one root seed.
///
/// A seed is derived for every role whether or not the configuration uses
/// it, so switching an optional feature on never changes the seeds of the
/// others.
///
/// # Example
///
/// ```
/// use popsim_generator::seeds::{SeedRole, SeedTable};
///
/// let a = SeedTable::derive(42);
/// let b = SeedTable::derive(42);
/// assert_eq!(a, b);
/// assert_ne!(a.get(SeedRole::Redshift), a.get(SeedRole::Coords));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedTable {
    root_seed: u64,
    seeds: [u64; 6],
}

impl SeedTable {
    /// Derives the table for `root_seed`.
    pub fn derive(root_seed: u64) -> Self {
        let mut deriver = SeedDeriver::new(root_seed);
        let mut seeds = [0u64; 6];
        for slot in seeds.iter_mut() {
            *slot = deriver.next_seed();
        }
        Self { root_seed, seeds }
    }

    /// Root seed the table was derived from.
    #[inline]
    pub fn root_seed(&self) -> u64 {
        self.root_seed
    }

    /// Seed assigned to `role`.
    #[inline]
    pub fn get(&self, role: SeedRole) -> u64 {
        self.seeds[role.index()]
    }

    /// Fresh generator for `role`.
    #[inline]
    pub fn rng(&self, role: SeedRole) -> SimRng {
        SimRng::from_seed(self.get(role))
    }

    /// `(role, seed)` pairs in derivation order.
    pub fn iter(&self) -> impl Iterator<Item = (SeedRole, u64)> + '_ {
        SeedRole::ALL.iter().map(move |&r| (r, self.get(r)))
    }
}

//! Helpers over an explicitly passed random source.
//!
//! Nothing in this crate owns a global generator; callers thread their own
//! (usually a seeded `StdRng`) through every generating call.

use rand::Rng;

use crate::error::{DwError, DwResult};

/// A uniform value in `[0, 1)`.
pub fn random_probability<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

/// A uniform integer in `lowest..=highest`.
///
/// Fails with [`DwError::InvalidRange`] unless `lowest < highest`.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, lowest: i64, highest: i64) -> DwResult<i64> {
    if lowest >= highest {
        return Err(DwError::InvalidRange { lowest, highest });
    }
    Ok(rng.random_range(lowest..=highest))
}

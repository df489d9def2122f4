//! Seeded synthetic data: imbalanced classifier scores and linear regression
//! problems. The same seed always yields the same tensors.

pub mod regression;
pub mod scores;

pub use regression::*;
pub use scores::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// One standard normal draw via the Box-Muller transform.
pub(crate) fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-300);
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

pub mod scaler;
pub mod split;

pub use scaler::*;
pub use split::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seeded generator for reproducible shuffles; `None` draws from entropy.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

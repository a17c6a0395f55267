use crate::engine::config::SeedStrategy;
use crate::engine::error::EngineError;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

/// Turns a [`SeedStrategy`] into a concrete pool position.
///
/// `Index` is range-checked against `pool_size`. `Random` draws uniformly from
/// `0..pool_size`, from a `StdRng` seeded with the given value or from OS entropy.
///
/// # Errors
///
/// Returns [`EngineError::SeedOutOfRange`] if the index does not address a candidate, or if the
/// pool is empty.
#[instrument(level = "debug", skip_all, fields(pool_size = pool_size))]
pub fn resolve_seed_index(strategy: &SeedStrategy, pool_size: usize) -> Result<usize, EngineError> {
    let index = match *strategy {
        SeedStrategy::Index(index) => index,
        SeedStrategy::Random { seed } => {
            if pool_size == 0 {
                return Err(EngineError::SeedOutOfRange {
                    index: 0,
                    pool_size,
                });
            }
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            draw_index(&mut rng, pool_size)
        }
    };

    if index >= pool_size {
        return Err(EngineError::SeedOutOfRange { index, pool_size });
    }
    debug!(index, "Resolved seed index.");
    Ok(index)
}

pub fn draw_index(rng: &mut impl Rng, pool_size: usize) -> usize {
    rng.gen_range(0..pool_size)
}

//! Deterministic random number generation.
//!
//! A population draws all of its randomness from a single
//! [`EvolutionRng`] stream. When fitness evaluation is parallelized,
//! [`genome_rng`] derives an independent stream per genome, so that
//! results do not depend on worker count or scheduling order.
use crate::GenomeKey;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The random number generator used by populations.
///
/// Its state is serializable, so it can be stored
/// in a [`Snapshot`](crate::Snapshot).
pub type EvolutionRng = ChaCha8Rng;

/// Returns a population's generator, seeded from
/// `seed` if present or from OS entropy otherwise.
pub(crate) fn population_rng(seed: Option<u64>) -> EvolutionRng {
    match seed {
        Some(seed) => EvolutionRng::seed_from_u64(seed),
        None => EvolutionRng::from_entropy(),
    }
}

/// Returns a generator derived from a base seed and
/// a genome's key. The base seed selects the key stream,
/// and the genome key selects one of its 2⁶⁴ substreams.
///
/// # Examples
/// ```
/// use ferroneat::rng::genome_rng;
/// use rand::Rng;
///
/// let a: u64 = genome_rng(7, 3).gen();
/// let b: u64 = genome_rng(7, 3).gen();
/// let c: u64 = genome_rng(7, 4).gen();
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
pub fn genome_rng(base_seed: u64, genome: GenomeKey) -> EvolutionRng {
    let mut rng = EvolutionRng::seed_from_u64(base_seed);
    rng.set_stream(genome as u64);
    rng
}

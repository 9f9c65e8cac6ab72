use super::{PopulationConfig, Reproduction, SpeciesSet};
use crate::rng::EvolutionRng;

use serde::{Deserialize, Serialize};

/// The complete state of a [`Population`] between generations.
///
/// Restoring a population from a snapshot and continuing
/// evolution gives the same results as never having stopped,
/// as long as the fitness function is deterministic.
///
/// The serialization format is left to the user.
///
/// [`Population`]: crate::Population
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot<C, H, G> {
    pub generation: usize,
    pub population_config: PopulationConfig,
    pub genetic_config: C,
    /// Holds every genome of the population.
    pub species_set: SpeciesSet<G>,
    /// Holds the innovation history.
    pub reproduction: Reproduction<H>,
    pub best_genome: Option<G>,
    pub rng: EvolutionRng,
}

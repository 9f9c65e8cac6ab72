use super::logging;
use super::{PopulationConfig, SpeciesFitnessFunc, SpeciesKey, SpeciesSet};
use crate::Genome;

impl SpeciesFitnessFunc {
    /// Reduces member fitnesses to a species fitness.
    pub fn apply(self, fitnesses: &mut [f32]) -> f32 {
        match self {
            Self::Max => logging::max(fitnesses),
            Self::Min => logging::min(fitnesses),
            Self::Mean => logging::mean(fitnesses),
            Self::Median => logging::median(fitnesses),
        }
    }
}

/// Updates every species' fitness history and determines
/// which species are stagnant in `generation`.
///
/// Returns `(species, is_stagnant)` pairs ordered by
/// ascending species fitness. The [`species_elitism`] best
/// species are never stagnant, and species are only marked
/// stagnant while more than [`species_elitism`] species
/// remain unmarked.
///
/// [`species_elitism`]: PopulationConfig::species_elitism
pub(super) fn update<G: Genome>(
    species_set: &mut SpeciesSet<G>,
    generation: usize,
    config: &PopulationConfig,
) -> Vec<(SpeciesKey, bool)> {
    let mut species_data: Vec<(SpeciesKey, f32, usize)> = species_set
        .species_mut()
        .map(|species| {
            let previous_best = species
                .fitness_history
                .iter()
                .copied()
                .fold(f32::NEG_INFINITY, f32::max);
            let fitness = config.species_fitness_func.apply(&mut species.fitnesses());
            species.fitness = Some(fitness);
            species.fitness_history.push(fitness);
            species.adjusted_fitness = None;
            if fitness > previous_best {
                species.last_improved = generation;
            }
            (species.key(), fitness, species.last_improved)
        })
        .collect();

    species_data.sort_by(|(_, f1, _), (_, f2, _)| f1.total_cmp(f2));

    let species_count = species_data.len();
    let mut non_stagnant = species_count;
    species_data
        .into_iter()
        .enumerate()
        .map(|(rank, (key, _, last_improved))| {
            let protected = species_count - rank <= config.species_elitism;
            let is_stagnant = !protected
                && non_stagnant > config.species_elitism
                && generation.saturating_sub(last_improved) >= config.stagnation_threshold.get();
            if is_stagnant {
                non_stagnant -= 1;
            }
            (key, is_stagnant)
        })
        .collect()
}

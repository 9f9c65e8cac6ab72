use super::offspring_factory::OffspringFactory;
use super::{logging, stagnation};
use super::{EvolutionError, PopulationConfig, Species, SpeciesKey, SpeciesSet};
use crate::{Genome, GenomeKey, InnovationHistory};

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

/// How a genome came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ancestry {
    /// Randomly generated.
    Initial,
    /// Cloned from the parent, then mutated.
    Cloned(GenomeKey),
    /// Crossed over from the parents, then mutated.
    Crossover(GenomeKey, GenomeKey),
}

/// The state carried by a population from one
/// generation's reproduction to the next: the
/// innovation history, the genome key counter,
/// and the ancestry of every genome created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reproduction<H> {
    next_genome_key: GenomeKey,
    history: H,
    ancestors: BTreeMap<GenomeKey, Ancestry>,
}

impl<H> Reproduction<H> {
    pub(crate) fn new<C>(config: &C) -> Reproduction<H>
    where
        H: InnovationHistory<Config = C>,
    {
        Reproduction {
            next_genome_key: 1,
            history: H::new(config),
            ancestors: BTreeMap::new(),
        }
    }

    /// Returns the innovation history.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Returns the ancestry of every genome ever created.
    pub fn ancestors(&self) -> &BTreeMap<GenomeKey, Ancestry> {
        &self.ancestors
    }

    /// Returns the key the next genome will be assigned.
    pub fn next_genome_key(&self) -> GenomeKey {
        self.next_genome_key
    }

    /// Creates `count` random genomes.
    pub(crate) fn create_new<C, G, R>(
        &mut self,
        config: &C,
        count: usize,
        rng: &mut R,
    ) -> BTreeMap<GenomeKey, G>
    where
        G: Genome<Config = C, InnovationHistory = H>,
        R: Rng + ?Sized,
    {
        let mut genomes = BTreeMap::new();
        for _ in 0..count {
            let key = self.next_genome_key;
            self.next_genome_key += 1;
            genomes.insert(key, G::new(key, config, &mut self.history, rng));
            self.ancestors.insert(key, Ancestry::Initial);
        }
        genomes
    }

    /// Produces the next generation from the evaluated
    /// members of `species_set`.
    ///
    /// Stagnant species are removed. If none remain,
    /// the species set is cleared and an empty population
    /// is returned. Otherwise surviving species are allotted
    /// offspring in proportion to their adjusted fitness,
    /// and their members are moved out of the species set.
    ///
    /// # Errors
    /// Returns an error if the minimum species size cannot
    /// be honored for all surviving species.
    pub(crate) fn reproduce<C, G, R>(
        &mut self,
        species_set: &mut SpeciesSet<G>,
        population_config: &PopulationConfig,
        genetic_config: &C,
        generation: usize,
        rng: &mut R,
    ) -> Result<BTreeMap<GenomeKey, G>, EvolutionError>
    where
        H: InnovationHistory<Config = C>,
        G: Genome<Config = C, InnovationHistory = H>,
        R: Rng + ?Sized,
    {
        self.history.reset_generation();

        let mut remaining: Vec<SpeciesKey> = vec![];
        for (species_key, is_stagnant) in stagnation::update(species_set, generation, population_config) {
            if is_stagnant {
                info!("Species {} stagnated and was removed", species_key);
                species_set.remove(species_key);
            } else {
                remaining.push(species_key);
            }
        }
        if remaining.is_empty() {
            species_set.clear();
            return Ok(BTreeMap::new());
        }

        let all_fitnesses: Vec<f32> = remaining
            .iter()
            .flat_map(|k| surviving(species_set, *k).fitnesses())
            .collect();
        let min_fitness = logging::min(&all_fitnesses);
        let fitness_range = (logging::max(&all_fitnesses) - min_fitness).max(1.0);

        let mut adjusted_fitnesses = Vec::with_capacity(remaining.len());
        let mut previous_sizes = Vec::with_capacity(remaining.len());
        for species_key in &remaining {
            let species = surviving_mut(species_set, *species_key);
            let adjusted = (logging::mean(&species.fitnesses()) - min_fitness) / fitness_range;
            species.adjusted_fitness = Some(adjusted);
            adjusted_fitnesses.push(adjusted);
            previous_sizes.push(species.len());
        }
        info!(
            "Average adjusted fitness: {:.3}",
            logging::mean(&adjusted_fitnesses)
        );

        let pop_size = population_config.size.get();
        let min_species_size = population_config
            .min_species_size
            .get()
            .max(population_config.elitism);
        let spawn_amounts = adjust_spawn_exact(
            compute_spawn(&adjusted_fitnesses, &previous_sizes, pop_size, min_species_size),
            pop_size,
            min_species_size,
        )?;
        debug!("Spawn amounts: {:?}", spawn_amounts);

        let mut offspring = BTreeMap::new();
        let mut factory = OffspringFactory::new(
            &mut self.history,
            &mut self.next_genome_key,
            &mut self.ancestors,
            genetic_config,
            population_config,
            rng,
        );
        for (species_key, spawn) in remaining.iter().zip(spawn_amounts) {
            let species = surviving_mut(species_set, *species_key);
            let mut ranked: Vec<G> = std::mem::take(&mut species.members).into_values().collect();
            ranked.sort_by(|g1, g2| {
                let f1 = g1.fitness().unwrap_or(f32::NEG_INFINITY);
                let f2 = g2.fitness().unwrap_or(f32::NEG_INFINITY);
                f2.total_cmp(&f1).then(g2.key().cmp(&g1.key()))
            });
            factory.generate_offspring(&ranked, spawn, &mut offspring);
        }

        Ok(offspring)
    }
}

/// Looks up a species that survived stagnation removal.
///
/// # Panics
///
/// Panics if the species is not in the set.
fn surviving<G: Genome>(species_set: &SpeciesSet<G>, key: SpeciesKey) -> &Species<G> {
    species_set
        .get(key)
        .unwrap_or_else(|| panic!("surviving species {} missing from species set", key))
}

fn surviving_mut<G: Genome>(species_set: &mut SpeciesSet<G>, key: SpeciesKey) -> &mut Species<G> {
    species_set
        .get_mut(key)
        .unwrap_or_else(|| panic!("surviving species {} missing from species set", key))
}

/// Computes the number of offspring of each species.
///
/// Each species moves half-way from its previous size
/// towards a size proportional to its adjusted fitness
/// (at least one step, and never below `min_species_size`).
/// The results are then scaled to approximately `pop_size`.
pub(crate) fn compute_spawn(
    adjusted_fitnesses: &[f32],
    previous_sizes: &[usize],
    pop_size: usize,
    min_species_size: usize,
) -> Vec<usize> {
    let fitness_sum: f32 = adjusted_fitnesses.iter().sum();
    let spawn_amounts: Vec<usize> = adjusted_fitnesses
        .iter()
        .zip(previous_sizes)
        .map(|(&adjusted, &previous)| {
            let target = if fitness_sum > 0.0 {
                (adjusted / fitness_sum * pop_size as f32).max(min_species_size as f32)
            } else {
                min_species_size as f32
            };
            let step = (target - previous as f32) * 0.5;
            let rounded = step.round() as isize;
            let spawn = if rounded != 0 {
                previous as isize + rounded
            } else if step > 0.0 {
                previous as isize + 1
            } else if step < 0.0 {
                previous as isize - 1
            } else {
                previous as isize
            };
            spawn.max(0) as usize
        })
        .collect();

    let total_spawn: usize = spawn_amounts.iter().sum();
    if total_spawn == 0 {
        return vec![min_species_size; spawn_amounts.len()];
    }
    let norm = pop_size as f32 / total_spawn as f32;
    spawn_amounts
        .into_iter()
        .map(|n| ((n as f32 * norm).round() as usize).max(min_species_size))
        .collect()
}

/// Reconciles rounding so that spawn amounts add up to
/// exactly `pop_size`, never going below `min_species_size`.
///
/// Missing offspring go to the smallest species first.
/// Surplus offspring are taken from the largest species first.
pub(crate) fn adjust_spawn_exact(
    mut spawn_amounts: Vec<usize>,
    pop_size: usize,
    min_species_size: usize,
) -> Result<Vec<usize>, EvolutionError> {
    if spawn_amounts.len() * min_species_size > pop_size {
        return Err(EvolutionError::SpawnConflict {
            pop_size,
            species: spawn_amounts.len(),
            min_species_size,
        });
    }
    let mut total: usize = spawn_amounts.iter().sum();
    while total < pop_size {
        let smallest = spawn_amounts
            .iter()
            .enumerate()
            .min_by_key(|(i, s)| (**s, *i))
            .map(|(i, _)| i);
        match smallest {
            Some(i) => spawn_amounts[i] += 1,
            None => break,
        }
        total += 1;
    }
    while total > pop_size {
        let largest = spawn_amounts
            .iter()
            .enumerate()
            .filter(|(_, s)| **s > min_species_size)
            .max_by_key(|(i, s)| (**s, std::cmp::Reverse(*i)))
            .map(|(i, _)| i);
        match largest {
            Some(i) => spawn_amounts[i] -= 1,
            None => break,
        }
        total -= 1;
    }
    Ok(spawn_amounts)
}

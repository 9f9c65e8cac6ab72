use super::{Ancestry, PopulationConfig};
use crate::{Genome, GenomeKey};

use rand::prelude::{Rng, SliceRandom};

use std::collections::BTreeMap;

/// Auxiliary type for offspring generation.
/// Handles all the tasks of generating a species'
/// offspring according to the specified configs
/// and allotted offspring.
pub(super) struct OffspringFactory<'a, C, H, R: ?Sized> {
    history: &'a mut H,
    next_genome_key: &'a mut GenomeKey,
    ancestors: &'a mut BTreeMap<GenomeKey, Ancestry>,
    genetic_config: &'a C,
    population_config: &'a PopulationConfig,
    rng: &'a mut R,
}

impl<'a, C, H, R> OffspringFactory<'a, C, H, R>
where
    R: Rng + ?Sized,
{
    pub(super) fn new(
        history: &'a mut H,
        next_genome_key: &'a mut GenomeKey,
        ancestors: &'a mut BTreeMap<GenomeKey, Ancestry>,
        genetic_config: &'a C,
        population_config: &'a PopulationConfig,
        rng: &'a mut R,
    ) -> OffspringFactory<'a, C, H, R> {
        OffspringFactory {
            history,
            next_genome_key,
            ancestors,
            genetic_config,
            population_config,
            rng,
        }
    }

    /// Generate the allotted offspring of a species.
    ///
    /// `ranked` holds the species' members sorted by
    /// decreasing fitness. The top [elite] are copied as-is,
    /// keeping their keys, and the rest of the offspring are
    /// bred from the [top performers].
    ///
    /// [elite]: PopulationConfig::elitism
    /// [top performers]: PopulationConfig::survival_threshold
    pub(super) fn generate_offspring<G>(
        &mut self,
        ranked: &[G],
        allotted_offspring: usize,
        offspring: &mut BTreeMap<GenomeKey, G>,
    ) where
        G: Genome<Config = C, InnovationHistory = H>,
    {
        let elite = ranked
            .len()
            .min(self.population_config.elitism)
            .min(allotted_offspring);
        for genome in &ranked[..elite] {
            offspring.insert(genome.key(), genome.clone());
        }

        let parents = &ranked[..self.count_survivors(ranked.len())];
        for _ in elite..allotted_offspring {
            let child = self.breed(parents);
            offspring.insert(child.key(), child);
        }
    }

    /// Number of members eligible for parenthood:
    /// at least two, whenever possible.
    fn count_survivors(&self, members: usize) -> usize {
        let survivors = (members as f32 * self.population_config.survival_threshold).ceil() as usize;
        survivors.max(2).min(members)
    }

    /// Produces a single mutated child from the parents,
    /// either by crossover of two distinct parents or
    /// by cloning one.
    fn breed<G>(&mut self, parents: &[G]) -> G
    where
        G: Genome<Config = C, InnovationHistory = H>,
    {
        let key = *self.next_genome_key;
        *self.next_genome_key += 1;

        let (mut child, ancestry) = if parents.len() > 1
            && self.rng.gen::<f32>() < self.population_config.sexual_reproduction_chance
        {
            let pair: Vec<&G> = parents.choose_multiple(&mut *self.rng, 2).collect();
            let (parent1, parent2) = (pair[0], pair[1]);
            (
                G::crossover(key, parent1, parent2, self.genetic_config, &mut *self.rng),
                Ancestry::Crossover(parent1.key(), parent2.key()),
            )
        } else {
            let parent = parents
                .choose(&mut *self.rng)
                .unwrap_or_else(|| panic!("no eligible parents for genome {}", key));
            (parent.clone_with_key(key), Ancestry::Cloned(parent.key()))
        };

        child.mutate(self.history, self.genetic_config, &mut *self.rng);
        self.ancestors.insert(key, ancestry);
        child
    }
}

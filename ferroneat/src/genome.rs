use crate::{ConfigError, GenomeKey};

use rand::Rng;

/// An interface for genomes that can be evolved by a [`Population`].
///
/// Genomes are identified by a population-unique [`GenomeKey`],
/// which is assigned by the population and never reused.
/// Fitness is `None` until assigned during evaluation.
///
/// [`Population`]: crate::Population
pub trait Genome: Clone {
    type Config;
    type InnovationHistory: InnovationHistory<Config = Self::Config>;

    /// Checks that the genetic configuration is usable.
    /// Called once by [`Population::new`] before any
    /// genome is created.
    ///
    /// [`Population::new`]: crate::Population::new
    fn validate_config(config: &Self::Config) -> Result<(), ConfigError>;

    /// Returns a randomized genome with the specified key.
    fn new<R: Rng + ?Sized>(
        key: GenomeKey,
        config: &Self::Config,
        history: &mut Self::InnovationHistory,
        rng: &mut R,
    ) -> Self;

    /// Combines two genomes and returns a "child" genome
    /// with the specified key and no fitness.
    fn crossover<R: Rng + ?Sized>(
        key: GenomeKey,
        parent1: &Self,
        parent2: &Self,
        config: &Self::Config,
        rng: &mut R,
    ) -> Self;

    /// Returns an exact copy of the genome under a new key.
    /// The copy has no fitness.
    fn clone_with_key(&self, key: GenomeKey) -> Self;

    /// Mutates the genome in place.
    fn mutate<R: Rng + ?Sized>(
        &mut self,
        history: &mut Self::InnovationHistory,
        config: &Self::Config,
        rng: &mut R,
    );

    /// Returns the genetic distance between two genomes.
    ///
    /// Should be symmetric, and zero for identical genomes.
    fn genetic_distance(first: &Self, second: &Self, config: &Self::Config) -> f32;

    /// Returns the genome's key.
    fn key(&self) -> GenomeKey;

    /// Sets the genome's fitness value.
    fn set_fitness(&mut self, fitness: f32);

    /// Returns the genome's fitness value, if it has been evaluated.
    fn fitness(&self) -> Option<f32>;
}

/// An Innovation History is used to keep track
/// of genetic innovations throught successive
/// generations of genomes.
///
/// The exact function and utility of the
/// InnovationHistory is left to the implementor,
/// except that the population resets it once
/// at the start of every reproduction.
pub trait InnovationHistory {
    type Config;

    fn new(config: &Self::Config) -> Self;

    /// Forgets the mutations seen during the current generation.
    fn reset_generation(&mut self);
}

#[cfg(test)]
pub(crate) mod testing {
    //! A minimal genome used to exercise the engine
    //! without depending on a network representation.
    use super::*;
    use crate::ConfigError;

    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TraitConfig {
        pub trait_count: usize,
        pub mutation_power: f32,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct MutationCounter {
        pub generation_mutations: usize,
        pub total_mutations: usize,
        pub resets: usize,
    }

    impl InnovationHistory for MutationCounter {
        type Config = TraitConfig;

        fn new(_: &TraitConfig) -> MutationCounter {
            MutationCounter::default()
        }

        fn reset_generation(&mut self) {
            self.generation_mutations = 0;
            self.resets += 1;
        }
    }

    /// A genome made of real-valued traits.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TraitGenome {
        pub key: GenomeKey,
        pub traits: Vec<f32>,
        pub fitness: Option<f32>,
    }

    impl Genome for TraitGenome {
        type Config = TraitConfig;
        type InnovationHistory = MutationCounter;

        fn validate_config(config: &TraitConfig) -> Result<(), ConfigError> {
            if config.trait_count == 0 {
                return Err(ConfigError::new("trait", "trait_count", "must be at least 1"));
            }
            Ok(())
        }

        fn new<R: Rng + ?Sized>(
            key: GenomeKey,
            config: &TraitConfig,
            _: &mut MutationCounter,
            rng: &mut R,
        ) -> TraitGenome {
            TraitGenome {
                key,
                traits: (0..config.trait_count)
                    .map(|_| rng.gen_range(-1.0..1.0))
                    .collect(),
                fitness: None,
            }
        }

        fn crossover<R: Rng + ?Sized>(
            key: GenomeKey,
            parent1: &TraitGenome,
            parent2: &TraitGenome,
            _: &TraitConfig,
            rng: &mut R,
        ) -> TraitGenome {
            TraitGenome {
                key,
                traits: parent1
                    .traits
                    .iter()
                    .zip(&parent2.traits)
                    .map(|(a, b)| if rng.gen::<bool>() { *a } else { *b })
                    .collect(),
                fitness: None,
            }
        }

        fn clone_with_key(&self, key: GenomeKey) -> TraitGenome {
            TraitGenome {
                key,
                traits: self.traits.clone(),
                fitness: None,
            }
        }

        fn mutate<R: Rng + ?Sized>(
            &mut self,
            history: &mut MutationCounter,
            config: &TraitConfig,
            rng: &mut R,
        ) {
            history.generation_mutations += 1;
            history.total_mutations += 1;
            for t in &mut self.traits {
                *t += rng.gen_range(-config.mutation_power..=config.mutation_power);
            }
        }

        fn genetic_distance(first: &TraitGenome, second: &TraitGenome, _: &TraitConfig) -> f32 {
            first
                .traits
                .iter()
                .zip(&second.traits)
                .map(|(a, b)| (a - b).abs())
                .sum()
        }

        fn key(&self) -> GenomeKey {
            self.key
        }

        fn set_fitness(&mut self, fitness: f32) {
            self.fitness = Some(fitness);
        }

        fn fitness(&self) -> Option<f32> {
            self.fitness
        }
    }

    pub fn trait_genome(key: GenomeKey, traits: &[f32], fitness: Option<f32>) -> TraitGenome {
        TraitGenome {
            key,
            traits: traits.to_vec(),
            fitness,
        }
    }

    pub fn config() -> TraitConfig {
        TraitConfig {
            trait_count: 2,
            mutation_power: 0.1,
        }
    }
}

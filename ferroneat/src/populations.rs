//! A Population is a collection of genomes.
//! These are grouped into species, which can
//! be evolved using a genome evaluation function
//! as the source of selective pressure.
mod config;
mod errors;
pub mod logging;
mod offspring_factory;
mod reproduction;
mod snapshot;
mod species;
mod stagnation;

use crate::rng::{self, EvolutionRng};
use crate::{Genome, GenomeKey, InnovationHistory};
pub use config::{FitnessCriterion, PopulationConfig, SpeciesFitnessFunc};
pub use errors::{ConfigError, EvolutionError};
pub use reproduction::{Ancestry, Reproduction};
pub use snapshot::Snapshot;
pub use species::{GenomeDistanceCache, Species, SpeciesKey, SpeciesSet};

use log::info;

/// A population of genomes.
pub struct Population<C, H, G> {
    species_set: SpeciesSet<G>,
    reproduction: Reproduction<H>,
    generation: usize,
    best_genome: Option<G>,
    population_config: PopulationConfig,
    genetic_config: C,
    rng: EvolutionRng,
}

impl<C, H, G> Population<C, H, G>
where
    H: InnovationHistory<Config = C>,
    G: Genome<InnovationHistory = H, Config = C>,
{
    /// Creates a new population using the passed configurations.
    ///
    /// The type of `genetic_config` depends on the implementation
    /// of [`Genome`], and is effectively opaque to the population.
    ///
    /// # Errors
    /// Returns an error if either configuration is invalid.
    /// No genome is created in that case.
    ///
    /// [`Genome`]: crate::Genome
    ///
    /// # Examples
    /// ```
    /// # use ferroneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use ferroneat::{Population, PopulationConfig};
    ///
    /// let pop_config = PopulationConfig {
    ///     // Set desired configuration
    ///     size: std::num::NonZeroUsize::new(10).unwrap(),
    ///     ..PopulationConfig::zero()
    /// };
    /// # let genetic_config = GeneticConfig::zero();
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, _, G>::new(pop_config, genetic_config).unwrap();
    /// assert_eq!(population.genomes().count(), 10);
    ///
    /// let invalid = PopulationConfig {
    ///     survival_threshold: 2.0,
    ///     ..PopulationConfig::zero()
    /// };
    /// # let genetic_config = GeneticConfig::zero();
    /// assert!(Population::<_, _, G>::new(invalid, genetic_config).is_err());
    /// ```
    pub fn new(
        population_config: PopulationConfig,
        genetic_config: C,
    ) -> Result<Population<C, H, G>, ConfigError> {
        population_config.validate()?;
        G::validate_config(&genetic_config)?;
        Ok(Self::initialize(population_config, genetic_config))
    }

    /// Creates and speciates a random initial population.
    fn initialize(population_config: PopulationConfig, genetic_config: C) -> Population<C, H, G> {
        let mut rng = rng::population_rng(population_config.seed);
        let mut reproduction = Reproduction::new(&genetic_config);
        let genomes =
            reproduction.create_new(&genetic_config, population_config.size.get(), &mut rng);
        let mut species_set = SpeciesSet::new();
        species_set.speciate(
            genomes,
            0,
            population_config.distance_threshold,
            &genetic_config,
        );
        Population {
            species_set,
            reproduction,
            generation: 0,
            best_genome: None,
            population_config,
            genetic_config,
            rng,
        }
    }

    /// Restores a population from a snapshot.
    ///
    /// # Errors
    /// Returns an error if either of the snapshot's
    /// configurations is invalid.
    pub fn from_snapshot(snapshot: Snapshot<C, H, G>) -> Result<Population<C, H, G>, ConfigError> {
        snapshot.population_config.validate()?;
        G::validate_config(&snapshot.genetic_config)?;
        Ok(Population {
            species_set: snapshot.species_set,
            reproduction: snapshot.reproduction,
            generation: snapshot.generation,
            best_genome: snapshot.best_genome,
            population_config: snapshot.population_config,
            genetic_config: snapshot.genetic_config,
            rng: snapshot.rng,
        })
    }

    /// Returns a snapshot of the population's complete state.
    ///
    /// # Examples
    /// ```
    /// # use ferroneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use ferroneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, _, G>::new(PopulationConfig::zero(), genetic_config).unwrap();
    ///
    /// let saved = ron::to_string(&population.snapshot()).unwrap();
    /// let restored = Population::<_, _, G>::from_snapshot(ron::from_str(&saved).unwrap()).unwrap();
    ///
    /// assert_eq!(restored.generation(), population.generation());
    /// ```
    pub fn snapshot(&self) -> Snapshot<C, H, G>
    where
        C: Clone,
        H: Clone,
    {
        Snapshot {
            generation: self.generation,
            population_config: self.population_config.clone(),
            genetic_config: self.genetic_config.clone(),
            species_set: self.species_set.clone(),
            reproduction: self.reproduction.clone(),
            best_genome: self.best_genome.clone(),
            rng: self.rng.clone(),
        }
    }

    /// Evaluates the fitness of each genome in the
    /// population using the passed evaluator.
    ///
    /// # Examples
    /// ```
    /// # use ferroneat_nn::genomics::GeneticConfig;
    /// # use ferroneat_nn::networks::FeedForwardNetwork;
    /// use ferroneat::{Genome, Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// # let network_config = genetic_config.clone();
    /// let mut population = Population::new(
    ///     PopulationConfig::zero(),
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// population.evaluate_fitness(|g| {
    ///     # let mut network = FeedForwardNetwork::create(g, &network_config);
    ///     # // Networks with outputs closer to 0 are given higher scores.
    ///     # let fitness = 1.0 - network.activate(&[1.0]).unwrap()[0].abs();
    ///     // Compute genome's fitness...
    ///     return fitness;
    /// });
    /// assert!(population.genomes().all(|g| g.fitness().is_some()));
    /// ```
    pub fn evaluate_fitness<E>(&mut self, mut evaluator: E)
    where
        E: FnMut(&G) -> f32,
    {
        for genome in self.species_set.genomes_mut() {
            let fitness = evaluator(genome);
            genome.set_fitness(fitness);
        }
    }

    /// Runs evolution until the fitness criterion reaches the
    /// [fitness threshold], or `generations` generations have
    /// been evaluated, whichever comes first. If `generations`
    /// is `None`, only the threshold can stop the run.
    ///
    /// Each generation the fitness function receives every
    /// genome of the population, sorted by key, and must
    /// assign each a finite fitness. It should not otherwise
    /// modify the genomes.
    ///
    /// Returns the best genome ever seen.
    ///
    /// # Errors
    /// Returns an error if:
    /// - [`no_fitness_termination`] is set and no generation limit is given.
    /// - The fitness function leaves a genome without a finite fitness.
    /// - All species stagnate and [`reset_on_extinction`] is disabled.
    ///
    /// [fitness threshold]: PopulationConfig::fitness_threshold
    /// [`no_fitness_termination`]: PopulationConfig::no_fitness_termination
    /// [`reset_on_extinction`]: PopulationConfig::reset_on_extinction
    ///
    /// # Examples
    /// ```
    /// # use ferroneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use ferroneat::{Genome, Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig {
    ///         size: std::num::NonZeroUsize::new(20).unwrap(),
    ///         fitness_threshold: 1000.0,
    ///         distance_threshold: 100.0,
    ///         survival_threshold: 0.5,
    ///         stagnation_threshold: std::num::NonZeroUsize::new(20).unwrap(),
    ///         species_elitism: 1,
    ///         ..PopulationConfig::zero()
    ///     },
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// let best = population.run(|genomes, _config| {
    ///     for (key, genome) in genomes.iter_mut() {
    ///         genome.set_fitness(*key as f32);
    ///     }
    /// }, Some(5)).unwrap();
    ///
    /// assert!(best.is_some());
    /// assert_eq!(population.generation(), 5);
    /// ```
    pub fn run<F>(&mut self, mut fitness_function: F, generations: Option<usize>) -> Result<Option<G>, EvolutionError>
    where
        F: FnMut(&mut [(GenomeKey, &mut G)], &C),
    {
        if self.population_config.no_fitness_termination && generations.is_none() {
            return Err(ConfigError::new(
                "population",
                "no_fitness_termination",
                "requires a generation limit",
            )
            .into());
        }

        let mut evaluated = 0;
        while generations.map_or(true, |n| evaluated < n) {
            evaluated += 1;
            info!("Running generation {}", self.generation);

            {
                let mut genomes: Vec<(GenomeKey, &mut G)> = self
                    .species_set
                    .genomes_mut()
                    .map(|g| (g.key(), g))
                    .collect();
                genomes.sort_unstable_by_key(|(k, _)| *k);
                fitness_function(&mut genomes, &self.genetic_config);
            }

            self.check_fitness()?;
            self.update_best_genome();
            if !self.population_config.no_fitness_termination {
                let criterion = self.fitness_criterion_value();
                if criterion >= self.population_config.fitness_threshold {
                    info!(
                        "Fitness threshold reached in generation {} ({} fitness {})",
                        self.generation, self.population_config.fitness_criterion, criterion
                    );
                    return Ok(self.best_genome.clone());
                }
            }
            self.advance()?;
        }

        Ok(self.best_genome.clone())
    }

    /// Evolves the population by one generation, after
    /// its fitness has been evaluated with [`evaluate_fitness`].
    ///
    /// Stagnated species are removed, the remaining species are
    /// allotted offspring, and the offspring are speciated.
    ///
    /// # Errors
    /// Returns an error if a genome is missing its fitness or
    /// has a non-finite fitness, or if the population went
    /// extinct and [`reset_on_extinction`] is disabled.
    ///
    /// [`evaluate_fitness`]: Population::evaluate_fitness
    /// [`reset_on_extinction`]: PopulationConfig::reset_on_extinction
    ///
    /// # Examples
    /// ```
    /// # use ferroneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use ferroneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig {
    ///         survival_threshold: 1.0,
    ///         ..PopulationConfig::zero()
    ///     },
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// // Evolving before evaluating is an error.
    /// assert!(population.evolve().is_err());
    ///
    /// population.evaluate_fitness(|_| 1.0);
    /// if let Err(e) = population.evolve() {
    ///     eprintln!("{}", e);
    /// }
    /// ```
    pub fn evolve(&mut self) -> Result<(), EvolutionError> {
        self.check_fitness()?;
        self.update_best_genome();
        self.advance()
    }

    /// Checks that every genome has a finite fitness.
    fn check_fitness(&self) -> Result<(), EvolutionError> {
        for genome in self.species_set.genomes() {
            match genome.fitness() {
                None => return Err(EvolutionError::MissingFitness { genome: genome.key() }),
                Some(fitness) if !fitness.is_finite() => {
                    return Err(EvolutionError::NonFiniteFitness {
                        genome: genome.key(),
                        fitness,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn update_best_genome(&mut self) {
        let best_fitness = self
            .best_genome
            .as_ref()
            .and_then(G::fitness)
            .unwrap_or(f32::NEG_INFINITY);
        let improved = self
            .champion()
            .filter(|g| g.fitness().map_or(false, |f| f > best_fitness))
            .cloned();
        if improved.is_some() {
            self.best_genome = improved;
        }
    }

    fn fitness_criterion_value(&self) -> f32 {
        let fitnesses: Vec<f32> = self.species_set.genomes().filter_map(G::fitness).collect();
        match self.population_config.fitness_criterion {
            FitnessCriterion::Max => logging::max(&fitnesses),
            FitnessCriterion::Min => logging::min(&fitnesses),
            FitnessCriterion::Mean => logging::mean(&fitnesses),
        }
    }

    /// Reproduces and re-speciates the evaluated population.
    fn advance(&mut self) -> Result<(), EvolutionError> {
        let mut offspring = self.reproduction.reproduce(
            &mut self.species_set,
            &self.population_config,
            &self.genetic_config,
            self.generation,
            &mut self.rng,
        )?;

        if self.species_set.is_empty() {
            if !self.population_config.reset_on_extinction {
                info!("Complete extinction in generation {}", self.generation);
                return Err(EvolutionError::CompleteExtinction);
            }
            info!(
                "Complete extinction in generation {}, creating a new population",
                self.generation
            );
            offspring = self.reproduction.create_new(
                &self.genetic_config,
                self.population_config.size.get(),
                &mut self.rng,
            );
        }
        assert_eq!(
            offspring.len(),
            self.population_config.size.get(),
            "reproduction produced {} genomes for a population of {}",
            offspring.len(),
            self.population_config.size.get()
        );

        self.species_set.speciate(
            offspring,
            self.generation,
            self.population_config.distance_threshold,
            &self.genetic_config,
        );
        self.generation += 1;
        Ok(())
    }

    /// Resets the population to an initial randomized state.
    /// If the population is seeded, the initial state is
    /// the same as that of a new population.
    ///
    /// # Examples
    /// ```
    /// # use ferroneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use ferroneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig::zero(),
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// // Evolve the population on some task, until
    /// // population.evolve() returns an Err.
    /// population.reset();
    /// assert_eq!(population.generation(), 0);
    /// ```
    pub fn reset(&mut self)
    where
        C: Clone,
    {
        *self = Self::initialize(self.population_config.clone(), self.genetic_config.clone());
    }

    /// Returns the currently best-performing genome,
    /// or `None` if no genome has been evaluated.
    ///
    /// # Examples
    /// ```
    /// # use ferroneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use ferroneat::{Genome, Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig {
    ///         size: std::num::NonZeroUsize::new(20).unwrap(),
    ///         ..PopulationConfig::zero()
    ///     },
    ///     genetic_config,
    /// ).unwrap();
    ///
    /// assert!(population.champion().is_none());
    ///
    /// let mut fitness = 0.0;
    /// population.evaluate_fitness(move |g| {
    ///     fitness += 10.0;
    ///     fitness
    /// });
    ///
    /// assert_eq!(population.champion().unwrap().fitness(), Some(20.0 * 10.0));
    /// ```
    pub fn champion(&self) -> Option<&G> {
        self.species_set
            .genomes()
            .filter_map(|g| g.fitness().map(|f| (f, g)))
            .max_by(|(f1, _), (f2, _)| f1.total_cmp(f2))
            .map(|(_, g)| g)
    }

    /// Returns the best genome seen in any evaluated generation.
    pub fn best_genome(&self) -> Option<&G> {
        self.best_genome.as_ref()
    }

    /// Returns an iterator over all current genomes.
    ///
    /// # Examples
    /// ```
    /// # use ferroneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use ferroneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, _, G>::new(PopulationConfig::zero(), genetic_config).unwrap();
    ///
    /// for genome in population.genomes() {
    ///     println!("{}", genome);
    /// }
    /// ```
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.species_set.genomes()
    }

    /// Returns the population's species.
    ///
    /// # Examples
    /// ```
    /// # use ferroneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use ferroneat::{Genome, Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, _, G>::new(PopulationConfig::zero(), genetic_config).unwrap();
    ///
    /// for species in population.species().iter() {
    ///     println!(
    ///         "Species {} contains the genomes {:?}",
    ///         species.key(),
    ///         species.members().map(|g| g.key()).collect::<Vec<_>>()
    ///     );
    /// }
    /// ```
    pub fn species(&self) -> &SpeciesSet<G> {
        &self.species_set
    }

    /// Returns the current generation number.
    ///
    /// # Examples
    /// ```
    /// # use ferroneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use ferroneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::zero();
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, _, G>::new(PopulationConfig::zero(), genetic_config).unwrap();
    ///
    /// assert_eq!(population.generation(), 0);
    /// ```
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the population's innovation history.
    pub fn history(&self) -> &H {
        self.reproduction.history()
    }

    /// Returns the population's reproduction state,
    /// including the ancestry of every genome.
    pub fn reproduction(&self) -> &Reproduction<H> {
        &self.reproduction
    }

    /// Returns the population's configuration.
    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    /// Returns the genetic configuration.
    pub fn genetic_config(&self) -> &C {
        &self.genetic_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::testing::{config, MutationCounter, TraitConfig, TraitGenome};

    use std::num::NonZeroUsize;

    type TestPopulation = Population<TraitConfig, MutationCounter, TraitGenome>;

    fn population_config() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::new(40).unwrap(),
            fitness_threshold: 100.0,
            distance_threshold: 0.6,
            elitism: 1,
            survival_threshold: 0.3,
            sexual_reproduction_chance: 0.75,
            stagnation_threshold: NonZeroUsize::new(15).unwrap(),
            species_elitism: 1,
            seed: Some(5),
            ..PopulationConfig::zero()
        }
    }

    /// Genomes closer to (0.5, 0.5) are fitter.
    fn closeness(genome: &TraitGenome) -> f32 {
        10.0 - genome.traits.iter().map(|t| (t - 0.5).abs()).sum::<f32>()
    }

    fn evaluate(genomes: &mut [(GenomeKey, &mut TraitGenome)], _: &TraitConfig) {
        for (_, genome) in genomes.iter_mut() {
            let fitness = closeness(genome);
            genome.set_fitness(fitness);
        }
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let result = TestPopulation::new(
            PopulationConfig {
                survival_threshold: 1.1,
                ..population_config()
            },
            config(),
        );
        assert_eq!(result.err().map(|e| e.field().to_owned()), Some("survival_threshold".into()));

        let result = TestPopulation::new(
            population_config(),
            TraitConfig {
                trait_count: 0,
                ..config()
            },
        );
        assert_eq!(result.err().map(|e| e.section()), Some("trait"));
    }

    #[test]
    fn population_size_is_conserved() {
        let mut population = TestPopulation::new(population_config(), config()).unwrap();
        for generation in 0..10 {
            population.evaluate_fitness(closeness);
            population.evolve().unwrap();
            assert_eq!(population.genomes().count(), 40);
            assert_eq!(population.generation(), generation + 1);
            assert_eq!(
                population.species().iter().map(|s| s.len()).sum::<usize>(),
                40
            );
        }
        assert_eq!(population.history().resets, 10);
    }

    #[test]
    fn missing_fitness_is_reported() {
        let mut population = TestPopulation::new(population_config(), config()).unwrap();
        let error = population
            .run(
                |genomes, _| {
                    for (key, genome) in genomes.iter_mut() {
                        if *key != 7 {
                            genome.set_fitness(1.0);
                        }
                    }
                },
                Some(1),
            )
            .unwrap_err();
        assert_eq!(error, EvolutionError::MissingFitness { genome: 7 });
        assert!(error.to_string().contains('7'));
    }

    #[test]
    fn non_finite_fitness_is_reported() {
        let mut population = TestPopulation::new(population_config(), config()).unwrap();
        population.evaluate_fitness(|g| if g.key == 3 { f32::NAN } else { 0.0 });
        match population.evolve() {
            Err(EvolutionError::NonFiniteFitness { genome, .. }) => assert_eq!(genome, 3),
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn run_stops_at_fitness_threshold() {
        let mut population = TestPopulation::new(
            PopulationConfig {
                fitness_threshold: 9.0,
                ..population_config()
            },
            config(),
        )
        .unwrap();
        let best = population.run(evaluate, Some(200)).unwrap().unwrap();
        assert!(best.fitness.unwrap() >= 9.0);
        assert!(population.generation() < 200);
    }

    #[test]
    fn run_stops_at_generation_limit() {
        let mut population = TestPopulation::new(population_config(), config()).unwrap();
        let best = population.run(evaluate, Some(4)).unwrap();
        assert!(best.is_some());
        assert_eq!(population.generation(), 4);
    }

    #[test]
    fn unbounded_run_requires_fitness_termination() {
        let mut population = TestPopulation::new(
            PopulationConfig {
                no_fitness_termination: true,
                ..population_config()
            },
            config(),
        )
        .unwrap();
        match population.run(evaluate, None) {
            Err(EvolutionError::Config(e)) => assert_eq!(e.field(), "no_fitness_termination"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    fn extinction_config(reset_on_extinction: bool) -> PopulationConfig {
        PopulationConfig {
            stagnation_threshold: NonZeroUsize::new(1).unwrap(),
            species_elitism: 0,
            reset_on_extinction,
            ..population_config()
        }
    }

    #[test]
    fn complete_extinction_is_an_error() {
        let mut population = TestPopulation::new(extinction_config(false), config()).unwrap();
        let result = population.run(|genomes, _| {
            for (_, genome) in genomes.iter_mut() {
                genome.set_fitness(1.0);
            }
        }, Some(10));
        assert_eq!(result.unwrap_err(), EvolutionError::CompleteExtinction);
    }

    #[test]
    fn extinction_can_reset_the_population() {
        let mut population = TestPopulation::new(extinction_config(true), config()).unwrap();
        let best = population
            .run(
                |genomes, _| {
                    for (_, genome) in genomes.iter_mut() {
                        genome.set_fitness(1.0);
                    }
                },
                Some(10),
            )
            .unwrap();
        assert_eq!(best.and_then(|g| g.fitness), Some(1.0));
        assert_eq!(population.generation(), 10);
        assert_eq!(population.genomes().count(), 40);
        // Keys keep increasing after the reset.
        assert!(population.genomes().all(|g| g.key > 40));
    }

    #[test]
    fn seeded_populations_are_reproducible() {
        let mut a = TestPopulation::new(population_config(), config()).unwrap();
        let mut b = TestPopulation::new(population_config(), config()).unwrap();
        a.run(evaluate, Some(6)).unwrap();
        b.run(evaluate, Some(6)).unwrap();
        let ga: Vec<&TraitGenome> = a.genomes().collect();
        let gb: Vec<&TraitGenome> = b.genomes().collect();
        assert_eq!(ga, gb);
    }

    #[test]
    fn resuming_from_snapshot_matches_uninterrupted_run() {
        let mut uninterrupted = TestPopulation::new(population_config(), config()).unwrap();
        uninterrupted.run(evaluate, Some(3)).unwrap();

        let mut interrupted = TestPopulation::new(population_config(), config()).unwrap();
        let saved = ron::to_string(&interrupted.snapshot()).unwrap();
        drop(interrupted);
        interrupted = TestPopulation::from_snapshot(ron::from_str(&saved).unwrap()).unwrap();
        interrupted.run(evaluate, Some(1)).unwrap();
        let saved = ron::to_string(&interrupted.snapshot()).unwrap();
        let mut resumed = TestPopulation::from_snapshot(ron::from_str(&saved).unwrap()).unwrap();
        resumed.run(evaluate, Some(2)).unwrap();

        assert_eq!(resumed.generation(), uninterrupted.generation());
        let a: Vec<&TraitGenome> = uninterrupted.genomes().collect();
        let b: Vec<&TraitGenome> = resumed.genomes().collect();
        assert_eq!(a, b);
        assert_eq!(
            resumed.reproduction().next_genome_key(),
            uninterrupted.reproduction().next_genome_key()
        );
    }
}

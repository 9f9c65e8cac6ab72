//! An implementation of NeuroEvolution of Augmenting Topologies,
//! following the 2002 paper: <http://nn.cs.utexas.edu/keyword?stanley:ec02>
//!
//! The engine is generic over the genome representation, via the [`Genome`]
//! and [`InnovationHistory`] traits. It handles speciation, stagnation, fitness
//! sharing and reproduction, and its complete state can be saved and restored
//! through a serializable [`Snapshot`]. A neural network-based genome, as in
//! the original algorithm, is supplied by the `ferroneat-nn` crate.
//!
//! Evolution is deterministic given a [seed]: all randomness is drawn
//! from a single generator owned by the population.
//!
//! [seed]: PopulationConfig::seed
//!
//! # Example usage: Evolution of XOR function approximator, using `ferroneat-nn`
//! ```
//! use ferroneat::{Genome, GenomeKey, Population, PopulationConfig};
//! use ferroneat_nn::{
//!     genomics::{
//!         ActivationType, AggregationType, BoolAttribute, ChoiceAttribute,
//!         FloatAttribute, GeneticConfig, InitialConnection, NNGenome,
//!     },
//!     networks::FeedForwardNetwork,
//! };
//! use std::num::NonZeroUsize;
//!
//! const XOR: [([f32; 2], f32); 4] = [
//!     ([0.0, 0.0], 0.0),
//!     ([0.0, 1.0], 1.0),
//!     ([1.0, 0.0], 1.0),
//!     ([1.0, 1.0], 0.0),
//! ];
//!
//! fn evaluate_xor(genomes: &mut [(GenomeKey, &mut NNGenome)], config: &GeneticConfig) {
//!     for (_, genome) in genomes.iter_mut() {
//!         let mut network = FeedForwardNetwork::create(genome, config);
//!         let mut fitness = 4.0;
//!         for (input, expected) in XOR {
//!             let output = network.activate(&input).unwrap()[0];
//!             fitness -= (output - expected).powi(2);
//!         }
//!         genome.set_fitness(fitness);
//!     }
//! }
//!
//! fn main() {
//!     let genetic_config = GeneticConfig {
//!         input_count: NonZeroUsize::new(2).unwrap(),
//!         output_count: NonZeroUsize::new(1).unwrap(),
//!         feed_forward: true,
//!         initial_connection: InitialConnection::FullDirect,
//!         disjoint_gene_factor: 1.0,
//!         common_gene_factor: 0.5,
//!         connection_addition_chance: 0.5,
//!         connection_deletion_chance: 0.5,
//!         node_addition_chance: 0.2,
//!         node_deletion_chance: 0.2,
//!         bias: FloatAttribute {
//!             mutate_rate: 0.7,
//!             mutate_power: 0.5,
//!             replace_rate: 0.1,
//!             ..FloatAttribute::gaussian(0.0, 1.0, 30.0)
//!         },
//!         response: FloatAttribute::constant(1.0),
//!         weight: FloatAttribute {
//!             mutate_rate: 0.8,
//!             mutate_power: 0.5,
//!             replace_rate: 0.1,
//!             ..FloatAttribute::gaussian(0.0, 1.0, 30.0)
//!         },
//!         enabled: BoolAttribute {
//!             mutate_rate: 0.01,
//!             ..BoolAttribute::fixed(true)
//!         },
//!         activation: ChoiceAttribute::fixed(ActivationType::Sigmoid),
//!         aggregation: ChoiceAttribute::fixed(AggregationType::Sum),
//!         ..GeneticConfig::zero()
//!     };
//!
//!     let population_config = PopulationConfig {
//!         size: NonZeroUsize::new(150).unwrap(),
//!         fitness_threshold: 3.9,
//!         reset_on_extinction: true,
//!         distance_threshold: 3.0,
//!         elitism: 2,
//!         survival_threshold: 0.2,
//!         min_species_size: NonZeroUsize::new(2).unwrap(),
//!         sexual_reproduction_chance: 1.0,
//!         stagnation_threshold: NonZeroUsize::new(20).unwrap(),
//!         species_elitism: 2,
//!         seed: Some(1),
//!         ..PopulationConfig::zero()
//!     };
//!
//!     let mut population = Population::new(population_config, genetic_config).unwrap();
//!     match population.run(evaluate_xor, Some(50)) {
//!         Ok(Some(best)) => println!("Best genome: {}", best),
//!         Ok(None) => println!("No genome was evaluated"),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

mod genome;
mod populations;
pub mod rng;

pub use genome::{Genome, InnovationHistory};
pub use populations::*;

/// Identifier type used to designate genomes.
/// Keys are assigned by a population, starting at 1,
/// and are never reused.
pub type GenomeKey = usize;

//! # ferroneat-nn
//! A neural network-based implementation of the `ferroneat` crate's `Genome` trait.
//!
//! Provides an [`NNGenome`] type usable in `ferroneat` `Population`s, the
//! [graph algorithms] used to order a genome's nodes for evaluation, and a
//! [`FeedForwardNetwork`] which can be generated from an [`NNGenome`].
//!
//! Network inputs are identified by the negative keys `-1, -2, …`,
//! and outputs by the keys `0, 1, …`. Hidden nodes take the keys
//! after the outputs.
//!
//! [`NNGenome`]: crate::genomics::NNGenome
//! [graph algorithms]: crate::graphs
//! [`FeedForwardNetwork`]: crate::networks::FeedForwardNetwork
//!
//! # Example usage: Evolution of XOR function approximator
//! ```
//! use ferroneat::{Genome, Population, PopulationConfig};
//! use ferroneat_nn::{
//!     genomics::{FloatAttribute, GeneticConfig, InitialConnection, NNGenome},
//!     networks::FeedForwardNetwork,
//! };
//! use std::num::NonZeroUsize;
//!
//! fn main() {
//!     let genetic_config = GeneticConfig {
//!         input_count: NonZeroUsize::new(2).unwrap(),
//!         output_count: NonZeroUsize::new(1).unwrap(),
//!         initial_connection: InitialConnection::FullDirect,
//!         disjoint_gene_factor: 1.0,
//!         common_gene_factor: 0.5,
//!         connection_addition_chance: 0.5,
//!         node_addition_chance: 0.2,
//!         response: FloatAttribute::constant(1.0),
//!         weight: FloatAttribute {
//!             mutate_rate: 0.8,
//!             mutate_power: 0.5,
//!             ..FloatAttribute::gaussian(0.0, 1.0, 30.0)
//!         },
//!         ..GeneticConfig::zero()
//!     };
//!     let network_config = genetic_config.clone();
//!
//!     let population_config = PopulationConfig {
//!         size: NonZeroUsize::new(100).unwrap(),
//!         distance_threshold: 3.0,
//!         elitism: 1,
//!         survival_threshold: 0.2,
//!         sexual_reproduction_chance: 0.8,
//!         stagnation_threshold: NonZeroUsize::new(15).unwrap(),
//!         species_elitism: 1,
//!         ..PopulationConfig::zero()
//!     };
//!
//!     let mut population = Population::<_, _, NNGenome>::new(population_config, genetic_config).unwrap();
//!     for _ in 0..20 {
//!         population.evaluate_fitness(|genome| {
//!             let mut network = FeedForwardNetwork::create(genome, &network_config);
//!             let mut fitness = 4.0;
//!             for (input, expected) in [([0.0, 0.0], 0.0), ([0.0, 1.0], 1.0), ([1.0, 0.0], 1.0), ([1.0, 1.0], 0.0)] {
//!                 fitness -= (network.activate(&input).unwrap()[0] - expected).powi(2);
//!             }
//!             fitness
//!         });
//!         if population.champion().and_then(|g| g.fitness()).unwrap_or(0.0) > 3.9 {
//!             println!("Solution found!: {}", population.champion().unwrap());
//!             break;
//!         }
//!         if let Err(e) = population.evolve() {
//!             eprintln!("{}", e);
//!             break;
//!         }
//!     }
//! }
//! ```

pub mod genomics;
pub mod graphs;
pub mod networks;

/// Identifier type used to designate historically
/// identical mutations for the purposes of
/// genome comparison and genetic tracking.
pub type Innovation = usize;

/// Identifier type of a network node.
/// Inputs are negative, outputs start at 0.
pub type NodeKey = i64;

/// The structural identity of a connection:
/// its `(input, output)` node pair.
pub type ConnectionKey = (NodeKey, NodeKey);

//! Genomes are the focus of evolution in NEAT.
//! They are a collection of node and connection genes that can be
//! instantiated as a phenotype (a neural network). Genomes can be
//! progressively mutated, thus adding complexity and functionality.

mod attributes;
mod config;
mod errors;
mod genes;
mod history;
mod nodes;

pub use attributes::{
    Attribute, AttributeKind, BoolAttribute, ChoiceAttribute, FloatAttribute, InitType,
};
pub use config::{GeneticConfig, InitialConnection};
pub use errors::*;
pub use genes::ConnectionGene;
pub use history::{InnovationTracker, MutationKind};
pub use nodes::{ActivationType, AggregationType, NodeGene};

use crate::graphs::creates_cycle;
use crate::{ConnectionKey, Innovation, NodeKey};

use ferroneat::{ConfigError, Genome, GenomeKey};
use log::debug;
use rand::prelude::{IteratorRandom, Rng, SliceRandom};
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::fmt;

/// The outcome of a successful connection addition mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionAddition {
    /// A new connection was created.
    Added(ConnectionKey),
    /// The connection already existed, and was enabled.
    Reenabled(ConnectionKey),
}

/// The structural mutations, in the order
/// they are attempted.
#[derive(Clone, Copy)]
enum StructuralMutation {
    AddNode,
    DeleteNode,
    AddConnection,
    DeleteConnection,
}

/// A collection of node and connection genes.
///
/// Nodes are keyed by [`NodeKey`], and connections by their
/// `(input, output)` endpoints. Network inputs are not stored
/// as nodes: they are referred to by the negative keys
/// `-1, -2, …`, while the output nodes `0, 1, …` are always
/// present.
///
/// Supports Serde for convenient genome saving and loading.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NNGenome {
    key: GenomeKey,
    nodes: BTreeMap<NodeKey, NodeGene>,
    connections: BTreeMap<ConnectionKey, ConnectionGene>,
    fitness: Option<f32>,
}

impl Genome for NNGenome {
    type Config = GeneticConfig;
    type InnovationHistory = InnovationTracker;

    fn validate_config(config: &GeneticConfig) -> Result<(), ConfigError> {
        config.validate()
    }

    fn new<R: Rng + ?Sized>(
        key: GenomeKey,
        config: &GeneticConfig,
        history: &mut InnovationTracker,
        rng: &mut R,
    ) -> NNGenome {
        Self::configure_new(key, config, history, rng)
    }

    /// The fitter parent is the _primary_ parent, with ties going
    /// to `parent2`. The child has the nodes and unmatched connections
    /// of the primary parent, while connections present in both
    /// parents inherit their attributes from either at random.
    fn crossover<R: Rng + ?Sized>(
        key: GenomeKey,
        parent1: &NNGenome,
        parent2: &NNGenome,
        _: &GeneticConfig,
        rng: &mut R,
    ) -> NNGenome {
        let fitness = |g: &NNGenome| g.fitness.unwrap_or(f32::NEG_INFINITY);
        let (primary, secondary) = if fitness(parent1) > fitness(parent2) {
            (parent1, parent2)
        } else {
            (parent2, parent1)
        };

        let homologous = secondary.connections_by_innovation();
        let connections = primary
            .connections
            .iter()
            .map(|(&k, gene)| {
                let child_gene = match homologous.get(&gene.innovation()) {
                    Some(other) => gene.crossover(other, rng),
                    None => gene.clone(),
                };
                (k, child_gene)
            })
            .collect();

        NNGenome {
            key,
            nodes: primary.nodes.clone(),
            connections,
            fitness: None,
        }
    }

    fn clone_with_key(&self, key: GenomeKey) -> NNGenome {
        NNGenome {
            key,
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
            fitness: None,
        }
    }

    /// Applies structural mutations according to their configured
    /// chances, then mutates the attributes of every connection
    /// and node.
    ///
    /// Structural mutations that cannot be carried out are skipped.
    fn mutate<R: Rng + ?Sized>(
        &mut self,
        history: &mut InnovationTracker,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        use StructuralMutation::*;
        let chances = [
            (AddNode, config.node_addition_chance),
            (DeleteNode, config.node_deletion_chance),
            (AddConnection, config.connection_addition_chance),
            (DeleteConnection, config.connection_deletion_chance),
        ];
        if config.single_structural_mutation {
            let divisor = chances.iter().map(|(_, c)| c).sum::<f32>().max(1.0);
            let r = rng.gen::<f32>();
            let mut cumulative = 0.0;
            for (mutation, chance) in chances {
                cumulative += chance / divisor;
                if r < cumulative {
                    self.apply_structural_mutation(mutation, history, config, rng);
                    break;
                }
            }
        } else {
            for (mutation, chance) in chances {
                if rng.gen::<f32>() < chance {
                    self.apply_structural_mutation(mutation, history, config, rng);
                }
            }
        }

        for gene in self.connections.values_mut() {
            gene.mutate(config, rng);
        }
        for node in self.nodes.values_mut() {
            node.mutate(config, rng);
        }
    }

    fn genetic_distance(first: &NNGenome, second: &NNGenome, config: &GeneticConfig) -> f32 {
        first.distance(second, config)
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

impl NNGenome {
    /// Creates a new genome with the specified configuration.
    ///
    /// The genome has `output_count` output nodes and `hidden_count`
    /// hidden nodes, with attributes initialized as configured, and
    /// connections laid out according to [`initial_connection`].
    /// Connection innovation numbers are assigned by the `tracker`,
    /// so all genomes created in the same generation share them.
    ///
    /// [`initial_connection`]: GeneticConfig::initial_connection
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{GeneticConfig, InitialConnection, InnovationTracker, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(3).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     initial_connection: InitialConnection::FullDirect,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut tracker = InnovationTracker::new(&config);
    ///
    /// let genome = NNGenome::configure_new(1, &config, &mut tracker, &mut ChaCha8Rng::seed_from_u64(0));
    ///
    /// // Inputs are not nodes.
    /// assert_eq!(genome.nodes().count(), 2);
    /// // Every input is connected to every output.
    /// assert_eq!(genome.connections().count(), 3 * 2);
    /// assert!(genome.connections().all(|c| (1..=6).contains(&c.innovation())));
    /// ```
    pub fn configure_new<R: Rng + ?Sized>(
        key: GenomeKey,
        config: &GeneticConfig,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> NNGenome {
        let output_count = config.output_count.get();
        let hidden: Vec<NodeKey> = (output_count..output_count + config.hidden_count)
            .map(|k| k as NodeKey)
            .collect();

        let nodes = config
            .output_keys()
            .chain(hidden.iter().copied())
            .map(|k| (k, NodeGene::random(k, config, rng)))
            .collect();

        let mut genome = NNGenome {
            key,
            nodes,
            connections: BTreeMap::new(),
            fitness: None,
        };

        let layout = match config.initial_connection {
            InitialConnection::Unconnected => vec![],
            InitialConnection::FsNeatNoHidden => Self::fs_neat_connections(config, &[], rng),
            InitialConnection::FsNeatHidden => Self::fs_neat_connections(config, &hidden, rng),
            InitialConnection::FullNoDirect => genome.full_connections(config, &hidden, false),
            InitialConnection::FullDirect => genome.full_connections(config, &hidden, true),
            InitialConnection::PartialNoDirect(fraction) => {
                let all = genome.full_connections(config, &hidden, false);
                Self::partial_connections(all, fraction, rng)
            }
            InitialConnection::PartialDirect(fraction) => {
                let all = genome.full_connections(config, &hidden, true);
                Self::partial_connections(all, fraction, rng)
            }
        };

        for (input, output) in layout {
            let innovation =
                tracker.get_innovation_number(input, output, MutationKind::InitialConnection);
            genome.connections.insert(
                (input, output),
                ConnectionGene::random(innovation, (input, output), config, rng),
            );
        }

        genome
    }

    /// Connections from one random input
    /// to every hidden and output node.
    fn fs_neat_connections<R: Rng + ?Sized>(
        config: &GeneticConfig,
        hidden: &[NodeKey],
        rng: &mut R,
    ) -> Vec<ConnectionKey> {
        match config.input_keys().choose(rng) {
            Some(input) => hidden
                .iter()
                .copied()
                .chain(config.output_keys())
                .map(|o| (input, o))
                .collect(),
            None => vec![],
        }
    }

    /// Connections from inputs to hidden nodes and from hidden
    /// nodes to outputs. Inputs connect directly to outputs if
    /// `direct` is set, or if there are no hidden nodes.
    /// Recurrent genomes also get a self-connection on every node.
    fn full_connections(
        &self,
        config: &GeneticConfig,
        hidden: &[NodeKey],
        direct: bool,
    ) -> Vec<ConnectionKey> {
        let mut connections = vec![];
        for i in config.input_keys() {
            connections.extend(hidden.iter().map(|&h| (i, h)));
        }
        for &h in hidden {
            connections.extend(config.output_keys().map(|o| (h, o)));
        }
        if direct || hidden.is_empty() {
            for i in config.input_keys() {
                connections.extend(config.output_keys().map(|o| (i, o)));
            }
        }
        if !config.feed_forward {
            connections.extend(self.nodes.keys().map(|&k| (k, k)));
        }
        connections
    }

    fn partial_connections<R: Rng + ?Sized>(
        mut all: Vec<ConnectionKey>,
        fraction: f32,
        rng: &mut R,
    ) -> Vec<ConnectionKey> {
        let count = (fraction * all.len() as f32).round() as usize;
        all.shuffle(rng);
        all.truncate(count);
        all
    }

    fn apply_structural_mutation<R: Rng + ?Sized>(
        &mut self,
        mutation: StructuralMutation,
        tracker: &mut InnovationTracker,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        match mutation {
            StructuralMutation::AddNode => {
                if let Err(e) = self.mutate_add_node(config, tracker, rng) {
                    debug!("genome {}: {}", self.key, e);
                }
            }
            StructuralMutation::DeleteNode => {
                if self.mutate_delete_node(config, rng).is_none() {
                    debug!("genome {}: no hidden node to delete", self.key);
                }
            }
            StructuralMutation::AddConnection => {
                if let Err(e) = self.mutate_add_connection(config, tracker, rng) {
                    debug!("genome {}: {}", self.key, e);
                }
            }
            StructuralMutation::DeleteConnection => {
                if self.mutate_delete_connection(rng).is_none() {
                    debug!("genome {}: no connection to delete", self.key);
                }
            }
        }
    }

    /// Induces a _node addition mutation_ in the genome.
    ///
    /// A random enabled connection `i -> o` is disabled and
    /// split in two by a new node `n`, with connections
    /// `i -> n` (weight 1) and `n -> o` (the split connection's
    /// weight). The new node has a bias of 0.
    ///
    /// Returns the key of the new node.
    ///
    /// # Errors
    /// Returns an error if the genome has no enabled connection.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{GeneticConfig, InitialConnection, InnovationTracker, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig {
    ///     initial_connection: InitialConnection::FullDirect,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut tracker = InnovationTracker::new(&config);
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let mut genome = NNGenome::configure_new(1, &config, &mut tracker, &mut rng);
    ///
    /// let node = genome.mutate_add_node(&config, &mut tracker, &mut rng).unwrap();
    ///
    /// assert!(!genome.connection((-1, 0)).unwrap().enabled);
    /// assert_eq!(genome.connection((-1, node)).unwrap().weight, 1.0);
    /// assert_eq!(genome.node(node).unwrap().bias, 0.0);
    /// ```
    pub fn mutate_add_node<R: Rng + ?Sized>(
        &mut self,
        config: &GeneticConfig,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Result<NodeKey, NodeAdditionMutationError> {
        let split = self
            .connections
            .values_mut()
            .filter(|c| c.enabled)
            .choose(rng)
            .ok_or(NodeAdditionMutationError::NoConnectionToSplit)?;
        split.enabled = false;
        let (input, output) = split.key();
        let (weight, innovation) = (split.weight, split.innovation());

        let mut node_key = tracker.split_node_key(innovation);
        // The genome already split this connection earlier in the generation.
        if self.nodes.contains_key(&node_key) {
            node_key = tracker.allocate_node_key();
        }

        let mut node = NodeGene::random(node_key, config, rng);
        node.bias = 0.0;
        self.nodes.insert(node_key, node);

        let in_innovation = tracker.get_innovation_number(input, node_key, MutationKind::AddNodeIn);
        let out_innovation =
            tracker.get_innovation_number(node_key, output, MutationKind::AddNodeOut);
        self.connections.insert(
            (input, node_key),
            ConnectionGene::new(in_innovation, input, node_key, 1.0),
        );
        self.connections.insert(
            (node_key, output),
            ConnectionGene::new(out_innovation, node_key, output, weight),
        );

        Ok(node_key)
    }

    /// Induces a _connection addition mutation_ in the genome.
    ///
    /// The output endpoint is a random node, and the input endpoint
    /// a random node or network input. An already present connection
    /// is enabled instead.
    ///
    /// # Errors
    /// Returns an error if both endpoints are output nodes, or if the
    /// connection would create a cycle in a feed-forward genome.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{
    ///     ConnectionAddition, GeneticConfig, InnovationTracker, NNGenome,
    /// };
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// // A single input and a single output can only be connected one way.
    /// let config = GeneticConfig::zero();
    /// let mut tracker = InnovationTracker::new(&config);
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let mut genome = NNGenome::configure_new(1, &config, &mut tracker, &mut rng);
    ///
    /// let mut added = None;
    /// while added.is_none() {
    ///     added = genome.mutate_add_connection(&config, &mut tracker, &mut rng).ok();
    /// }
    /// assert_eq!(added, Some(ConnectionAddition::Added((-1, 0))));
    /// ```
    pub fn mutate_add_connection<R: Rng + ?Sized>(
        &mut self,
        config: &GeneticConfig,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Result<ConnectionAddition, ConnectionAdditionMutationError> {
        // Output nodes are never removed, so there is always a candidate.
        let output = self
            .nodes
            .keys()
            .copied()
            .choose(rng)
            .unwrap_or_else(|| panic!("genome {} has no output nodes", self.key));
        let input = config
            .input_keys()
            .chain(self.nodes.keys().copied())
            .choose(rng)
            .unwrap_or_else(|| panic!("genome {} has no connection inputs", self.key));
        let key = (input, output);

        if let Some(gene) = self.connections.get_mut(&key) {
            gene.enabled = true;
            return Ok(ConnectionAddition::Reenabled(key));
        }

        let outputs = 0..config.output_count.get() as NodeKey;
        if outputs.contains(&input) && outputs.contains(&output) {
            return Err(ConnectionAdditionMutationError::OutputToOutput(key));
        }
        if config.feed_forward {
            let existing: Vec<ConnectionKey> = self.connections.keys().copied().collect();
            if creates_cycle(&existing, key) {
                return Err(ConnectionAdditionMutationError::CreatesCycle(key));
            }
        }

        let innovation = tracker.get_innovation_number(input, output, MutationKind::AddConnection);
        self.connections
            .insert(key, ConnectionGene::random(innovation, key, config, rng));
        Ok(ConnectionAddition::Added(key))
    }

    /// Deletes a randomly-chosen non-output node,
    /// and all incident connections, from the genome.
    ///
    /// Returns `None` if there are no such nodes, or
    /// `Some((node, incident_connections))` otherwise.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{
    ///     ActivationType, AggregationType, ConnectionGene, GeneticConfig,
    ///     InnovationTracker, NNGenome, NodeGene,
    /// };
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig::zero();
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let mut genome = NNGenome::configure_new(1, &config, &mut InnovationTracker::new(&config), &mut rng);
    ///
    /// // Output nodes are never deleted.
    /// assert!(genome.mutate_delete_node(&config, &mut rng).is_none());
    ///
    /// genome.add_node(NodeGene::new(42, 0.0, 1.0, ActivationType::Relu, AggregationType::Sum)).unwrap();
    /// genome.add_connection(ConnectionGene::new(16, -1, 42, 1.0)).unwrap();
    /// genome.add_connection(ConnectionGene::new(17, 42, 0, 1.0)).unwrap();
    ///
    /// let (removed_node, removed_connections) = genome.mutate_delete_node(&config, &mut rng).unwrap();
    ///
    /// assert_eq!(removed_node.key(), 42);
    /// assert_eq!(removed_connections.len(), 2);
    /// assert_eq!(genome.connections().count(), 0);
    /// ```
    pub fn mutate_delete_node<R: Rng + ?Sized>(
        &mut self,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Option<(NodeGene, Vec<ConnectionGene>)> {
        let outputs = 0..config.output_count.get() as NodeKey;
        let key = self
            .nodes
            .keys()
            .copied()
            .filter(|k| !outputs.contains(k))
            .choose(rng)?;
        let node = self.nodes.remove(&key)?;

        let incident: Vec<ConnectionKey> = self
            .connections
            .keys()
            .copied()
            .filter(|&(i, o)| i == key || o == key)
            .collect();
        let removed = incident
            .into_iter()
            .filter_map(|k| self.connections.remove(&k))
            .collect();

        Some((node, removed))
    }

    /// Deletes a randomly-chosen connection from the genome.
    ///
    /// Returns `None` if the genome has no connections.
    pub fn mutate_delete_connection<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Option<ConnectionGene> {
        let key = self.connections.keys().copied().choose(rng)?;
        self.connections.remove(&key)
    }

    /// Returns the genetic distance between two genomes.
    ///
    /// Nodes are matched by key, and connections by innovation
    /// number. For each kind of gene, the distance is the sum of
    /// the distances between matching genes plus [`disjoint_gene_factor`]
    /// for every unmatched gene, divided by the size of the larger
    /// genome. The node and connection distances are added.
    ///
    /// [`disjoint_gene_factor`]: GeneticConfig::disjoint_gene_factor
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{ConnectionGene, GeneticConfig, InnovationTracker, NNGenome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig {
    ///     disjoint_gene_factor: 1.0,
    ///     common_gene_factor: 0.5,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut tracker = InnovationTracker::new(&config);
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let mut first = NNGenome::configure_new(1, &config, &mut tracker, &mut rng);
    /// let mut second = NNGenome::configure_new(2, &config, &mut tracker, &mut rng);
    ///
    /// // Identical (constant-attribute) output nodes.
    /// assert_eq!(first.distance(&second, &config), 0.0);
    ///
    /// first.add_connection(ConnectionGene::new(1, -1, 0, 1.0)).unwrap();
    /// second.add_connection(ConnectionGene::new(1, -1, 0, 3.0)).unwrap();
    /// second.add_connection(ConnectionGene::new(2, 0, 0, 3.0)).unwrap();
    ///
    /// // One matching connection 2.0 apart, and one unmatched, out of two.
    /// assert_eq!(first.distance(&second, &config), (2.0 * 0.5 + 1.0) / 2.0);
    /// assert_eq!(second.distance(&first, &config), first.distance(&second, &config));
    /// ```
    pub fn distance(&self, other: &NNGenome, config: &GeneticConfig) -> f32 {
        let node_distance = gene_set_distance(
            &self.nodes,
            &other.nodes,
            |a, b| a.distance(b, config),
            config.disjoint_gene_factor,
        );
        let connection_distance = gene_set_distance(
            &self.connections_by_innovation(),
            &other.connections_by_innovation(),
            |a, b| a.distance(b, config),
            config.disjoint_gene_factor,
        );
        node_distance + connection_distance
    }

    /// Returns the genome's complexity as
    /// `(node count, enabled connection count)`.
    pub fn size(&self) -> (usize, usize) {
        (
            self.nodes.len(),
            self.connections.values().filter(|c| c.enabled).count(),
        )
    }

    /// Adds a node to the genome, returning a mutable
    /// reference to it.
    ///
    /// # Errors
    /// Returns an error if the key is negative (reserved for
    /// network inputs) or already present.
    pub fn add_node(&mut self, node: NodeGene) -> Result<&mut NodeGene, NodeValidityError> {
        let key = node.key();
        if key < 0 {
            Err(NodeValidityError::InputKey(key))
        } else if self.nodes.contains_key(&key) {
            Err(NodeValidityError::DuplicateKey(key))
        } else {
            Ok(self.nodes.entry(key).or_insert(node))
        }
    }

    /// Adds a connection to the genome, returning a mutable
    /// reference to it. Negative input keys are network inputs.
    ///
    /// # Errors
    /// Returns an error if the connection's output is a network
    /// input, if either endpoint is missing, or if the genome
    /// already has a connection with the same endpoints or
    /// innovation number.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{
    ///     ConnectionGene, GeneValidityError, GeneticConfig, InnovationTracker, NNGenome,
    /// };
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let config = GeneticConfig::zero();
    /// let mut genome = NNGenome::configure_new(
    ///     1,
    ///     &config,
    ///     &mut InnovationTracker::new(&config),
    ///     &mut ChaCha8Rng::seed_from_u64(0),
    /// );
    ///
    /// assert!(genome.add_connection(ConnectionGene::new(1, -1, 0, 1.0)).is_ok());
    /// assert_eq!(
    ///     genome.add_connection(ConnectionGene::new(2, -1, 0, 1.0)).unwrap_err(),
    ///     GeneValidityError::DuplicateEndpoints((-1, 0))
    /// );
    /// assert_eq!(
    ///     genome.add_connection(ConnectionGene::new(3, -1, 7, 1.0)).unwrap_err(),
    ///     GeneValidityError::NonexistentEndpoints((-1, 7))
    /// );
    /// ```
    pub fn add_connection(
        &mut self,
        gene: ConnectionGene,
    ) -> Result<&mut ConnectionGene, GeneValidityError> {
        let key = gene.key();
        let (input, output) = key;
        if output < 0 {
            Err(GeneValidityError::InputEndpoint(output))
        } else if !((input < 0 || self.nodes.contains_key(&input))
            && self.nodes.contains_key(&output))
        {
            Err(GeneValidityError::NonexistentEndpoints(key))
        } else if self.connections.contains_key(&key) {
            Err(GeneValidityError::DuplicateEndpoints(key))
        } else if self.connection_by_innovation(gene.innovation()).is_some() {
            Err(GeneValidityError::DuplicateInnovation(gene.innovation()))
        } else {
            Ok(self.connections.entry(key).or_insert(gene))
        }
    }

    /// Returns an iterator over the genome's nodes, in key order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeGene> {
        self.nodes.values()
    }

    /// Returns an iterator over the genome's connections,
    /// in `(input, output)` order.
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionGene> {
        self.connections.values()
    }

    /// Returns the node with the specified key, if present.
    pub fn node(&self, key: NodeKey) -> Option<&NodeGene> {
        self.nodes.get(&key)
    }

    /// Returns the connection between the specified endpoints, if present.
    pub fn connection(&self, key: ConnectionKey) -> Option<&ConnectionGene> {
        self.connections.get(&key)
    }

    /// Returns the connection with the specified innovation number, if present.
    pub fn connection_by_innovation(&self, innovation: Innovation) -> Option<&ConnectionGene> {
        self.connections
            .values()
            .find(|c| c.innovation() == innovation)
    }

    /// Returns the genome's connections indexed by innovation number.
    pub fn connections_by_innovation(&self) -> BTreeMap<Innovation, &ConnectionGene> {
        self.connections
            .values()
            .map(|c| (c.innovation(), c))
            .collect()
    }
}

/// `(Σ matching distances + disjoint_factor ⨯ unmatched) / larger size`,
/// or 0 if both sets are empty.
fn gene_set_distance<K: Ord, V>(
    first: &BTreeMap<K, V>,
    second: &BTreeMap<K, V>,
    distance: impl Fn(&V, &V) -> f32,
    disjoint_factor: f32,
) -> f32 {
    let larger = first.len().max(second.len());
    if larger == 0 {
        return 0.0;
    }
    let mut matching = 0.0;
    let mut unmatched = 0;
    for (k, a) in first {
        match second.get(k) {
            Some(b) => matching += distance(a, b),
            None => unmatched += 1,
        }
    }
    unmatched += second.keys().filter(|k| !first.contains_key(k)).count();
    (matching + disjoint_factor * unmatched as f32) / larger as f32
}

impl fmt::Display for NNGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Key: {}", self.key)?;
        match self.fitness {
            Some(fitness) => writeln!(f, "Fitness: {}", fitness)?,
            None => writeln!(f, "Fitness: -")?,
        }
        writeln!(f, "Nodes:")?;
        for node in self.nodes.values() {
            writeln!(f, "\t{}", node)?;
        }
        write!(f, "Connections:")?;
        for connection in self.connections.values() {
            write!(f, "\n\t{}", connection)?;
        }
        Ok(())
    }
}

//! A Network is the phenotype of a genome: enabled connection
//! genes become weighted links, and node genes become neurons
//! that aggregate, scale, bias and activate their inputs.
//!
//! The `FeedForwardNetwork` type evaluates the nodes required
//! for output in layer order, producing a single output vector
//! per input vector.
mod errors;
mod functions;

pub use errors::NetworkError;

use crate::genomics::{ActivationType, AggregationType, GeneticConfig, NNGenome};
use crate::graphs::feed_forward_layers;
use crate::{ConnectionKey, NodeKey};

use ahash::RandomState;

use std::collections::HashMap;

/// The evaluation of a single node: its function
/// parameters, and the weighted links feeding it.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeEval {
    pub node: NodeKey,
    pub activation: ActivationType,
    pub aggregation: AggregationType,
    pub bias: f32,
    pub response: f32,
    /// `(source node, weight)` pairs.
    pub links: Vec<(NodeKey, f32)>,
}

/// A layered, acyclic neural network.
#[derive(Clone, Debug)]
pub struct FeedForwardNetwork {
    input_nodes: Vec<NodeKey>,
    output_nodes: Vec<NodeKey>,
    node_evals: Vec<NodeEval>,
    values: HashMap<NodeKey, f32, RandomState>,
}

impl FeedForwardNetwork {
    /// Generates a new network from the passed genome.
    ///
    /// Disabled connections are ignored, as are nodes
    /// that cannot affect the outputs.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::{
    ///     genomics::{GeneticConfig, InitialConnection, InnovationTracker, NNGenome},
    ///     networks::FeedForwardNetwork,
    /// };
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
    /// let genome = NNGenome::configure_new(1, &config, &mut tracker, &mut ChaCha8Rng::seed_from_u64(0));
    ///
    /// let network = FeedForwardNetwork::create(&genome, &config);
    ///
    /// // One evaluation per output node, each fed by every input.
    /// assert_eq!(network.node_evals().len(), 2);
    /// assert!(network.node_evals().iter().all(|e| e.links.len() == 3));
    /// ```
    pub fn create(genome: &NNGenome, config: &GeneticConfig) -> FeedForwardNetwork {
        let input_nodes: Vec<NodeKey> = config.input_keys().collect();
        let output_nodes: Vec<NodeKey> = config.output_keys().collect();
        let connections: Vec<ConnectionKey> = genome
            .connections()
            .filter(|c| c.enabled)
            .map(|c| c.key())
            .collect();

        let (layers, required) = feed_forward_layers(&input_nodes, &output_nodes, &connections);

        let mut node_evals = vec![];
        for node in layers.iter().flatten().copied() {
            let gene = match genome.node(node) {
                Some(gene) => gene,
                None => continue,
            };
            let links = genome
                .connections()
                .filter(|c| c.enabled && c.output() == node)
                .filter(|c| required.contains(&c.input()) || input_nodes.contains(&c.input()))
                .map(|c| (c.input(), c.weight))
                .collect();
            node_evals.push(NodeEval {
                node,
                activation: gene.activation,
                aggregation: gene.aggregation,
                bias: gene.bias,
                response: gene.response,
                links,
            });
        }

        let values = input_nodes
            .iter()
            .chain(&output_nodes)
            .map(|&k| (k, 0.0))
            .collect();

        FeedForwardNetwork {
            input_nodes,
            output_nodes,
            node_evals,
            values,
        }
    }

    /// Sets the network's inputs, evaluates every node in
    /// layer order, and returns the values of the outputs.
    /// Each node's value is
    /// `activation(bias + response ⨯ aggregation(value ⨯ weight, …))`.
    ///
    /// # Errors
    /// Returns an error if the number of inputs is not
    /// the configured input count.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::{
    ///     genomics::{
    ///         ActivationType, AggregationType, ConnectionGene, GeneticConfig,
    ///         InnovationTracker, NNGenome, NodeGene,
    ///     },
    ///     networks::FeedForwardNetwork,
    /// };
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut genome = NNGenome::configure_new(
    ///     1,
    ///     &config,
    ///     &mut InnovationTracker::new(&config),
    ///     &mut ChaCha8Rng::seed_from_u64(0),
    /// );
    /// genome
    ///     .add_node(NodeGene::new(1, 0.0, 1.0, ActivationType::Relu, AggregationType::Sum))
    ///     .unwrap();
    /// genome.add_connection(ConnectionGene::new(1, -1, 1, 2.5)).unwrap();
    /// genome.add_connection(ConnectionGene::new(2, -2, 1, -2.5)).unwrap();
    /// genome.add_connection(ConnectionGene::new(3, 1, 0, 1.0)).unwrap();
    ///
    /// let mut network = FeedForwardNetwork::create(&genome, &config);
    ///
    /// let hidden = (1.0 * 2.5 + 0.5 * -2.5f32).max(0.0);
    /// let output = 1.0 / (1.0 + (-5.0 * hidden).exp());
    /// assert_eq!(network.activate(&[1.0, 0.5]).unwrap(), vec![output]);
    /// assert!(network.activate(&[1.0]).is_err());
    /// ```
    pub fn activate(&mut self, inputs: &[f32]) -> Result<Vec<f32>, NetworkError> {
        if inputs.len() != self.input_nodes.len() {
            return Err(NetworkError::InputCountMismatch {
                expected: self.input_nodes.len(),
                found: inputs.len(),
            });
        }
        for (&node, &value) in self.input_nodes.iter().zip(inputs) {
            self.values.insert(node, value);
        }

        for eval in &self.node_evals {
            let node_inputs: Vec<f32> = eval
                .links
                .iter()
                .map(|(source, weight)| self.values.get(source).copied().unwrap_or(0.0) * weight)
                .collect();
            let aggregated = eval.aggregation.apply(&node_inputs);
            let value = eval.activation.apply(eval.bias + eval.response * aggregated);
            self.values.insert(eval.node, value);
        }

        Ok(self
            .output_nodes
            .iter()
            .map(|o| self.values.get(o).copied().unwrap_or(0.0))
            .collect())
    }

    /// Returns the node evaluations, in evaluation order.
    pub fn node_evals(&self) -> &[NodeEval] {
        &self.node_evals
    }

    /// Returns the network's input keys.
    pub fn input_nodes(&self) -> &[NodeKey] {
        &self.input_nodes
    }

    /// Returns the network's output keys.
    pub fn output_nodes(&self) -> &[NodeKey] {
        &self.output_nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{ConnectionGene, InitialConnection, InnovationTracker, NodeGene};

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::num::NonZeroUsize;

    fn config(inputs: usize, outputs: usize) -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(inputs).unwrap(),
            output_count: NonZeroUsize::new(outputs).unwrap(),
            ..GeneticConfig::zero()
        }
    }

    fn empty_genome(config: &GeneticConfig) -> NNGenome {
        NNGenome::configure_new(
            1,
            config,
            &mut InnovationTracker::new(config),
            &mut ChaCha8Rng::seed_from_u64(0),
        )
    }

    fn node(key: NodeKey, bias: f32, activation: ActivationType) -> NodeGene {
        NodeGene::new(key, bias, 1.0, activation, AggregationType::Sum)
    }

    #[test]
    fn unconnected_outputs_use_bias() {
        let config = config(2, 1);
        let mut genome = empty_genome(&config);
        genome.add_node(node(5, 0.0, ActivationType::Identity)).unwrap();
        let mut network = FeedForwardNetwork::create(&genome, &config);
        // The default output is a sigmoid with zero bias.
        assert_eq!(network.activate(&[3.0, -3.0]).unwrap(), vec![0.5]);
        assert_eq!(network.node_evals().len(), 1);
    }

    #[test]
    fn disabled_connections_are_ignored() {
        let config = config(1, 1);
        let mut genome = empty_genome(&config);
        genome
            .add_connection(ConnectionGene::new(1, -1, 0, 4.0))
            .unwrap()
            .enabled = false;
        let network = FeedForwardNetwork::create(&genome, &config);
        assert!(network.node_evals()[0].links.is_empty());
    }

    #[test]
    fn nodes_evaluate_in_layer_order() {
        let config = config(1, 1);
        let mut genome = empty_genome(&config);
        genome.add_node(node(1, 0.5, ActivationType::Identity)).unwrap();
        genome.add_node(node(2, 0.0, ActivationType::Identity)).unwrap();
        genome.add_connection(ConnectionGene::new(1, -1, 2, 2.0)).unwrap();
        genome.add_connection(ConnectionGene::new(2, 2, 1, 3.0)).unwrap();
        genome.add_connection(ConnectionGene::new(3, 1, 0, 1.0)).unwrap();

        let mut network = FeedForwardNetwork::create(&genome, &config);
        let order: Vec<NodeKey> = network.node_evals().iter().map(|e| e.node).collect();
        assert_eq!(order, [2, 1, 0]);

        let hidden = 0.5 + 3.0 * (2.0 * 1.5);
        let expected = ActivationType::Sigmoid.apply(hidden);
        assert_eq!(network.activate(&[1.5]).unwrap(), vec![expected]);
    }

    #[test]
    fn dangling_nodes_are_skipped() {
        let config = config(1, 1);
        let mut genome = empty_genome(&config);
        genome.add_node(node(1, 0.0, ActivationType::Relu)).unwrap();
        genome.add_connection(ConnectionGene::new(1, -1, 1, 1.0)).unwrap();
        genome.add_connection(ConnectionGene::new(2, -1, 0, 1.0)).unwrap();
        let network = FeedForwardNetwork::create(&genome, &config);
        assert_eq!(network.node_evals().len(), 1);
        assert_eq!(network.node_evals()[0].links, vec![(-1, 1.0)]);
    }

    #[test]
    fn activation_is_repeatable() {
        let config = GeneticConfig {
            initial_connection: InitialConnection::FullDirect,
            weight: crate::genomics::FloatAttribute::gaussian(0.0, 1.0, 5.0),
            ..config(3, 2)
        };
        let genome = empty_genome(&config);
        let mut network = FeedForwardNetwork::create(&genome, &config);
        let first = network.activate(&[0.1, 0.2, 0.3]).unwrap();
        network.activate(&[-1.0, 4.0, 0.0]).unwrap();
        assert_eq!(network.activate(&[0.1, 0.2, 0.3]).unwrap(), first);
        assert_eq!(network.input_nodes(), [-1, -2, -3]);
        assert_eq!(network.output_nodes(), [0, 1]);
    }

    #[test]
    fn input_count_is_checked() {
        let config = config(2, 1);
        let mut network = FeedForwardNetwork::create(&empty_genome(&config), &config);
        assert_eq!(
            network.activate(&[1.0, 2.0, 3.0]),
            Err(NetworkError::InputCountMismatch {
                expected: 2,
                found: 3
            })
        );
    }
}

use super::{Attribute, AttributeKind, GeneticConfig};
use crate::NodeKey;

use ferroneat::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// An ActivationType represents the type
/// of activation function the node's network
/// equivalent will use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ActivationType {
    // 1 / (1 + exp(-5x))
    Sigmoid,
    // tanh(2.5x)
    Tanh,
    // sin(5x)
    Sin,
    // exp(-5x²)
    Gauss,
    // max(x, 0)
    Relu,
    // x        if x > 0
    // eˣ - 1   otherwise
    Elu,
    // x        if x > 0
    // 0.005x   otherwise
    Lelu,
    // scaled elu
    Selu,
    // 0.2 ln(1 + exp(5x))
    Softplus,
    // x
    Identity,
    // x clamped to [-1, 1]
    Clamped,
    // 1 / x
    Inv,
    // ln(x)
    Log,
    // eˣ
    Exp,
    // |x|
    Abs,
    // max(0, 1 - |x|)
    Hat,
    // x²
    Square,
    // x³
    Cube,
}

impl Default for ActivationType {
    fn default() -> ActivationType {
        ActivationType::Sigmoid
    }
}

/// An AggregationType represents how the node's
/// network equivalent combines its weighted inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AggregationType {
    Sum,
    Product,
    Max,
    Min,
    /// The input with the greatest magnitude.
    MaxAbs,
    Median,
    Mean,
}

impl Default for AggregationType {
    fn default() -> AggregationType {
        AggregationType::Sum
    }
}

const ACTIVATION_NAMES: [(&str, ActivationType); 18] = [
    ("sigmoid", ActivationType::Sigmoid),
    ("tanh", ActivationType::Tanh),
    ("sin", ActivationType::Sin),
    ("gauss", ActivationType::Gauss),
    ("relu", ActivationType::Relu),
    ("elu", ActivationType::Elu),
    ("lelu", ActivationType::Lelu),
    ("selu", ActivationType::Selu),
    ("softplus", ActivationType::Softplus),
    ("identity", ActivationType::Identity),
    ("clamped", ActivationType::Clamped),
    ("inv", ActivationType::Inv),
    ("log", ActivationType::Log),
    ("exp", ActivationType::Exp),
    ("abs", ActivationType::Abs),
    ("hat", ActivationType::Hat),
    ("square", ActivationType::Square),
    ("cube", ActivationType::Cube),
];

const AGGREGATION_NAMES: [(&str, AggregationType); 7] = [
    ("sum", AggregationType::Sum),
    ("product", AggregationType::Product),
    ("max", AggregationType::Max),
    ("min", AggregationType::Min),
    ("maxabs", AggregationType::MaxAbs),
    ("median", AggregationType::Median),
    ("mean", AggregationType::Mean),
];

impl FromStr for ActivationType {
    type Err = ConfigError;

    /// Parses an activation function by name.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::ActivationType;
    ///
    /// assert_eq!("tanh".parse::<ActivationType>().unwrap(), ActivationType::Tanh);
    /// assert!("tan".parse::<ActivationType>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<ActivationType, ConfigError> {
        ACTIVATION_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, activation)| *activation)
            .ok_or_else(|| {
                ConfigError::new("genetic", "activation", format!("has no function named `{}`", s))
            })
    }
}

impl FromStr for AggregationType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<AggregationType, ConfigError> {
        AGGREGATION_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, aggregation)| *aggregation)
            .ok_or_else(|| {
                ConfigError::new("genetic", "aggregation", format!("has no function named `{}`", s))
            })
    }
}

impl fmt::Display for ActivationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = ACTIVATION_NAMES
            .iter()
            .find(|(_, a)| a == self)
            .map_or("unknown", |(name, _)| *name);
        write!(f, "{}", name)
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = AGGREGATION_NAMES
            .iter()
            .find(|(_, a)| a == self)
            .map_or("unknown", |(name, _)| *name);
        write!(f, "{}", name)
    }
}

/// Node genes are the structural elements of genomes
/// between which connections are created. They become
/// neurons in the genome's phenotype.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct NodeGene {
    key: NodeKey,
    pub bias: f32,
    /// Scaling applied to the aggregated input.
    pub response: f32,
    pub activation: ActivationType,
    pub aggregation: AggregationType,
}

impl NodeGene {
    /// The node gene's attributes, in mutation order.
    pub const SCHEMA: [(&'static str, AttributeKind); 4] = [
        ("bias", AttributeKind::Float),
        ("response", AttributeKind::Float),
        ("activation", AttributeKind::Choice),
        ("aggregation", AttributeKind::Choice),
    ];

    /// Returns a new node with the specified attributes.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{ActivationType, AggregationType, NodeGene};
    ///
    /// let node = NodeGene::new(5, 0.5, 1.0, ActivationType::Sigmoid, AggregationType::Sum);
    /// assert_eq!(node.key(), 5);
    /// ```
    pub fn new(
        key: NodeKey,
        bias: f32,
        response: f32,
        activation: ActivationType,
        aggregation: AggregationType,
    ) -> NodeGene {
        NodeGene {
            key,
            bias,
            response,
            activation,
            aggregation,
        }
    }

    /// Returns a node with attributes initialized
    /// as specified in `config`.
    pub fn random<R: Rng + ?Sized>(key: NodeKey, config: &GeneticConfig, rng: &mut R) -> NodeGene {
        NodeGene {
            key,
            bias: config.bias.init(rng),
            response: config.response.init(rng),
            activation: config.activation.init(rng),
            aggregation: config.aggregation.init(rng),
        }
    }

    /// Returns the node's key.
    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// Mutates each of the node's attributes.
    pub fn mutate<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        self.bias = config.bias.mutate(self.bias, rng);
        self.response = config.response.mutate(self.response, rng);
        self.activation = config.activation.mutate(self.activation, rng);
        self.aggregation = config.aggregation.mutate(self.aggregation, rng);
    }

    /// Returns the attribute distance between two homologous nodes.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{ActivationType, AggregationType, GeneticConfig, NodeGene};
    ///
    /// let config = GeneticConfig {
    ///     common_gene_factor: 0.5,
    ///     ..GeneticConfig::zero()
    /// };
    /// let a = NodeGene::new(0, 1.0, 1.0, ActivationType::Sigmoid, AggregationType::Sum);
    /// let b = NodeGene::new(0, 0.0, 1.0, ActivationType::Relu, AggregationType::Sum);
    ///
    /// assert_eq!(a.distance(&b, &config), (1.0 + 1.0) * 0.5);
    /// ```
    pub fn distance(&self, other: &NodeGene, config: &GeneticConfig) -> f32 {
        let mut d = (self.bias - other.bias).abs() + (self.response - other.response).abs();
        if self.activation != other.activation {
            d += 1.0;
        }
        if self.aggregation != other.aggregation {
            d += 1.0;
        }
        d * config.common_gene_factor
    }
}

impl fmt::Display for NodeGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}[{}, {}, {:.3}, {:.3}]",
            self.key, self.activation, self.aggregation, self.bias, self.response,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_names_round_trip() {
        for (name, activation) in ACTIVATION_NAMES {
            assert_eq!(activation.to_string(), name);
            assert_eq!(name.parse::<ActivationType>().unwrap(), activation);
        }
        for (name, aggregation) in AGGREGATION_NAMES {
            assert_eq!(aggregation.to_string(), name);
            assert_eq!(name.parse::<AggregationType>().unwrap(), aggregation);
        }
        assert_eq!(
            "sigma".parse::<ActivationType>().unwrap_err().field(),
            "activation"
        );
    }

    #[test]
    fn distance_is_symmetric() {
        let config = GeneticConfig {
            common_gene_factor: 0.4,
            ..GeneticConfig::zero()
        };
        let a = NodeGene::new(0, 0.3, 1.0, ActivationType::Sigmoid, AggregationType::Sum);
        let b = NodeGene::new(0, -0.2, 0.5, ActivationType::Sigmoid, AggregationType::Mean);
        assert_eq!(a.distance(&b, &config), b.distance(&a, &config));
        assert_eq!(a.distance(&a, &config), 0.0);
    }

    #[test]
    fn schema_lists_every_attribute() {
        let names: Vec<&str> = NodeGene::SCHEMA.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["bias", "response", "activation", "aggregation"]);
    }
}

use crate::genomics::{
    ActivationType, AggregationType, Attribute, BoolAttribute, ChoiceAttribute, FloatAttribute,
};
use crate::NodeKey;

use ferroneat::ConfigError;
use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// How the connections of a newly generated genome are laid out.
///
/// "Direct" variants connect inputs straight to outputs in addition
/// to going through the hidden nodes. Inputs are always connected
/// to outputs directly when there are no hidden nodes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InitialConnection {
    /// No connections.
    Unconnected,
    /// One randomly chosen input connected to every output.
    FsNeatNoHidden,
    /// One randomly chosen input connected to every
    /// hidden and output node.
    FsNeatHidden,
    /// Inputs to hidden nodes, hidden nodes to outputs.
    FullNoDirect,
    /// As [`FullNoDirect`], plus inputs to outputs.
    ///
    /// [`FullNoDirect`]: InitialConnection::FullNoDirect
    FullDirect,
    /// A random fraction of the [`FullNoDirect`] connections.
    ///
    /// [`FullNoDirect`]: InitialConnection::FullNoDirect
    PartialNoDirect(f32),
    /// A random fraction of the [`FullDirect`] connections.
    ///
    /// [`FullDirect`]: InitialConnection::FullDirect
    PartialDirect(f32),
}

/// Configuration data for genome generation
/// and inter-genome operations.
///
/// All quantities expressing probabilities must be in
/// the range [0.0, 1.0]; [`validate`] checks this.
///
/// [`validate`]: GeneticConfig::validate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of inputs in a genome.
    pub input_count: NonZeroUsize,
    /// Number of outputs in a genome.
    pub output_count: NonZeroUsize,
    /// Number of hidden nodes in a new genome.
    pub hidden_count: usize,
    /// Whether connections that create cycles are forbidden.
    pub feed_forward: bool,
    pub initial_connection: InitialConnection,
    /// Weight of unmatched genes in genetic distance.
    pub disjoint_gene_factor: f32,
    /// Weight of attribute differences of matching
    /// genes in genetic distance.
    pub common_gene_factor: f32,
    /// Chance of a node addition mutation taking place.
    pub node_addition_chance: f32,
    /// Chance of a node deletion mutation taking place.
    pub node_deletion_chance: f32,
    /// Chance of a connection addition mutation taking place.
    pub connection_addition_chance: f32,
    /// Chance of a connection deletion mutation taking place.
    pub connection_deletion_chance: f32,
    /// Allow at most one structural mutation per genome mutation.
    pub single_structural_mutation: bool,
    pub bias: FloatAttribute,
    pub response: FloatAttribute,
    pub activation: ChoiceAttribute<ActivationType>,
    pub aggregation: ChoiceAttribute<AggregationType>,
    pub weight: FloatAttribute,
    pub enabled: BoolAttribute,
}

impl GeneticConfig {
    /// Returns a "zero-valued" default configuration.
    /// All probabilities and factors are 0, counts are 1
    /// (or 0 for hidden nodes), attributes are constant,
    /// and new genomes are unconnected sigmoid/sum networks
    /// with enabled connections.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::GeneticConfig;
    ///
    /// let cfg1 = GeneticConfig::zero();
    ///
    /// let cfg2 = GeneticConfig {
    ///     // Specify some values here...
    ///     node_addition_chance: 0.2,
    ///     connection_addition_chance: 0.5,
    ///     // Default the rest...
    ///     ..GeneticConfig::zero()
    /// };
    /// assert!(cfg2.validate().is_ok());
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::MIN,
            output_count: NonZeroUsize::MIN,
            hidden_count: 0,
            feed_forward: true,
            initial_connection: InitialConnection::Unconnected,
            disjoint_gene_factor: 0.0,
            common_gene_factor: 0.0,
            node_addition_chance: 0.0,
            node_deletion_chance: 0.0,
            connection_addition_chance: 0.0,
            connection_deletion_chance: 0.0,
            single_structural_mutation: false,
            bias: FloatAttribute::zero(),
            response: FloatAttribute::constant(1.0),
            activation: ChoiceAttribute::fixed(ActivationType::Sigmoid),
            aggregation: ChoiceAttribute::fixed(AggregationType::Sum),
            weight: FloatAttribute::zero(),
            enabled: BoolAttribute::fixed(true),
        }
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    /// Returns an error naming the first offending field.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{GeneticConfig, InitialConnection};
    ///
    /// let config = GeneticConfig {
    ///     initial_connection: InitialConnection::PartialDirect(1.5),
    ///     ..GeneticConfig::zero()
    /// };
    ///
    /// assert_eq!(config.validate().unwrap_err().field(), "initial_connection");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let chances = [
            ("node_addition_chance", self.node_addition_chance),
            ("node_deletion_chance", self.node_deletion_chance),
            ("connection_addition_chance", self.connection_addition_chance),
            ("connection_deletion_chance", self.connection_deletion_chance),
        ];
        for (field, chance) in chances {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::new(
                    "genetic",
                    field,
                    format!("must be in the range [0, 1], got {}", chance),
                ));
            }
        }
        let factors = [
            ("disjoint_gene_factor", self.disjoint_gene_factor),
            ("common_gene_factor", self.common_gene_factor),
        ];
        for (field, factor) in factors {
            if !(factor >= 0.0 && factor.is_finite()) {
                return Err(ConfigError::new(
                    "genetic",
                    field,
                    format!("must be a finite non-negative number, got {}", factor),
                ));
            }
        }
        if let InitialConnection::PartialNoDirect(fraction)
        | InitialConnection::PartialDirect(fraction) = self.initial_connection
        {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(ConfigError::new(
                    "genetic",
                    "initial_connection",
                    format!("connection fraction must be in the range [0, 1], got {}", fraction),
                ));
            }
        }
        self.bias.validate("bias")?;
        self.response.validate("response")?;
        self.activation.validate("activation")?;
        self.aggregation.validate("aggregation")?;
        self.weight.validate("weight")?;
        self.enabled.validate("enabled")
    }

    /// Returns the keys of the network inputs, `-1, -2, …`.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::GeneticConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(3).unwrap(),
    ///     ..GeneticConfig::zero()
    /// };
    ///
    /// assert!(config.input_keys().eq([-1, -2, -3]));
    /// ```
    pub fn input_keys(&self) -> impl Iterator<Item = NodeKey> {
        (1..=self.input_count.get() as NodeKey).map(|k| -k)
    }

    /// Returns the keys of the network outputs, `0, 1, …`.
    pub fn output_keys(&self) -> impl Iterator<Item = NodeKey> {
        0..self.output_count.get() as NodeKey
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_valid() {
        assert!(GeneticConfig::zero().validate().is_ok());
    }

    #[test]
    fn invalid_chances_are_named() {
        let config = GeneticConfig {
            connection_deletion_chance: -0.1,
            ..GeneticConfig::zero()
        };
        let error = config.validate().unwrap_err();
        assert_eq!(error.section(), "genetic");
        assert_eq!(error.field(), "connection_deletion_chance");

        let config = GeneticConfig {
            common_gene_factor: f32::NAN,
            ..GeneticConfig::zero()
        };
        assert_eq!(config.validate().unwrap_err().field(), "common_gene_factor");
    }

    #[test]
    fn invalid_attributes_are_named() {
        let config = GeneticConfig {
            weight: FloatAttribute {
                replace_rate: 2.0,
                ..FloatAttribute::zero()
            },
            ..GeneticConfig::zero()
        };
        assert_eq!(config.validate().unwrap_err().field(), "weight.replace_rate");
    }

    #[test]
    fn keys_follow_conventions() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(2).unwrap(),
            output_count: NonZeroUsize::new(3).unwrap(),
            ..GeneticConfig::zero()
        };
        assert_eq!(config.input_keys().collect::<Vec<_>>(), [-1, -2]);
        assert_eq!(config.output_keys().collect::<Vec<_>>(), [0, 1, 2]);
    }

    #[test]
    fn json_round_trip() {
        let config = GeneticConfig {
            hidden_count: 2,
            initial_connection: InitialConnection::PartialDirect(0.5),
            activation: ChoiceAttribute::random(
                vec![ActivationType::Sigmoid, ActivationType::Relu],
                0.1,
            ),
            ..GeneticConfig::zero()
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: GeneticConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.hidden_count, 2);
        assert_eq!(restored.initial_connection, config.initial_connection);
        assert_eq!(restored.activation, config.activation);
    }
}

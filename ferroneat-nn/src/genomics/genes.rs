use super::{Attribute, AttributeKind, GeneticConfig};
use crate::{ConnectionKey, Innovation, NodeKey};

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::hash::{Hash, Hasher};

/// Chance that a connection disabled in either
/// parent is forced disabled in the child.
const INHERITED_DISABLE_CHANCE: f32 = 0.75;

/// Connection genes are created between two nodes, and
/// become network connections in the genome's phenotype.
///
/// Connection genes are compared and hashed by innovation
/// number only, so that the "same" gene is recognized across
/// genomes regardless of its attributes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectionGene {
    innovation: Innovation,
    input: NodeKey,
    output: NodeKey,
    pub weight: f32,
    pub enabled: bool,
}

impl ConnectionGene {
    /// The connection gene's attributes, in mutation order.
    pub const SCHEMA: [(&'static str, AttributeKind); 2] =
        [("weight", AttributeKind::Float), ("enabled", AttributeKind::Bool)];

    /// Returns a new _enabled_ gene with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::ConnectionGene;
    ///
    /// let gene = ConnectionGene::new(42, -1, 9, 2.0);
    /// assert!(gene.enabled);
    /// ```
    pub fn new(innovation: Innovation, input: NodeKey, output: NodeKey, weight: f32) -> ConnectionGene {
        ConnectionGene {
            innovation,
            input,
            output,
            weight,
            enabled: true,
        }
    }

    /// Returns a gene with attributes initialized
    /// as specified in `config`.
    pub fn random<R: Rng + ?Sized>(
        innovation: Innovation,
        (input, output): ConnectionKey,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> ConnectionGene {
        ConnectionGene {
            innovation,
            input,
            output,
            weight: config.weight.init(rng),
            enabled: config.enabled.init(rng),
        }
    }

    /// Returns the gene's innovation number.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::ConnectionGene;
    ///
    /// let gene = ConnectionGene::new(42, -1, 9, 2.0);
    ///
    /// assert_eq!(gene.innovation(), 42);
    /// ```
    pub fn innovation(&self) -> Innovation {
        self.innovation
    }

    /// Returns the gene's input node's key.
    pub fn input(&self) -> NodeKey {
        self.input
    }

    /// Returns the gene's output node's key.
    pub fn output(&self) -> NodeKey {
        self.output
    }

    /// Returns the gene's structural key, `(input, output)`.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::ConnectionGene;
    ///
    /// let gene = ConnectionGene::new(42, -1, 9, 2.0);
    ///
    /// assert_eq!(gene.key(), (-1, 9));
    /// ```
    pub fn key(&self) -> ConnectionKey {
        (self.input, self.output)
    }

    /// Mutates each of the gene's attributes.
    pub fn mutate<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        self.weight = config.weight.mutate(self.weight, rng);
        self.enabled = config.enabled.mutate(self.enabled, rng);
    }

    /// Returns a gene inheriting each attribute from either
    /// parent at random. If the gene is disabled in either
    /// parent, there is a further 75% chance it is disabled
    /// in the child.
    ///
    /// # Panics
    /// Panics if the genes' innovation numbers differ.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::ConnectionGene;
    ///
    /// let mut a = ConnectionGene::new(7, -1, 0, 1.0);
    /// let mut b = ConnectionGene::new(7, -1, 0, -1.0);
    /// a.enabled = false;
    /// b.enabled = false;
    ///
    /// let child = a.crossover(&b, &mut rand::thread_rng());
    /// assert!(!child.enabled);
    /// assert!(child.weight == 1.0 || child.weight == -1.0);
    /// ```
    pub fn crossover<R: Rng + ?Sized>(&self, other: &ConnectionGene, rng: &mut R) -> ConnectionGene {
        assert_eq!(
            self.innovation, other.innovation,
            "crossover between genes {} and {}",
            self, other
        );
        let mut child = ConnectionGene {
            weight: if rng.gen() { self.weight } else { other.weight },
            enabled: if rng.gen() { self.enabled } else { other.enabled },
            ..self.clone()
        };
        if (!self.enabled || !other.enabled) && rng.gen::<f32>() < INHERITED_DISABLE_CHANCE {
            child.enabled = false;
        }
        child
    }

    /// Returns the attribute distance between two homologous genes.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{ConnectionGene, GeneticConfig};
    ///
    /// let config = GeneticConfig {
    ///     common_gene_factor: 0.5,
    ///     ..GeneticConfig::zero()
    /// };
    /// let a = ConnectionGene::new(7, -1, 0, 1.0);
    /// let mut b = ConnectionGene::new(7, -1, 0, -1.0);
    /// b.enabled = false;
    ///
    /// assert_eq!(a.distance(&b, &config), (2.0 + 1.0) * 0.5);
    /// ```
    pub fn distance(&self, other: &ConnectionGene, config: &GeneticConfig) -> f32 {
        let mut d = (self.weight - other.weight).abs();
        if self.enabled != other.enabled {
            d += 1.0;
        }
        d * config.common_gene_factor
    }
}

impl PartialEq for ConnectionGene {
    fn eq(&self, other: &ConnectionGene) -> bool {
        self.innovation == other.innovation
    }
}

impl Eq for ConnectionGene {}

impl Hash for ConnectionGene {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.innovation.hash(state);
    }
}

impl fmt::Display for ConnectionGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:?}[{:?}->{:?}, {:.3}]{}",
            if self.enabled { "" } else { "(" },
            self.innovation,
            self.input,
            self.output,
            self.weight,
            if self.enabled { "" } else { ")" },
        )
    }
}

use crate::genomics::GeneticConfig;
use crate::{Innovation, NodeKey};

use ahash::RandomState;
use ferroneat::InnovationHistory;
use serde::{Deserialize, Serialize};

use std::collections::hash_map::HashMap;

/// The kind of mutation a connection was created by.
///
/// Identical endpoints created by different kinds of
/// mutation are distinct innovations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    /// Created during initial genome generation.
    InitialConnection,
    /// Created by a connection addition mutation.
    AddConnection,
    /// The incoming connection of a split.
    AddNodeIn,
    /// The outgoing connection of a split.
    AddNodeOut,
}

/// An `InnovationTracker` keeps track of connection and node
/// innovations in a population, so that identical mutations
/// within a generation are assigned the same identifiers.
///
/// Connection mutations are identified by their endpoints and
/// [`MutationKind`]. Node mutations are identified by the
/// innovation number of the split connection.
///
/// Innovation numbers and node keys are never reused, but
/// the record of mutations is cleared every generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InnovationTracker {
    global_counter: Innovation,
    next_node_key: NodeKey,
    generation_innovations: HashMap<(NodeKey, NodeKey, MutationKind), Innovation, RandomState>,
    generation_splits: HashMap<Innovation, NodeKey, RandomState>,
}

impl InnovationHistory for InnovationTracker {
    type Config = GeneticConfig;

    fn new(config: &GeneticConfig) -> InnovationTracker {
        Self::new(config)
    }

    fn reset_generation(&mut self) {
        Self::reset_generation(self)
    }
}

impl InnovationTracker {
    /// Creates a new tracker for genomes using the specified
    /// configuration. New node keys start after the output
    /// and initial hidden nodes.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{GeneticConfig, InnovationTracker};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     hidden_count: 3,
    ///     ..GeneticConfig::zero()
    /// };
    /// let tracker = InnovationTracker::new(&config);
    ///
    /// assert_eq!(tracker.max_innovation(), 0);
    /// assert_eq!(tracker.next_node_key(), 5);
    /// ```
    pub fn new(config: &GeneticConfig) -> InnovationTracker {
        InnovationTracker {
            global_counter: 0,
            next_node_key: (config.output_count.get() + config.hidden_count) as NodeKey,
            generation_innovations: HashMap::default(),
            generation_splits: HashMap::default(),
        }
    }

    /// Returns the innovation number of a connection mutation.
    /// The same mutation within a generation is always assigned
    /// the same number.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{GeneticConfig, InnovationTracker, MutationKind};
    ///
    /// let mut tracker = InnovationTracker::new(&GeneticConfig::zero());
    ///
    /// let first = tracker.get_innovation_number(-1, 0, MutationKind::AddConnection);
    /// assert_eq!(first, 1);
    /// assert_eq!(tracker.get_innovation_number(-1, 0, MutationKind::AddConnection), first);
    /// assert_eq!(tracker.get_innovation_number(-1, 0, MutationKind::AddNodeIn), 2);
    /// ```
    pub fn get_innovation_number(
        &mut self,
        input: NodeKey,
        output: NodeKey,
        kind: MutationKind,
    ) -> Innovation {
        let counter = &mut self.global_counter;
        *self
            .generation_innovations
            .entry((input, output, kind))
            .or_insert_with(|| {
                *counter += 1;
                *counter
            })
    }

    /// Returns the key of the node created by splitting
    /// the connection with the specified innovation number.
    /// Splits of the same connection within a generation
    /// are assigned the same key.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{GeneticConfig, InnovationTracker};
    ///
    /// let mut tracker = InnovationTracker::new(&GeneticConfig::zero());
    ///
    /// assert_eq!(tracker.split_node_key(7), 1);
    /// assert_eq!(tracker.split_node_key(7), 1);
    /// assert_eq!(tracker.split_node_key(8), 2);
    /// ```
    pub fn split_node_key(&mut self, split: Innovation) -> NodeKey {
        let next = &mut self.next_node_key;
        *self.generation_splits.entry(split).or_insert_with(|| {
            *next += 1;
            *next - 1
        })
    }

    /// Returns a node key that has never been handed out.
    pub fn allocate_node_key(&mut self) -> NodeKey {
        self.next_node_key += 1;
        self.next_node_key - 1
    }

    /// Forgets the mutations of the current generation.
    /// Numbering continues from where it stopped.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{GeneticConfig, InnovationTracker, MutationKind};
    ///
    /// let mut tracker = InnovationTracker::new(&GeneticConfig::zero());
    /// let first = tracker.get_innovation_number(-1, 0, MutationKind::AddConnection);
    ///
    /// tracker.reset_generation();
    ///
    /// assert_ne!(tracker.get_innovation_number(-1, 0, MutationKind::AddConnection), first);
    /// ```
    pub fn reset_generation(&mut self) {
        self.generation_innovations.clear();
        self.generation_splits.clear();
    }

    /// Returns the highest innovation number handed out,
    /// or 0 if there is none.
    pub fn max_innovation(&self) -> Innovation {
        self.global_counter
    }

    /// Returns the key the next new node will receive.
    pub fn next_node_key(&self) -> NodeKey {
        self.next_node_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn tracker() -> InnovationTracker {
        InnovationTracker::new(&GeneticConfig {
            input_count: NonZeroUsize::new(2).unwrap(),
            output_count: NonZeroUsize::new(1).unwrap(),
            ..GeneticConfig::zero()
        })
    }

    #[test]
    fn innovations_are_deduplicated_within_generation() {
        let mut tracker = tracker();
        let a = tracker.get_innovation_number(-1, 0, MutationKind::InitialConnection);
        let b = tracker.get_innovation_number(-2, 0, MutationKind::InitialConnection);
        assert_eq!((a, b), (1, 2));
        assert_eq!(
            tracker.get_innovation_number(-2, 0, MutationKind::InitialConnection),
            b
        );
        assert_eq!(tracker.max_innovation(), 2);
    }

    #[test]
    fn kinds_are_distinct_innovations() {
        let mut tracker = tracker();
        let kinds = [
            MutationKind::InitialConnection,
            MutationKind::AddConnection,
            MutationKind::AddNodeIn,
            MutationKind::AddNodeOut,
        ];
        let innovations: Vec<_> = kinds
            .iter()
            .map(|&k| tracker.get_innovation_number(-1, 0, k))
            .collect();
        assert_eq!(innovations, [1, 2, 3, 4]);
    }

    #[test]
    fn reset_keeps_counters() {
        let mut tracker = tracker();
        tracker.get_innovation_number(-1, 0, MutationKind::AddConnection);
        let node = tracker.split_node_key(1);
        tracker.reset_generation();
        assert_eq!(
            tracker.get_innovation_number(-1, 0, MutationKind::AddConnection),
            2
        );
        assert_eq!(tracker.split_node_key(1), node + 1);
    }

    #[test]
    fn allocated_keys_are_fresh() {
        let mut tracker = tracker();
        let split = tracker.split_node_key(3);
        let fresh = tracker.allocate_node_key();
        assert_eq!(split, 1);
        assert_eq!(fresh, 2);
        assert_eq!(tracker.split_node_key(3), split);
        assert_eq!(tracker.next_node_key(), 3);
    }

    #[test]
    fn numbering_resumes_after_restore() {
        let mut tracker = tracker();
        tracker.get_innovation_number(-1, 0, MutationKind::AddConnection);
        tracker.split_node_key(1);

        let saved = ron::to_string(&tracker).unwrap();
        let mut restored: InnovationTracker = ron::from_str(&saved).unwrap();

        assert_eq!(
            restored.get_innovation_number(-1, 0, MutationKind::AddConnection),
            1
        );
        assert_eq!(
            restored.get_innovation_number(-2, 0, MutationKind::AddConnection),
            tracker.get_innovation_number(-2, 0, MutationKind::AddConnection)
        );
        assert_eq!(restored.allocate_node_key(), tracker.allocate_node_key());
    }
}

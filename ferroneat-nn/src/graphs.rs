//! Directed graph algorithms over connection lists,
//! used to keep feed-forward genomes acyclic and to
//! order network evaluation.

use crate::{ConnectionKey, NodeKey};

use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Returns whether adding the connection `candidate`
/// to the graph would create a cycle.
///
/// A self-connection is always a cycle.
///
/// # Examples
/// ```
/// use ferroneat_nn::graphs::creates_cycle;
///
/// let connections = [(-1, 2), (2, 0)];
///
/// assert!(creates_cycle(&connections, (0, 2)));
/// assert!(creates_cycle(&connections, (2, 2)));
/// assert!(!creates_cycle(&connections, (-1, 0)));
/// ```
pub fn creates_cycle(connections: &[ConnectionKey], candidate: ConnectionKey) -> bool {
    let (input, output) = candidate;
    if input == output {
        return true;
    }

    let mut successors: BTreeMap<NodeKey, Vec<NodeKey>> = BTreeMap::new();
    for &(a, b) in connections {
        successors.entry(a).or_default().push(b);
    }

    // Search forward from the candidate's output for its input.
    let mut visited = BTreeSet::from([output]);
    let mut queue = VecDeque::from([output]);
    while let Some(node) = queue.pop_front() {
        for &next in successors.get(&node).into_iter().flatten() {
            if next == input {
                return true;
            }
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    false
}

/// Returns the nodes whose values are needed to compute
/// the outputs: the outputs themselves, and every non-input
/// node with a path to an output.
///
/// # Examples
/// ```
/// use ferroneat_nn::graphs::required_for_output;
///
/// // Node 3 leads nowhere, node 4 feeds the output without inputs.
/// let connections = [(-1, 2), (2, 0), (-1, 3), (4, 2)];
///
/// let required = required_for_output(&[-1], &[0], &connections);
/// assert!(required.into_iter().eq([0, 2, 4]));
/// ```
pub fn required_for_output(
    inputs: &[NodeKey],
    outputs: &[NodeKey],
    connections: &[ConnectionKey],
) -> BTreeSet<NodeKey> {
    let mut predecessors: BTreeMap<NodeKey, Vec<NodeKey>> = BTreeMap::new();
    for &(a, b) in connections {
        predecessors.entry(b).or_default().push(a);
    }

    let mut required: BTreeSet<NodeKey> = outputs.iter().copied().collect();
    let mut queue: VecDeque<NodeKey> = outputs.iter().copied().collect();
    while let Some(node) = queue.pop_front() {
        for &previous in predecessors.get(&node).into_iter().flatten() {
            if !inputs.contains(&previous) && required.insert(previous) {
                queue.push_back(previous);
            }
        }
    }
    required
}

/// Groups the nodes required for output into layers that can
/// be evaluated in order, each layer depending only on inputs
/// and earlier layers.
///
/// The first layer holds the required nodes without incoming
/// connections, whose values depend only on their bias, and is
/// omitted if there are none. Required nodes on a cycle, or fed
/// by one, are never layered.
///
/// Returns the layers along with the set of required nodes.
///
/// # Examples
/// ```
/// use ferroneat_nn::graphs::feed_forward_layers;
///
/// let connections = [(-1, 2), (-2, 2), (2, 0), (-1, 0)];
///
/// let (layers, required) = feed_forward_layers(&[-1, -2], &[0], &connections);
///
/// assert_eq!(layers.len(), 2);
/// assert!(layers[0].iter().eq(&[2]));
/// assert!(layers[1].iter().eq(&[0]));
/// assert!(required.into_iter().eq([0, 2]));
/// ```
pub fn feed_forward_layers(
    inputs: &[NodeKey],
    outputs: &[NodeKey],
    connections: &[ConnectionKey],
) -> (Vec<BTreeSet<NodeKey>>, BTreeSet<NodeKey>) {
    let required = required_for_output(inputs, outputs, connections);

    let mut predecessors: BTreeMap<NodeKey, Vec<NodeKey>> = BTreeMap::new();
    for &(a, b) in connections {
        predecessors.entry(b).or_default().push(a);
    }

    let mut layers = vec![];
    let mut admitted: BTreeSet<NodeKey> = inputs.iter().copied().collect();

    let bias_layer: BTreeSet<NodeKey> = required
        .iter()
        .copied()
        .filter(|n| !predecessors.contains_key(n))
        .collect();
    if !bias_layer.is_empty() {
        admitted.extend(&bias_layer);
        layers.push(bias_layer);
    }

    loop {
        let layer: BTreeSet<NodeKey> = connections
            .iter()
            .map(|&(_, b)| b)
            .filter(|b| required.contains(b) && !admitted.contains(b))
            .filter(|b| {
                predecessors
                    .get(b)
                    .into_iter()
                    .flatten()
                    .all(|a| admitted.contains(a))
            })
            .collect();
        if layer.is_empty() {
            break;
        }
        admitted.extend(&layer);
        layers.push(layer);
    }

    (layers, required)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(nodes: &[NodeKey]) -> BTreeSet<NodeKey> {
        nodes.iter().copied().collect()
    }

    #[test]
    fn cycles() {
        let connections = [(-1, 1), (1, 2), (2, 3), (3, 0)];
        assert!(creates_cycle(&connections, (3, 1)));
        assert!(creates_cycle(&connections, (0, -1)));
        assert!(creates_cycle(&connections, (1, 1)));
        assert!(!creates_cycle(&connections, (1, 3)));
        assert!(!creates_cycle(&connections, (-1, 0)));
        assert!(!creates_cycle(&[], (-1, 0)));
        assert!(creates_cycle(&[], (4, 4)));
    }

    #[test]
    fn two_inputs_one_output() {
        let connections = [(0, 2), (1, 2)];
        let (layers, required) = feed_forward_layers(&[0, 1], &[2], &connections);
        assert_eq!(layers, vec![set(&[2])]);
        assert_eq!(required, set(&[2]));
    }

    #[test]
    fn chain() {
        let connections = [(-1, 3), (3, 2), (2, 1), (1, 0)];
        let (layers, _) = feed_forward_layers(&[-1], &[0], &connections);
        assert_eq!(layers, vec![set(&[3]), set(&[2]), set(&[1]), set(&[0])]);
    }

    #[test]
    fn diamond() {
        let connections = [(-1, 1), (-1, 2), (1, 3), (2, 3), (3, 0), (1, 0)];
        let (layers, required) = feed_forward_layers(&[-1], &[0], &connections);
        assert_eq!(layers, vec![set(&[1, 2]), set(&[3]), set(&[0])]);
        assert_eq!(required, set(&[0, 1, 2, 3]));
    }

    #[test]
    fn every_node_follows_its_sources() {
        let inputs = [-1, -2];
        let connections = [(-1, 4), (4, 5), (-2, 5), (5, 0), (4, 1), (-2, 1), (6, 0)];
        let (layers, required) = feed_forward_layers(&inputs, &[0, 1], &connections);
        let mut seen: BTreeSet<NodeKey> = inputs.iter().copied().collect();
        for layer in &layers {
            for node in layer {
                assert!(connections
                    .iter()
                    .filter(|(_, b)| b == node)
                    .all(|(a, _)| seen.contains(a)));
            }
            seen.extend(layer);
        }
        let layered: BTreeSet<NodeKey> = layers.into_iter().flatten().collect();
        assert_eq!(layered, required);
    }

    #[test]
    fn orphans_form_bias_layer() {
        // Node 1 has no inputs, but feeds the output.
        let connections = [(1, 0), (-1, 0)];
        let (layers, required) = feed_forward_layers(&[-1], &[0], &connections);
        assert_eq!(layers, vec![set(&[1]), set(&[0])]);
        assert_eq!(required, set(&[0, 1]));

        // An unconnected output is evaluated from its bias alone.
        let (layers, required) = feed_forward_layers(&[-1, -2], &[0, 1], &[(-1, 0)]);
        assert_eq!(layers, vec![set(&[1]), set(&[0])]);
        assert_eq!(required, set(&[0, 1]));
    }

    #[test]
    fn unused_nodes_are_not_required() {
        let connections = [(-1, 5), (-1, 0), (0, 6)];
        let required = required_for_output(&[-1], &[0], &connections);
        assert_eq!(required, set(&[0]));
    }

    #[test]
    fn no_connections() {
        let (layers, required) = feed_forward_layers(&[-1, -2], &[0], &[]);
        assert_eq!(layers, vec![set(&[0])]);
        assert_eq!(required, set(&[0]));
    }

    #[test]
    fn duplicate_connections() {
        let connections = [(-1, 1), (-1, 1), (1, 0), (1, 0)];
        let (layers, _) = feed_forward_layers(&[-1], &[0], &connections);
        assert_eq!(layers, vec![set(&[1]), set(&[0])]);
        assert!(creates_cycle(&connections, (0, 1)));
    }

    #[test]
    fn cycles_are_never_layered() {
        let connections = [(-1, 1), (1, 2), (2, 1), (2, 0)];
        let (layers, required) = feed_forward_layers(&[-1], &[0], &connections);
        assert!(layers.is_empty());
        assert_eq!(required, set(&[0, 1, 2]));
    }
}

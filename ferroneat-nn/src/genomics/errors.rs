use crate::{ConnectionKey, Innovation, NodeKey};

use std::error::Error;
use std::fmt;

/// An error type indicating the connection gene
/// being added is invalid for the genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneValidityError {
    /// A gene with the same innovation number is present.
    DuplicateInnovation(Innovation),
    /// A gene between the same endpoints is present.
    DuplicateEndpoints(ConnectionKey),
    /// The gene's endpoints do not exist.
    NonexistentEndpoints(ConnectionKey),
    /// The gene's output is a network input.
    InputEndpoint(NodeKey),
}

/// An error type indicating the node gene
/// being added is invalid for the genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValidityError {
    /// The node's key is a duplicate.
    DuplicateKey(NodeKey),
    /// The node's key is reserved for network inputs.
    InputKey(NodeKey),
}

/// An error type indicating a failure
/// to carry out a connection addition mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAdditionMutationError {
    /// Both chosen endpoints were output nodes.
    OutputToOutput(ConnectionKey),
    /// The connection would create a cycle
    /// in a feed-forward genome.
    CreatesCycle(ConnectionKey),
}

/// An error type indicating a failure
/// to carry out a node addition mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAdditionMutationError {
    /// The genome has no enabled connection.
    NoConnectionToSplit,
}

impl fmt::Display for GeneValidityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateInnovation(innovation) => {
                write!(f, "duplicate gene insertion with innovation {}", innovation)
            }
            Self::DuplicateEndpoints((input, output)) => write!(
                f,
                "gene insertion shadows gene with endpoints {} -> {}",
                input, output
            ),
            Self::NonexistentEndpoints((input, output)) => write!(
                f,
                "gene insertion between nonexistent endpoint(s) {} -> {}",
                input, output
            ),
            Self::InputEndpoint(key) => {
                write!(f, "gene insertion with input node {} as output", key)
            }
        }
    }
}

impl fmt::Display for NodeValidityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey(key) => write!(f, "duplicate node insertion with key {}", key),
            Self::InputKey(key) => write!(f, "node insertion with input key {}", key),
        }
    }
}

impl fmt::Display for ConnectionAdditionMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutputToOutput((input, output)) => write!(
                f,
                "connection mutation between output nodes {} -> {}",
                input, output
            ),
            Self::CreatesCycle((input, output)) => write!(
                f,
                "connection mutation {} -> {} creates a cycle",
                input, output
            ),
        }
    }
}

impl fmt::Display for NodeAdditionMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConnectionToSplit => {
                write!(f, "node mutation on genome without enabled connections")
            }
        }
    }
}

impl Error for GeneValidityError {}
impl Error for NodeValidityError {}
impl Error for ConnectionAdditionMutationError {}
impl Error for NodeAdditionMutationError {}

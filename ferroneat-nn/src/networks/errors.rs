use std::error::Error;
use std::fmt;

/// An error type indicating a network
/// could not be activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The number of inputs given differs from
    /// the network's input count.
    InputCountMismatch { expected: usize, found: usize },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputCountMismatch { expected, found } => write!(
                f,
                "network activation expected {} inputs, found {}",
                expected, found
            ),
        }
    }
}

impl Error for NetworkError {}

use crate::GenomeKey;

use std::error::Error;
use std::fmt;

/// An error type indicating an invalid configuration value.
///
/// Identifies the configuration section and the
/// offending field, along with the reason it was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    section: &'static str,
    field: String,
    reason: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    ///
    /// # Examples
    /// ```
    /// use ferroneat::ConfigError;
    ///
    /// let error = ConfigError::new("population", "elitism", "must be positive");
    /// assert_eq!(
    ///     error.to_string(),
    ///     "invalid population configuration: `elitism` must be positive"
    /// );
    /// ```
    pub fn new(
        section: &'static str,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> ConfigError {
        ConfigError {
            section,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the configuration section the field belongs to.
    pub fn section(&self) -> &'static str {
        self.section
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the reason the value was rejected.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// An error type indicating that evolution
/// cannot proceed.
#[derive(Debug, Clone, PartialEq)]
pub enum EvolutionError {
    /// The configuration is invalid, or the requested
    /// run is incompatible with it.
    Config(ConfigError),
    /// The fitness function did not assign a fitness
    /// to the genome.
    MissingFitness { genome: GenomeKey },
    /// The fitness function assigned a NaN or infinite
    /// fitness to the genome.
    NonFiniteFitness { genome: GenomeKey, fitness: f32 },
    /// All species stagnated, and resetting on extinction
    /// is disabled.
    CompleteExtinction,
    /// The minimum species size is too large for every
    /// surviving species to be allotted offspring.
    SpawnConflict {
        pop_size: usize,
        species: usize,
        min_species_size: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} configuration: `{}` {}",
            self.section, self.field, self.reason
        )
    }
}

impl fmt::Display for EvolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{}", e),
            Self::MissingFitness { genome } => {
                write!(f, "fitness function left genome {} without a fitness", genome)
            }
            Self::NonFiniteFitness { genome, fitness } => write!(
                f,
                "fitness function assigned non-finite fitness {} to genome {}",
                fitness, genome
            ),
            Self::CompleteExtinction => write!(f, "complete extinction: all species stagnated"),
            Self::SpawnConflict {
                pop_size,
                species,
                min_species_size,
            } => write!(
                f,
                "cannot allot {} genomes to {} species with a minimum species size of {}",
                pop_size, species, min_species_size
            ),
        }
    }
}

impl Error for ConfigError {}

impl Error for EvolutionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EvolutionError {
    fn from(e: ConfigError) -> EvolutionError {
        EvolutionError::Config(e)
    }
}

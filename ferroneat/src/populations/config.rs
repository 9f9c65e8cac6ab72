use super::ConfigError;

use serde::{Deserialize, Serialize};

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// How a population's fitness values are reduced
/// to a single value, to be compared against the
/// [`fitness_threshold`](PopulationConfig::fitness_threshold).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessCriterion {
    Max,
    Min,
    Mean,
}

/// How a species' member fitnesses are reduced
/// to the species fitness used for stagnation tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeciesFitnessFunc {
    Max,
    Min,
    Mean,
    Median,
}

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. This is
/// checked by [`validate`](PopulationConfig::validate).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population.
    pub size: NonZeroUsize,
    /// Reduction of the population's fitnesses which
    /// is compared against the `fitness_threshold`.
    pub fitness_criterion: FitnessCriterion,
    /// Evolution stops once the `fitness_criterion`
    /// reaches this value.
    pub fitness_threshold: f32,
    /// Disables the fitness threshold. Evolution then
    /// only stops at the generation limit.
    pub no_fitness_termination: bool,
    /// Whether a new random population is created when
    /// all species go extinct. Otherwise extinction is
    /// reported as an error.
    pub reset_on_extinction: bool,
    /// Genetic distance threshold, beyond which
    /// genomes are considered as belonging to
    /// different species.
    pub distance_threshold: f32,
    /// Top n of each species which is copied
    /// as-is to the next generation.
    pub elitism: usize,
    /// Top % of each species which can participate
    /// in mating.
    pub survival_threshold: f32,
    /// Minimum number of offspring allotted to
    /// each surviving species.
    pub min_species_size: NonZeroUsize,
    /// Chance that offspring will be the result
    /// of sexual reproduction (as opposed to asexual).
    pub sexual_reproduction_chance: f32,
    /// Number of generations without a fitness increase
    /// before a species is considered _stagnated_.
    pub stagnation_threshold: NonZeroUsize,
    /// Number of best-performing species which are
    /// protected from stagnation.
    pub species_elitism: usize,
    /// Reduction used to compute a species' fitness.
    pub species_fitness_func: SpeciesFitnessFunc,
    /// Seed for the population's random number generator.
    /// If `None`, the generator is seeded from OS entropy.
    pub seed: Option<u64>,
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, empty, false or `None`, or in the case of
    /// `NonZeroUsize`s, 1. Enumerations take their first variant.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use ferroneat::PopulationConfig;
    ///
    /// let cfg1 = PopulationConfig::zero();
    ///
    /// let cfg2 = PopulationConfig {
    ///     // Specify some values here...
    ///     survival_threshold: 0.2,
    ///     // Default the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// # assert!(cfg1.validate().is_ok());
    /// # assert!(cfg2.validate().is_ok());
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::MIN,
            fitness_criterion: FitnessCriterion::Max,
            fitness_threshold: 0.0,
            no_fitness_termination: false,
            reset_on_extinction: false,
            distance_threshold: 0.0,
            elitism: 0,
            survival_threshold: 0.0,
            min_species_size: NonZeroUsize::MIN,
            sexual_reproduction_chance: 0.0,
            stagnation_threshold: NonZeroUsize::MIN,
            species_elitism: 0,
            species_fitness_func: SpeciesFitnessFunc::Max,
            seed: None,
        }
    }

    /// Checks that all values are within their valid ranges.
    ///
    /// # Errors
    /// Returns an error naming the first offending field.
    ///
    /// # Examples
    /// ```
    /// use ferroneat::PopulationConfig;
    ///
    /// let config = PopulationConfig {
    ///     survival_threshold: 1.5,
    ///     ..PopulationConfig::zero()
    /// };
    ///
    /// let error = config.validate().unwrap_err();
    /// assert_eq!(error.field(), "survival_threshold");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit_interval("survival_threshold", self.survival_threshold)?;
        check_unit_interval("sexual_reproduction_chance", self.sexual_reproduction_chance)?;
        if !self.distance_threshold.is_finite() || self.distance_threshold < 0.0 {
            return Err(ConfigError::new(
                "population",
                "distance_threshold",
                format!("must be finite and non-negative, got {}", self.distance_threshold),
            ));
        }
        if self.fitness_threshold.is_nan() {
            return Err(ConfigError::new(
                "population",
                "fitness_threshold",
                "must be a number",
            ));
        }
        Ok(())
    }
}

fn check_unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::new(
            "population",
            field,
            format!("must be in [0.0, 1.0], got {}", value),
        ))
    }
}

impl FromStr for FitnessCriterion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<FitnessCriterion, ConfigError> {
        match s {
            "max" => Ok(FitnessCriterion::Max),
            "min" => Ok(FitnessCriterion::Min),
            "mean" => Ok(FitnessCriterion::Mean),
            _ => Err(ConfigError::new(
                "population",
                "fitness_criterion",
                format!("has unknown value {:?} (expected max, min or mean)", s),
            )),
        }
    }
}

impl FromStr for SpeciesFitnessFunc {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<SpeciesFitnessFunc, ConfigError> {
        match s {
            "max" => Ok(SpeciesFitnessFunc::Max),
            "min" => Ok(SpeciesFitnessFunc::Min),
            "mean" => Ok(SpeciesFitnessFunc::Mean),
            "median" => Ok(SpeciesFitnessFunc::Median),
            _ => Err(ConfigError::new(
                "population",
                "species_fitness_func",
                format!("has unknown value {:?} (expected max, min, mean or median)", s),
            )),
        }
    }
}

impl fmt::Display for FitnessCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Max => "max",
            Self::Min => "min",
            Self::Mean => "mean",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_config_is_valid() {
        assert!(PopulationConfig::zero().validate().is_ok());
    }

    #[test]
    fn out_of_range_probabilities_are_rejected() {
        let config = PopulationConfig {
            sexual_reproduction_chance: -0.1,
            ..PopulationConfig::zero()
        };
        let error = config.validate().unwrap_err();
        assert_eq!(error.section(), "population");
        assert_eq!(error.field(), "sexual_reproduction_chance");
        assert!(error.to_string().contains("sexual_reproduction_chance"));
    }

    #[test]
    fn negative_distance_threshold_is_rejected() {
        let config = PopulationConfig {
            distance_threshold: -3.0,
            ..PopulationConfig::zero()
        };
        assert_eq!(config.validate().unwrap_err().field(), "distance_threshold");
    }

    #[test]
    fn unknown_aggregation_modes_are_rejected() {
        assert_eq!("mean".parse::<FitnessCriterion>().unwrap(), FitnessCriterion::Mean);
        assert_eq!(
            "median".parse::<SpeciesFitnessFunc>().unwrap(),
            SpeciesFitnessFunc::Median
        );

        let error = "median".parse::<FitnessCriterion>().unwrap_err();
        assert_eq!(error.field(), "fitness_criterion");
        assert!("average".parse::<SpeciesFitnessFunc>().is_err());
    }

    #[test]
    fn config_survives_json() {
        let config = PopulationConfig {
            size: NonZeroUsize::new(150).unwrap(),
            fitness_criterion: FitnessCriterion::Mean,
            seed: Some(9),
            ..PopulationConfig::zero()
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: PopulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.size.get(), 150);
        assert_eq!(restored.fitness_criterion, FitnessCriterion::Mean);
        assert_eq!(restored.seed, Some(9));
    }
}

use ferroneat::ConfigError;

use rand::prelude::{Rng, SliceRandom};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// The kinds of gene attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKind {
    /// A real number, such as a weight.
    Float,
    /// A flag, such as a connection's expression.
    Bool,
    /// A value chosen from a set of options,
    /// such as an activation function.
    Choice,
}

/// Initialization and mutation strategy for
/// one attribute of a gene.
pub trait Attribute {
    type Value;

    const KIND: AttributeKind;

    /// Returns a new random value.
    fn init<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Value;

    /// Returns the mutated value, which may be unchanged.
    fn mutate<R: Rng + ?Sized>(&self, value: Self::Value, rng: &mut R) -> Self::Value;

    /// Returns the value restricted to the allowed range.
    fn clamp(&self, value: Self::Value) -> Self::Value;

    /// Checks that the attribute's configuration is usable.
    fn validate(&self, name: &str) -> Result<(), ConfigError>;
}

/// Distribution of initial values for a [`FloatAttribute`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitType {
    /// Normal distribution with the configured mean and
    /// standard deviation, clamped to the allowed range.
    Gaussian,
    /// Uniform distribution over the allowed range,
    /// restricted to two standard deviations from the mean.
    Uniform,
}

/// Configuration of a real-valued attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloatAttribute {
    pub init_mean: f32,
    pub init_stdev: f32,
    pub init_type: InitType,
    /// Chance of a value being replaced by a new random value.
    pub replace_rate: f32,
    /// Chance of a value being perturbed by gaussian noise.
    pub mutate_rate: f32,
    /// Standard deviation of the perturbation noise.
    pub mutate_power: f32,
    pub min_value: f32,
    pub max_value: f32,
}

impl FloatAttribute {
    /// Returns an attribute which is always 0.
    pub const fn zero() -> FloatAttribute {
        FloatAttribute::constant(0.0)
    }

    /// Returns an attribute which is always `value`.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{Attribute, FloatAttribute};
    ///
    /// let response = FloatAttribute::constant(1.0);
    /// let mut rng = rand::thread_rng();
    ///
    /// assert_eq!(response.init(&mut rng), 1.0);
    /// assert_eq!(response.mutate(1.0, &mut rng), 1.0);
    /// ```
    pub const fn constant(value: f32) -> FloatAttribute {
        FloatAttribute {
            init_mean: value,
            init_stdev: 0.0,
            init_type: InitType::Gaussian,
            replace_rate: 0.0,
            mutate_rate: 0.0,
            mutate_power: 0.0,
            min_value: value,
            max_value: value,
        }
    }

    /// Returns a gaussian-initialized attribute bounded
    /// to `±bound`, which never mutates.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{Attribute, FloatAttribute};
    ///
    /// let weight = FloatAttribute {
    ///     mutate_rate: 0.8,
    ///     mutate_power: 0.5,
    ///     ..FloatAttribute::gaussian(0.0, 1.0, 3.0)
    /// };
    ///
    /// let value = weight.init(&mut rand::thread_rng());
    /// assert!(value.abs() <= 3.0);
    /// ```
    pub const fn gaussian(mean: f32, stdev: f32, bound: f32) -> FloatAttribute {
        FloatAttribute {
            init_mean: mean,
            init_stdev: stdev,
            init_type: InitType::Gaussian,
            replace_rate: 0.0,
            mutate_rate: 0.0,
            mutate_power: 0.0,
            min_value: -bound,
            max_value: bound,
        }
    }
}

impl Attribute for FloatAttribute {
    type Value = f32;

    const KIND: AttributeKind = AttributeKind::Float;

    fn init<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        match self.init_type {
            InitType::Gaussian => {
                let value = Normal::new(self.init_mean, self.init_stdev)
                    .map(|n| n.sample(rng))
                    .unwrap_or(self.init_mean);
                self.clamp(value)
            }
            InitType::Uniform => {
                let low = self.min_value.max(self.init_mean - 2.0 * self.init_stdev);
                let high = self.max_value.min(self.init_mean + 2.0 * self.init_stdev);
                if low < high {
                    rng.gen_range(low..=high)
                } else {
                    self.clamp(self.init_mean)
                }
            }
        }
    }

    fn mutate<R: Rng + ?Sized>(&self, value: f32, rng: &mut R) -> f32 {
        let r = rng.gen::<f32>();
        if r < self.mutate_rate {
            let noise = Normal::new(0.0, self.mutate_power)
                .map(|n| n.sample(rng))
                .unwrap_or(0.0);
            self.clamp(value + noise)
        } else if r < self.mutate_rate + self.replace_rate {
            self.init(rng)
        } else {
            value
        }
    }

    fn clamp(&self, value: f32) -> f32 {
        value.max(self.min_value).min(self.max_value)
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        check_rate(name, "replace_rate", self.replace_rate)?;
        check_rate(name, "mutate_rate", self.mutate_rate)?;
        if !(self.init_stdev >= 0.0 && self.init_stdev.is_finite()) {
            return Err(invalid(name, "init_stdev", "must be a finite non-negative number"));
        }
        if !(self.mutate_power >= 0.0 && self.mutate_power.is_finite()) {
            return Err(invalid(name, "mutate_power", "must be a finite non-negative number"));
        }
        if !self.init_mean.is_finite() {
            return Err(invalid(name, "init_mean", "must be finite"));
        }
        if !(self.min_value <= self.max_value) {
            return Err(invalid(
                name,
                "min_value",
                format!("({}) exceeds max_value ({})", self.min_value, self.max_value),
            ));
        }
        Ok(())
    }
}

/// Configuration of a boolean attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoolAttribute {
    /// Initial value, or `None` for a coin flip.
    pub default: Option<bool>,
    /// Chance of the value being replaced by a coin flip.
    pub mutate_rate: f32,
    /// Added to `mutate_rate` when the value is `false`.
    pub rate_to_true_add: f32,
    /// Added to `mutate_rate` when the value is `true`.
    pub rate_to_false_add: f32,
}

impl BoolAttribute {
    /// Returns an attribute which is always `value`.
    pub const fn fixed(value: bool) -> BoolAttribute {
        BoolAttribute {
            default: Some(value),
            mutate_rate: 0.0,
            rate_to_true_add: 0.0,
            rate_to_false_add: 0.0,
        }
    }
}

impl Attribute for BoolAttribute {
    type Value = bool;

    const KIND: AttributeKind = AttributeKind::Bool;

    fn init<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.default.unwrap_or_else(|| rng.gen())
    }

    fn mutate<R: Rng + ?Sized>(&self, value: bool, rng: &mut R) -> bool {
        let rate = self.mutate_rate
            + if value {
                self.rate_to_false_add
            } else {
                self.rate_to_true_add
            };
        // A mutation may leave the value unchanged.
        if rate > 0.0 && rng.gen::<f32>() < rate {
            rng.gen()
        } else {
            value
        }
    }

    fn clamp(&self, value: bool) -> bool {
        value
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        check_rate(name, "mutate_rate", self.mutate_rate)?;
        check_rate(name, "rate_to_true_add", self.rate_to_true_add)?;
        check_rate(name, "rate_to_false_add", self.rate_to_false_add)
    }
}

/// Configuration of an attribute chosen from a set of options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChoiceAttribute<T> {
    /// Initial value, or `None` for a random option.
    pub default: Option<T>,
    pub options: Vec<T>,
    /// Chance of the value being replaced by a random option.
    pub mutate_rate: f32,
}

impl<T> ChoiceAttribute<T> {
    /// Returns an attribute which is always `value`.
    pub const fn fixed(value: T) -> ChoiceAttribute<T> {
        ChoiceAttribute {
            default: Some(value),
            options: Vec::new(),
            mutate_rate: 0.0,
        }
    }

    /// Returns an attribute initialized to a random option,
    /// and mutated to a random option with chance `mutate_rate`.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::{ActivationType, Attribute, ChoiceAttribute};
    ///
    /// let options = vec![ActivationType::Sigmoid, ActivationType::Tanh];
    /// let activation = ChoiceAttribute::random(options.clone(), 0.1);
    ///
    /// assert!(options.contains(&activation.init(&mut rand::thread_rng())));
    /// ```
    pub fn random(options: Vec<T>, mutate_rate: f32) -> ChoiceAttribute<T> {
        ChoiceAttribute {
            default: None,
            options,
            mutate_rate,
        }
    }
}

impl<T: Copy + Default> Attribute for ChoiceAttribute<T> {
    type Value = T;

    const KIND: AttributeKind = AttributeKind::Choice;

    fn init<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.default
            .or_else(|| self.options.choose(rng).copied())
            .unwrap_or_default()
    }

    fn mutate<R: Rng + ?Sized>(&self, value: T, rng: &mut R) -> T {
        if self.mutate_rate > 0.0 && rng.gen::<f32>() < self.mutate_rate {
            self.options.choose(rng).copied().unwrap_or(value)
        } else {
            value
        }
    }

    fn clamp(&self, value: T) -> T {
        value
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        check_rate(name, "mutate_rate", self.mutate_rate)?;
        if self.options.is_empty() && (self.default.is_none() || self.mutate_rate > 0.0) {
            return Err(invalid(name, "options", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(attribute: &str, item: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::new("genetic", format!("{}.{}", attribute, item), reason)
}

fn check_rate(attribute: &str, item: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            attribute,
            item,
            format!("must be in the range [0, 1], got {}", value),
        ))
    }
}

use crate::genomics::{ActivationType, AggregationType};

use ferroneat::logging::Stats;

const SELU_LAMBDA: f32 = 1.050_701;
const SELU_ALPHA: f32 = 1.673_263_2;

impl ActivationType {
    /// Applies the activation function to `x`.
    ///
    /// Exponential functions clamp their argument
    /// to avoid overflow.
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::ActivationType;
    ///
    /// assert_eq!(ActivationType::Sigmoid.apply(0.0), 0.5);
    /// assert_eq!(ActivationType::Relu.apply(-3.0), 0.0);
    /// assert_eq!(ActivationType::Inv.apply(0.0), 0.0);
    /// ```
    pub fn apply(self, x: f32) -> f32 {
        match self {
            ActivationType::Sigmoid => 1.0 / (1.0 + (-(5.0 * x).clamp(-60.0, 60.0)).exp()),
            ActivationType::Tanh => (2.5 * x).clamp(-60.0, 60.0).tanh(),
            ActivationType::Sin => (5.0 * x).clamp(-60.0, 60.0).sin(),
            ActivationType::Gauss => (-5.0 * x.clamp(-3.4, 3.4).powi(2)).exp(),
            ActivationType::Relu => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            ActivationType::Elu => {
                if x > 0.0 {
                    x
                } else {
                    x.exp() - 1.0
                }
            }
            ActivationType::Lelu => {
                if x > 0.0 {
                    x
                } else {
                    0.005 * x
                }
            }
            ActivationType::Selu => {
                if x > 0.0 {
                    SELU_LAMBDA * x
                } else {
                    SELU_LAMBDA * SELU_ALPHA * (x.exp() - 1.0)
                }
            }
            ActivationType::Softplus => 0.2 * (1.0 + (5.0 * x).clamp(-60.0, 60.0).exp()).ln(),
            ActivationType::Identity => x,
            ActivationType::Clamped => x.clamp(-1.0, 1.0),
            ActivationType::Inv => {
                let y = 1.0 / x;
                if y.is_finite() {
                    y
                } else {
                    0.0
                }
            }
            ActivationType::Log => x.max(1e-7).ln(),
            ActivationType::Exp => x.clamp(-60.0, 60.0).exp(),
            ActivationType::Abs => x.abs(),
            ActivationType::Hat => (1.0 - x.abs()).max(0.0),
            ActivationType::Square => x * x,
            ActivationType::Cube => x * x * x,
        }
    }
}

impl AggregationType {
    /// Combines a node's weighted inputs.
    ///
    /// An empty input aggregates to 0,
    /// or 1 for [`Product`](AggregationType::Product).
    ///
    /// # Examples
    /// ```
    /// use ferroneat_nn::genomics::AggregationType;
    ///
    /// let inputs = [1.0, -4.0, 2.0];
    ///
    /// assert_eq!(AggregationType::Sum.apply(&inputs), -1.0);
    /// assert_eq!(AggregationType::MaxAbs.apply(&inputs), -4.0);
    /// assert_eq!(AggregationType::Median.apply(&inputs), 1.0);
    /// assert_eq!(AggregationType::Product.apply(&[]), 1.0);
    /// ```
    pub fn apply(self, inputs: &[f32]) -> f32 {
        if inputs.is_empty() {
            return match self {
                AggregationType::Product => 1.0,
                _ => 0.0,
            };
        }
        match self {
            AggregationType::Sum => inputs.iter().sum(),
            AggregationType::Product => inputs.iter().product(),
            AggregationType::Max => inputs.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            AggregationType::Min => inputs.iter().copied().fold(f32::INFINITY, f32::min),
            AggregationType::MaxAbs => inputs
                .iter()
                .copied()
                .fold(0.0, |best, x| if x.abs() > best.abs() { x } else { best }),
            AggregationType::Median => {
                Stats::from(inputs.iter().copied()).map_or(0.0, |stats| stats.median)
            }
            AggregationType::Mean => inputs.iter().sum::<f32>() / inputs.len() as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn bounded_activations() {
        for x in [-1e6, -2.0, -0.3, 0.0, 0.4, 3.0, 1e6] {
            assert!((0.0..=1.0).contains(&ActivationType::Sigmoid.apply(x)));
            assert!((-1.0..=1.0).contains(&ActivationType::Tanh.apply(x)));
            assert!((-1.0..=1.0).contains(&ActivationType::Clamped.apply(x)));
            assert!((0.0..=1.0).contains(&ActivationType::Gauss.apply(x)));
            assert!((0.0..=1.0).contains(&ActivationType::Hat.apply(x)));
            assert!(ActivationType::Softplus.apply(x).is_finite());
            assert!(ActivationType::Exp.apply(x).is_finite());
        }
    }

    #[test]
    fn activation_values() {
        assert!(close(ActivationType::Sigmoid.apply(1.0), 1.0 / (1.0 + (-5.0f32).exp())));
        assert!(close(ActivationType::Tanh.apply(0.2), 0.5f32.tanh()));
        assert!(close(ActivationType::Sin.apply(0.1), 0.5f32.sin()));
        assert_eq!(ActivationType::Gauss.apply(0.0), 1.0);
        assert_eq!(ActivationType::Relu.apply(2.0), 2.0);
        assert!(close(ActivationType::Elu.apply(-1.0), (-1.0f32).exp() - 1.0));
        assert_eq!(ActivationType::Lelu.apply(-2.0), -0.01);
        assert!(close(ActivationType::Selu.apply(1.0), SELU_LAMBDA));
        assert!(close(ActivationType::Softplus.apply(0.0), 0.2 * 2.0f32.ln()));
        assert_eq!(ActivationType::Identity.apply(-7.5), -7.5);
        assert_eq!(ActivationType::Clamped.apply(3.0), 1.0);
        assert_eq!(ActivationType::Inv.apply(4.0), 0.25);
        assert!(close(ActivationType::Log.apply(0.0), 1e-7f32.ln()));
        assert_eq!(ActivationType::Exp.apply(0.0), 1.0);
        assert_eq!(ActivationType::Abs.apply(-3.0), 3.0);
        assert_eq!(ActivationType::Hat.apply(0.25), 0.75);
        assert_eq!(ActivationType::Square.apply(-3.0), 9.0);
        assert_eq!(ActivationType::Cube.apply(-2.0), -8.0);
    }

    #[test]
    fn aggregations() {
        let inputs = [3.0, -1.0, 0.5, -5.0];
        assert_eq!(AggregationType::Sum.apply(&inputs), -2.5);
        assert_eq!(AggregationType::Product.apply(&inputs), 7.5);
        assert_eq!(AggregationType::Max.apply(&inputs), 3.0);
        assert_eq!(AggregationType::Min.apply(&inputs), -5.0);
        assert_eq!(AggregationType::MaxAbs.apply(&inputs), -5.0);
        assert_eq!(AggregationType::Median.apply(&inputs), -0.25);
        assert_eq!(AggregationType::Mean.apply(&inputs), -0.625);
    }

    #[test]
    fn empty_aggregations() {
        for aggregation in [
            AggregationType::Sum,
            AggregationType::Max,
            AggregationType::Min,
            AggregationType::MaxAbs,
            AggregationType::Median,
            AggregationType::Mean,
        ] {
            assert_eq!(aggregation.apply(&[]), 0.0);
        }
        assert_eq!(AggregationType::Product.apply(&[]), 1.0);
    }
}

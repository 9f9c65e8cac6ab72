use std::cmp::Ordering;

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
    /// Population standard deviation.
    pub stdev: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use ferroneat::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert!(Stats::from(std::iter::empty()).is_none());
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Option<Stats> {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return None;
        }
        let (mut max, mut min, mut sum) = (f32::MIN, f32::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mean = sum / data.len() as f32;
        let variance = data.iter().map(|d| (d - mean).powi(2)).sum::<f32>() / data.len() as f32;
        Some(Stats {
            maximum: max,
            minimum: min,
            mean,
            median: median(&mut data),
            stdev: variance.sqrt(),
        })
    }
}

/// Returns the mean of the values, or 0 if there are none.
pub(crate) fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

/// Returns the median of the values, averaging the two
/// middle values for even lengths. Reorders `values`.
pub(crate) fn median(values: &mut [f32]) -> f32 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    let mid = len / 2;
    let upper = *values.select_nth_unstable_by(mid, f32::total_cmp).1;
    if len % 2 == 1 {
        upper
    } else {
        // After selection, everything below `mid` is ≤ upper.
        let lower = values[..mid]
            .iter()
            .copied()
            .max_by(f32::total_cmp)
            .unwrap_or(upper);
        (lower + upper) / 2.0
    }
}

/// Returns the greatest of the values, ignoring NaNs where possible.
pub(crate) fn max(values: &[f32]) -> f32 {
    values
        .iter()
        .copied()
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .unwrap_or(f32::NEG_INFINITY)
}

/// Returns the least of the values, ignoring NaNs where possible.
pub(crate) fn min(values: &[f32]) -> f32 {
    values
        .iter()
        .copied()
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .unwrap_or(f32::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_length_median_averages_middle_values() {
        let stats = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied()).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
    }

    #[test]
    fn standard_deviation_is_population_based() {
        let stats = Stats::from([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].iter().copied()).unwrap();
        assert_eq!(stats.stdev, 2.0);
    }

    #[test]
    fn single_value() {
        let stats = Stats::from(std::iter::once(3.0)).unwrap();
        assert_eq!(stats.maximum, 3.0);
        assert_eq!(stats.minimum, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.stdev, 0.0);
    }

    #[test]
    fn reductions_of_empty_slices() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(median(&mut []), 0.0);
        assert_eq!(max(&[]), f32::NEG_INFINITY);
        assert_eq!(min(&[]), f32::INFINITY);
    }
}

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::processing::decimal::{divide_round, RoundingPolicy};

/// Moments about the median and the dispersion derived from them.
///
/// The third and fourth moments grow fastest; each is `None` when its sum
/// leaves the `Decimal` range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispersion {
    /// Sum of the differences from the median.
    pub moment1: Decimal,
    /// Sum of the squared differences from the median.
    pub moment2: Decimal,
    pub moment3: Option<Decimal>,
    pub moment4: Option<Decimal>,
    /// `moment2 / count`.
    pub variance: Decimal,
    /// Square root of `variance`.
    pub std_dev: Decimal,
}

/// Summary statistics for the scenario totals of one age bucket.
///
/// `min`, `max` and the quartiles are sample members and are never rounded;
/// everything else is rounded to the calculation precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketStatistics {
    pub count: usize,
    pub sum: Decimal,
    pub mean: Decimal,
    pub median: Decimal,
    pub q1: Decimal,
    pub q3: Decimal,
    pub mode: Decimal,
    /// Number of times `mode` occurs in the sample.
    pub mode_count: usize,
    pub distinct_values: usize,
    pub min: Decimal,
    pub max: Decimal,
    /// `None` when even the squared differences leave the `Decimal` range.
    pub dispersion: Option<Dispersion>,
}

impl BucketStatistics {
    /// Compute statistics for `values` at `precision` fractional digits.
    ///
    /// Quartiles use the nearest-rank definition on the sorted sample, so
    /// `min <= q1 <= median <= q3 <= max` holds for every input. The mode is
    /// the most frequent value, the smallest one on ties.
    pub fn compute(values: &[Decimal], precision: u32, rounding: RoundingPolicy) -> Result<Self> {
        if values.is_empty() {
            return Err(ChartError::EmptyInput("summary statistics need at least one value"));
        }

        let count = values.len();
        let mut sorted = values.to_vec();
        sorted.sort();

        let exact_sum = sorted
            .iter()
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
            .ok_or(ChartError::Overflow("sum"))?;
        let sum = rounding.round(exact_sum, precision);
        let mean = divide_round(exact_sum, Decimal::from(count), precision, rounding)?;

        let min = sorted[0];
        let max = sorted[count - 1];
        let q1 = sorted[nearest_rank_index(count, 1, 4)];
        let median = sorted[nearest_rank_index(count, 1, 2)];
        let q3 = sorted[nearest_rank_index(count, 3, 4)];

        let (mode, mode_count, distinct_values) = mode_of_sorted(&sorted);
        let dispersion = Dispersion::about(&sorted, median, precision, rounding);

        Ok(BucketStatistics {
            count,
            sum,
            mean,
            median,
            q1,
            q3,
            mode,
            mode_count,
            distinct_values,
            min,
            max,
            dispersion,
        })
    }

    pub fn std_dev(&self) -> Option<Decimal> {
        self.dispersion.as_ref().map(|d| d.std_dev)
    }

    /// `mean + std_dev`, the upper edge of the dispersion band.
    pub fn mean_plus_std_dev(&self) -> Option<Decimal> {
        self.std_dev().map(|sd| self.mean.saturating_add(sd))
    }

    /// `mean - std_dev`, the lower edge of the dispersion band.
    pub fn mean_minus_std_dev(&self) -> Option<Decimal> {
        self.std_dev().map(|sd| self.mean.saturating_sub(sd))
    }

    /// Format as a multi-line report string.
    pub fn report(&self, label: &str, display_precision: u32, rounding: RoundingPolicy) -> String {
        let d = |v: Decimal| rounding.round(v, display_precision);
        let std_dev = match self.std_dev() {
            Some(sd) => d(sd).to_string(),
            None => "out of range".to_string(),
        };
        format!(
            "{}:\n  Count: {}\n  Sum: {}\n  Mean: {}\n  Median: {}\n  Q1: {}\n  Q3: {}\n  Mode: {} (x{})\n  Min: {}\n  Max: {}\n  Std Dev: {}\n",
            label,
            self.count,
            d(self.sum),
            d(self.mean),
            d(self.median),
            d(self.q1),
            d(self.q3),
            d(self.mode),
            self.mode_count,
            d(self.min),
            d(self.max),
            std_dev,
        )
    }
}

impl Dispersion {
    fn about(sorted: &[Decimal], centre: Decimal, precision: u32, rounding: RoundingPolicy) -> Option<Self> {
        let mut sums = [Some(Decimal::ZERO); 4];
        for v in sorted {
            let diff = v.checked_sub(centre)?;
            let mut power = Some(Decimal::ONE);
            for sum in sums.iter_mut() {
                power = power.and_then(|p| p.checked_mul(diff));
                *sum = match (*sum, power) {
                    (Some(acc), Some(p)) => acc.checked_add(p),
                    _ => None,
                };
            }
        }
        let [moment1, moment2, moment3, moment4] = sums.map(|m| m.map(|m| rounding.round(m, precision)));
        let moment1 = moment1?;
        let moment2 = moment2?;

        let variance = divide_round(moment2, Decimal::from(sorted.len()), precision, rounding).ok()?;
        let std_dev = rounding.round(variance.sqrt()?, precision);

        Some(Dispersion {
            moment1,
            moment2,
            moment3,
            moment4,
            variance,
            std_dev,
        })
    }
}

/// Zero-based index of the nearest-rank percentile `num/den` in a sample of `n`.
fn nearest_rank_index(n: usize, num: usize, den: usize) -> usize {
    let rank = (n * num).div_ceil(den).max(1);
    rank - 1
}

/// Returns `(mode, occurrences, distinct values)`; the earliest (smallest)
/// value wins a tie.
fn mode_of_sorted(sorted: &[Decimal]) -> (Decimal, usize, usize) {
    let mut mode = sorted[0];
    let mut mode_count = 0;
    let mut distinct = 0;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|v| **v == value).count();
        distinct += 1;
        if run > mode_count {
            mode = value;
            mode_count = run;
        }
        i += run;
    }
    (mode, mode_count, distinct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_input_is_an_error() {
        let err = BucketStatistics::compute(&[], 10, RoundingPolicy::HalfUp);
        assert!(matches!(err, Err(ChartError::EmptyInput(_))));
    }

    #[test]
    fn single_value_collapses_everything() {
        let s = BucketStatistics::compute(&[dec!(7.5)], 4, RoundingPolicy::HalfUp).unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.sum, dec!(7.5));
        assert_eq!(s.mean, dec!(7.5));
        assert_eq!(s.min, s.max);
        assert_eq!(s.q1, dec!(7.5));
        assert_eq!(s.q3, dec!(7.5));
        assert_eq!(s.mode, dec!(7.5));
        let d = s.dispersion.unwrap();
        assert_eq!(d.variance, Decimal::ZERO);
        assert_eq!(d.std_dev, Decimal::ZERO);
    }

    #[test]
    fn nearest_rank_quartiles_of_five() {
        let values = [dec!(5), dec!(1), dec!(4), dec!(2), dec!(3)];
        let s = BucketStatistics::compute(&values, 2, RoundingPolicy::HalfUp).unwrap();
        assert_eq!(s.min, dec!(1));
        assert_eq!(s.q1, dec!(2));
        assert_eq!(s.median, dec!(3));
        assert_eq!(s.q3, dec!(4));
        assert_eq!(s.max, dec!(5));
        assert_eq!(s.sum, dec!(15));
        assert_eq!(s.mean, dec!(3));
    }

    #[test]
    fn even_sample_uses_lower_middle() {
        let values = [dec!(10), dec!(20), dec!(30), dec!(40)];
        let s = BucketStatistics::compute(&values, 2, RoundingPolicy::HalfUp).unwrap();
        assert_eq!(s.q1, dec!(10));
        assert_eq!(s.median, dec!(20));
        assert_eq!(s.q3, dec!(30));
    }

    #[test]
    fn mode_prefers_smallest_on_tie() {
        let values = [dec!(3), dec!(1), dec!(3), dec!(1), dec!(2)];
        let s = BucketStatistics::compute(&values, 2, RoundingPolicy::HalfUp).unwrap();
        assert_eq!(s.mode, dec!(1));
        assert_eq!(s.mode_count, 2);
        assert_eq!(s.distinct_values, 3);
    }

    #[test]
    fn mean_is_rounded_with_policy() {
        let values = [dec!(1), dec!(1), dec!(2)];
        let up = BucketStatistics::compute(&values, 3, RoundingPolicy::HalfUp).unwrap();
        assert_eq!(up.mean, dec!(1.333));
        let ceil = BucketStatistics::compute(&values, 3, RoundingPolicy::Ceiling).unwrap();
        assert_eq!(ceil.mean, dec!(1.334));
    }

    #[test]
    fn moments_are_taken_about_the_median() {
        let values = [dec!(1), dec!(2), dec!(6)];
        let s = BucketStatistics::compute(&values, 6, RoundingPolicy::HalfUp).unwrap();
        // deviations from median 2: -1, 0, 4
        let d = s.dispersion.unwrap();
        assert_eq!(d.moment1, dec!(3));
        assert_eq!(d.moment2, dec!(17));
        assert_eq!(d.moment3, Some(dec!(63)));
        assert_eq!(d.moment4, Some(dec!(257)));
        assert_eq!(d.variance, dec!(5.666667));
        assert_eq!(d.std_dev, dec!(2.380476));
    }

    #[test]
    fn band_edges_straddle_the_mean() {
        let values = [dec!(8), dec!(10), dec!(12)];
        let s = BucketStatistics::compute(&values, 4, RoundingPolicy::HalfUp).unwrap();
        let upper = s.mean_plus_std_dev().unwrap();
        let lower = s.mean_minus_std_dev().unwrap();
        assert!(lower <= s.mean);
        assert!(upper >= s.mean);
        assert_eq!(upper - s.mean, s.mean - lower);
    }

    #[test]
    fn wide_spread_drops_high_moments_only() {
        // deviations of 1e8 overflow the fourth power but not the square
        let values = [dec!(0), dec!(50000000), dec!(100000000), dec!(150000000), dec!(200000000)];
        let s = BucketStatistics::compute(&values, 10, RoundingPolicy::HalfUp).unwrap();
        assert_eq!(s.median, dec!(100000000));
        let d = s.dispersion.unwrap();
        assert_eq!(d.moment1, dec!(0));
        assert_eq!(d.moment2, dec!(25000000000000000));
        assert_eq!(d.moment4, None);
        assert_eq!(d.variance, dec!(5000000000000000));
    }

    #[test]
    fn huge_spread_keeps_order_statistics() {
        let values = [dec!(0), dec!(50000000000000000), dec!(100000000000000000)];
        let s = BucketStatistics::compute(&values, 4, RoundingPolicy::HalfUp).unwrap();
        assert_eq!(s.dispersion, None);
        assert_eq!(s.mean_plus_std_dev(), None);
        assert_eq!(s.median, dec!(50000000000000000));
        assert!(s.report("wide", 2, RoundingPolicy::HalfUp).contains("Std Dev: out of range"));
    }

    #[test]
    fn report_uses_display_precision() {
        let values = [dec!(1), dec!(1), dec!(2)];
        let s = BucketStatistics::compute(&values, 10, RoundingPolicy::HalfUp).unwrap();
        let text = s.report("bucket 5", 3, RoundingPolicy::HalfUp);
        assert!(text.starts_with("bucket 5:"));
        assert!(text.contains("Mean: 1.333\n"));
    }
}

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{ChartError, Result};
use crate::processing::decimal::RoundingPolicy;
use crate::processing::statistics::BucketStatistics;
use crate::state::data_series::ScenarioSeries;

/// Bucket key (exclusive upper age) to that bucket's statistics.
pub type CohortStatistics = BTreeMap<u32, BucketSummary>;

/// Statistics of one bucket together with the ages it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSummary {
    /// First age of the span the bucket is drawn over; the span ends at the
    /// bucket key.
    pub start: u32,
    /// Ages summed into the bucket, ascending.
    pub ages: Vec<u32>,
    pub stats: BucketStatistics,
}

impl BucketSummary {
    pub fn new(start: u32, ages: Vec<u32>, stats: BucketStatistics) -> Self {
        Self { start, ages, stats }
    }

    /// `first..=last` of the summed ages, e.g. `70..=99`.
    pub fn age_label(&self) -> String {
        match (self.ages.first(), self.ages.last()) {
            (Some(first), Some(last)) if first == last => first.to_string(),
            (Some(first), Some(last)) => format!("{first}..={last}"),
            _ => String::from("none"),
        }
    }
}

/// Per-scenario totals for one age bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    /// First age of the drawn span: the run's first age, or the threshold for
    /// the terminal bucket.
    pub start: u32,
    /// Ages summed into this bucket, ascending.
    pub ages: Vec<u32>,
    /// One total per scenario, in input series order.
    pub totals: Vec<Decimal>,
}

impl Bucket {
    fn empty(start: u32, scenarios: usize) -> Self {
        Self {
            start,
            ages: Vec::new(),
            totals: vec![Decimal::ZERO; scenarios],
        }
    }

    fn add(&mut self, age: u32, counts: &[Decimal]) -> Result<()> {
        for (total, count) in self.totals.iter_mut().zip(counts) {
            *total = total
                .checked_add(*count)
                .ok_or(ChartError::Overflow("bucket total"))?;
        }
        self.ages.push(age);
        Ok(())
    }
}

/// Scenario totals grouped into age buckets, keyed by each bucket's exclusive
/// upper age.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeBuckets {
    pub scenarios: Vec<String>,
    pub buckets: BTreeMap<u32, Bucket>,
}

impl AgeBuckets {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn totals(&self, key: u32) -> Option<&[Decimal]> {
        self.buckets.get(&key).map(|b| b.totals.as_slice())
    }

    /// Summarise every bucket. The first failing bucket aborts the whole map.
    pub fn statistics(&self, precision: u32, rounding: RoundingPolicy) -> Result<CohortStatistics> {
        let mut stats = CohortStatistics::new();
        for (&key, bucket) in &self.buckets {
            let s = BucketStatistics::compute(&bucket.totals, precision, rounding)?;
            tracing::debug!(
                "bucket {key}: ages {:?}..={:?}, median {}",
                bucket.ages.first(),
                bucket.ages.last(),
                s.median
            );
            stats.insert(key, BucketSummary::new(bucket.start, bucket.ages.clone(), s));
        }
        Ok(stats)
    }
}

/// Sum aligned scenario series into age buckets.
///
/// Ages below `end_year_threshold` are grouped in runs of `age_interval`
/// consecutive ages; a run is keyed by its last age + 1. A short run just
/// below the threshold is closed as its own bucket. All ages at or above the
/// threshold fall into one terminal bucket keyed `end_year_threshold +
/// age_interval`. Every bucket starts from zero.
pub fn aggregate(
    series: &[ScenarioSeries],
    age_interval: u32,
    end_year_threshold: u32,
) -> Result<AgeBuckets> {
    let reference = series
        .first()
        .ok_or(ChartError::EmptyInput("no scenario series to aggregate"))?;
    if age_interval == 0 {
        return Err(ChartError::InvalidConfiguration(
            "age_interval must be at least 1".to_string(),
        ));
    }
    check_alignment(series)?;

    let scenarios = series.len();
    let mut buckets = BTreeMap::new();
    let mut run = Bucket::empty(0, scenarios);
    let mut terminal = Bucket::empty(end_year_threshold, scenarios);
    let mut counts = Vec::with_capacity(scenarios);

    for age in reference.ages() {
        counts.clear();
        for s in series {
            let count = s.count(age).ok_or_else(|| ChartError::MissingAgeKey {
                age,
                series: s.label.clone(),
            })?;
            counts.push(count);
        }

        if age >= end_year_threshold {
            terminal.add(age, &counts)?;
            continue;
        }

        if run.ages.is_empty() {
            run.start = age;
        }
        run.add(age, &counts)?;
        if run.ages.len() == age_interval as usize {
            close_run(&mut buckets, &mut run, scenarios);
        }
    }

    if !run.ages.is_empty() {
        close_run(&mut buckets, &mut run, scenarios);
    }
    if !terminal.ages.is_empty() {
        buckets.insert(end_year_threshold.saturating_add(age_interval), terminal);
    }

    tracing::debug!(
        "aggregated {} ages from {} scenarios into {} buckets",
        reference.len(),
        scenarios,
        buckets.len()
    );

    Ok(AgeBuckets {
        scenarios: series.iter().map(|s| s.label.clone()).collect(),
        buckets,
    })
}

fn close_run(buckets: &mut BTreeMap<u32, Bucket>, run: &mut Bucket, scenarios: usize) {
    let done = std::mem::replace(run, Bucket::empty(0, scenarios));
    if let Some(&last) = done.ages.last() {
        buckets.insert(last.saturating_add(1), done);
    }
}

/// Every series must carry exactly the reference series' ages.
fn check_alignment(series: &[ScenarioSeries]) -> Result<()> {
    let Some((reference, rest)) = series.split_first() else {
        return Ok(());
    };
    for s in rest {
        if let Some(age) = reference.ages().find(|a| s.count(*a).is_none()) {
            return Err(ChartError::MissingAgeKey {
                age,
                series: s.label.clone(),
            });
        }
        if let Some(age) = s.ages().find(|a| reference.count(*a).is_none()) {
            return Err(ChartError::MissingAgeKey {
                age,
                series: reference.label.clone(),
            });
        }
    }
    Ok(())
}

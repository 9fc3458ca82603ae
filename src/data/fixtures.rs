//! Synthetic population counts used by the demo binary and the tests.
//!
//! Each series starts at a given age-0 count and decays year on year by a
//! multiplier that depends on the age range, up to age 99.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::state::data_series::{Cohort, ScenarioSeries};

/// Age-0 counts of the five default scenarios.
pub const DEFAULT_STARTS: [u32; 5] = [10000, 9000, 9900, 9950, 9800];

/// Oldest age generated, inclusive.
pub const MAX_AGE: u32 = 99;

/// `(first age, last age exclusive, yearly multiplier in hundredths)`.
const FEMALE_DECAY: [(u32, u32, i64); 7] = [
    (0, 5, 94),
    (5, 10, 95),
    (10, 15, 96),
    (15, 20, 97),
    (20, 60, 99),
    (60, 80, 97),
    (80, 100, 75),
];

const MALE_DECAY: [(u32, u32, i64); 7] = [
    (0, 5, 93),
    (5, 10, 94),
    (10, 15, 95),
    (15, 20, 96),
    (20, 60, 98),
    (60, 70, 70),
    (70, 100, 50),
];

/// Decayed population for one cohort, labelled by its age-0 count.
pub fn population(age0: u32, cohort: Cohort) -> ScenarioSeries {
    let table = match cohort {
        Cohort::Female => &FEMALE_DECAY,
        Cohort::Male => &MALE_DECAY,
    };

    let mut counts = BTreeMap::new();
    let mut pop = Decimal::from(age0);
    for &(start, end, hundredths) in table {
        let change = Decimal::new(hundredths, 2);
        for age in start..end {
            counts.insert(age, pop);
            pop = pop.saturating_mul(change);
        }
    }
    ScenarioSeries::from_counts(age0.to_string(), counts)
}

/// The five default scenarios for `cohort`.
pub fn default_scenarios(cohort: Cohort) -> Vec<ScenarioSeries> {
    DEFAULT_STARTS
        .iter()
        .map(|&age0| population(age0, cohort))
        .collect()
}

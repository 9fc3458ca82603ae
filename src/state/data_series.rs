use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One of the two compared populations. Female is drawn to the right of the
/// origin column, male mirrored to the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    Female,
    Male,
}

impl Cohort {
    pub const ALL: [Cohort; 2] = [Cohort::Female, Cohort::Male];

    pub fn label(&self) -> &'static str {
        match self {
            Cohort::Female => "Female",
            Cohort::Male => "Male",
        }
    }

    /// Sign applied to data values before they are mapped to screen columns.
    pub fn sign(&self) -> Decimal {
        match self {
            Cohort::Female => Decimal::ONE,
            Cohort::Male => Decimal::NEGATIVE_ONE,
        }
    }
}

/// Population counts by age for one scenario of one cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSeries {
    pub label: String,
    pub counts: BTreeMap<u32, Decimal>,
}

impl ScenarioSeries {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            counts: BTreeMap::new(),
        }
    }

    pub fn from_counts(label: impl Into<String>, counts: BTreeMap<u32, Decimal>) -> Self {
        Self {
            label: label.into(),
            counts,
        }
    }

    pub fn insert(&mut self, age: u32, count: Decimal) {
        self.counts.insert(age, count);
    }

    pub fn count(&self, age: u32) -> Option<Decimal> {
        self.counts.get(&age).copied()
    }

    pub fn ages(&self) -> impl Iterator<Item = u32> + '_ {
        self.counts.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Largest single-age count, if any.
    pub fn max_count(&self) -> Option<Decimal> {
        self.counts.values().copied().max()
    }
}

//! Population pyramid charts.
//!
//! Scenario series of population counts by age are summed into age buckets,
//! summarised per bucket, and drawn as mirrored female/male box plots or band
//! lines. Rendering produces an ordered list of [`DrawOp`]s that any
//! [`Surface`] can replay.

pub mod chart;
pub mod data;
pub mod error;
pub mod processing;
pub mod render;
pub mod state;

pub use chart::PopulationChart;
pub use error::{ChartError, Result};
pub use processing::decimal::RoundingPolicy;
pub use processing::statistics::BucketStatistics;
pub use render::ops::{DrawOp, Surface};
pub use render::ChartKind;
pub use state::config::{AxisRange, ChartConfig};
pub use state::data_series::{Cohort, ScenarioSeries};

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::processing::decimal::RoundingPolicy;
use crate::render::ChartKind;
use crate::state::theme::Theme;

/// Largest scale a `Decimal` can carry.
pub const MAX_PRECISION: u32 = 28;

/// Closed data-space interval along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl AxisRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// `[-extent, extent]`, the value range of a mirrored chart.
    pub fn symmetric(extent: Decimal) -> Self {
        let extent = extent.abs();
        Self {
            min: -extent,
            max: extent,
        }
    }

    /// `max - min`; an overflow when the span leaves the `Decimal` range.
    pub fn span(&self) -> Result<Decimal> {
        self.max
            .checked_sub(self.min)
            .ok_or(ChartError::Overflow("axis span"))
    }

    fn validate(&self, axis: &str) -> Result<()> {
        if self.max <= self.min {
            return Err(ChartError::InvalidConfiguration(format!(
                "{axis} range is empty: [{}, {}]",
                self.min, self.max
            )));
        }
        self.span()?;
        Ok(())
    }
}

/// Everything a render needs besides the data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub chart: ChartKind,
    pub theme: Theme,
    /// Width in years of each age bucket.
    pub age_interval: u32,
    /// Ages at or above this are folded into one terminal bucket.
    pub end_year_threshold: u32,
    /// Fractional digits kept by statistics and geometry.
    pub calculation_precision: u32,
    /// Fractional digits used when statistics are reported.
    pub display_precision: u32,
    pub rounding: RoundingPolicy,
    pub plot_width: u32,
    pub plot_height: u32,
    /// Pixel offset of the plot area from the surface's left edge.
    pub margin_left: u32,
    /// Pixel offset of the plot area from the surface's top edge.
    pub margin_top: u32,
    /// Population range. `None` derives a symmetric range from the data.
    pub value_range: Option<AxisRange>,
    pub age_range: AxisRange,
    pub draw_origin_line: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            chart: ChartKind::default(),
            theme: Theme::default(),
            age_interval: 5,
            end_year_threshold: 70,
            calculation_precision: 10,
            display_precision: 3,
            rounding: RoundingPolicy::HalfUp,
            plot_width: 1000,
            plot_height: 500,
            margin_left: 0,
            margin_top: 0,
            value_range: None,
            age_range: AxisRange::new(Decimal::ZERO, Decimal::ONE_HUNDRED),
            draw_origin_line: true,
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ChartConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings that cannot produce a chart.
    pub fn validate(&self) -> Result<()> {
        if self.age_interval == 0 {
            return Err(ChartError::InvalidConfiguration(
                "age_interval must be at least 1".to_string(),
            ));
        }
        if self.plot_width == 0 || self.plot_height == 0 {
            return Err(ChartError::InvalidConfiguration(format!(
                "plot size must be positive, got {}x{}",
                self.plot_width, self.plot_height
            )));
        }
        if self.calculation_precision > MAX_PRECISION || self.display_precision > MAX_PRECISION {
            return Err(ChartError::InvalidConfiguration(format!(
                "precision may not exceed {MAX_PRECISION} digits"
            )));
        }
        self.age_range.validate("age")?;
        if let Some(range) = &self.value_range {
            range.validate("value")?;
        }
        Ok(())
    }

    /// Surface size needed to hold the plot and its margins.
    pub fn surface_size(&self) -> (u32, u32) {
        (
            self.plot_width.saturating_add(self.margin_left.saturating_mul(2)),
            self.plot_height.saturating_add(self.margin_top.saturating_mul(2)),
        )
    }
}

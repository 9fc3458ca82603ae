use rust_decimal::Decimal;

use crate::error::{ChartError, Result};
use crate::processing::decimal::{divide_round, to_pixel, RoundingPolicy};
use crate::state::config::{AxisRange, ChartConfig};
use crate::state::data_series::Cohort;

/// Data-space to pixel mapping shared by both cohorts.
///
/// Columns are measured from the origin column, the pixel where a population
/// of zero sits; negative values land to its left. Rows grow downward with
/// age. Inputs outside the configured ranges are mapped, not clamped, and
/// saturate at the `i32` limits.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenGeometry {
    cell_width: Decimal,
    cell_height: Decimal,
    value_range: AxisRange,
    age_range: AxisRange,
    height: u32,
    left: i32,
    top: i32,
    origin_column: i32,
    rounding: RoundingPolicy,
}

impl ScreenGeometry {
    /// `cell_width` and `cell_height` are data units per pixel, rounded to
    /// `precision` fractional digits.
    pub fn new(
        width: u32,
        height: u32,
        value_range: AxisRange,
        age_range: AxisRange,
        precision: u32,
        rounding: RoundingPolicy,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ChartError::InvalidConfiguration(format!(
                "plot size must be positive, got {width}x{height}"
            )));
        }
        if value_range.max <= value_range.min || age_range.max <= age_range.min {
            return Err(ChartError::InvalidConfiguration(format!(
                "empty range: value [{}, {}], age [{}, {}]",
                value_range.min, value_range.max, age_range.min, age_range.max
            )));
        }

        let cell_width = divide_round(value_range.span()?, Decimal::from(width), precision, rounding)?;
        let cell_height = divide_round(age_range.span()?, Decimal::from(height), precision, rounding)?;
        if cell_width.is_zero() || cell_height.is_zero() {
            return Err(ChartError::InvalidConfiguration(format!(
                "cell size rounds to zero at {precision} digits"
            )));
        }

        let mut geometry = Self {
            cell_width,
            cell_height,
            value_range,
            age_range,
            height,
            left: 0,
            top: 0,
            origin_column: 0,
            rounding,
        };
        geometry.origin_column = geometry.cells(-value_range.min, cell_width);
        tracing::debug!(
            "geometry {}x{}: cell {} x {}, origin column {}",
            width,
            height,
            cell_width,
            cell_height,
            geometry.origin_column
        );
        Ok(geometry)
    }

    pub fn from_config(config: &ChartConfig, value_range: AxisRange) -> Result<Self> {
        let geometry = Self::new(
            config.plot_width,
            config.plot_height,
            value_range,
            config.age_range,
            config.calculation_precision,
            config.rounding,
        )?;
        Ok(geometry.with_offset(config.margin_left, config.margin_top))
    }

    /// Shift the plot area by a pixel margin.
    pub fn with_offset(mut self, left: u32, top: u32) -> Self {
        let left = i32::try_from(left).unwrap_or(i32::MAX);
        let top = i32::try_from(top).unwrap_or(i32::MAX);
        self.origin_column = self
            .origin_column
            .saturating_sub(self.left)
            .saturating_add(left);
        self.left = left;
        self.top = top;
        self
    }

    pub fn cell_width(&self) -> Decimal {
        self.cell_width
    }

    pub fn cell_height(&self) -> Decimal {
        self.cell_height
    }

    pub fn value_range(&self) -> AxisRange {
        self.value_range
    }

    pub fn origin_column(&self) -> i32 {
        self.origin_column
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn bottom(&self) -> i32 {
        self.top.saturating_add(i32::try_from(self.height).unwrap_or(i32::MAX))
    }

    /// Column of a signed population value.
    pub fn to_screen_column(&self, value: Decimal) -> i32 {
        self.origin_column
            .saturating_add(self.cells(value, self.cell_width))
    }

    /// Row of an age; older ages are lower on screen.
    pub fn to_screen_row(&self, age: Decimal) -> i32 {
        let offset = age.saturating_sub(self.age_range.min);
        self.top.saturating_add(self.cells(offset, self.cell_height))
    }

    /// Column of a cohort's unsigned value. Female values map as-is, male
    /// values are negated so the male cohort mirrors onto the left.
    pub fn cohort_column(&self, cohort: Cohort, value: Decimal) -> i32 {
        self.to_screen_column(value.saturating_mul(cohort.sign()))
    }

    /// Whole pixels covered by an age span.
    pub fn rows_for(&self, age_span: Decimal) -> i32 {
        self.cells(age_span, self.cell_height)
    }

    fn cells(&self, value: Decimal, cell: Decimal) -> i32 {
        match value.checked_div(cell) {
            Some(q) => to_pixel(self.rounding.round(q, 0)),
            None if value.is_sign_negative() != cell.is_sign_negative() => i32::MIN,
            None => i32::MAX,
        }
    }
}

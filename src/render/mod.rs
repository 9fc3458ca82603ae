pub mod band_line;
pub mod box_plot;
pub mod ops;
pub mod raster;
pub mod transform;

use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::processing::aggregation::CohortStatistics;
use crate::processing::statistics::BucketStatistics;
use crate::state::data_series::Cohort;
use crate::state::theme::Theme;

use self::band_line::{DispersionBand, FiveNumberBand};
use self::box_plot::BoxPlot;
use self::ops::DrawOp;
use self::transform::ScreenGeometry;

/// Pixels left empty between vertically adjacent boxes.
pub const BUCKET_GUTTER: i32 = 4;

/// Which visualization a chart produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    BoxPlot,
    DispersionBand,
    FiveNumberBand,
}

impl Default for ChartKind {
    fn default() -> Self {
        ChartKind::BoxPlot
    }
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [
        ChartKind::BoxPlot,
        ChartKind::DispersionBand,
        ChartKind::FiveNumberBand,
    ];

    pub fn renderer(&self) -> &'static dyn Renderer {
        match self {
            ChartKind::BoxPlot => &BoxPlot,
            ChartKind::DispersionBand => &DispersionBand,
            ChartKind::FiveNumberBand => &FiveNumberBand,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::BoxPlot => "Box Plot",
            ChartKind::DispersionBand => "Mean and Standard Deviation",
            ChartKind::FiveNumberBand => "Min, Quartiles and Max",
        }
    }
}

/// Read-only state shared by every drawing call of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub geometry: ScreenGeometry,
    pub theme: Theme,
}

impl RenderContext {
    pub fn new(geometry: ScreenGeometry, theme: Theme) -> Self {
        Self { geometry, theme }
    }

    /// Height of the box for a bucket drawn over ages `start..end`: the
    /// bucket's pixel height minus the gutter. Clamped at zero when the
    /// gutter is taller than the bucket.
    pub fn box_height(&self, start: u32, end: u32) -> i32 {
        let span = Decimal::from(end) - Decimal::from(start);
        self.geometry
            .rows_for(span)
            .saturating_sub(BUCKET_GUTTER)
            .max(0)
    }

    /// Age halfway through `start..end`.
    pub fn bucket_midpoint(&self, start: u32, end: u32) -> Decimal {
        (Decimal::from(start) + Decimal::from(end)) / Decimal::TWO
    }
}

/// A chart variant that turns per-bucket statistics into drawing operations.
pub trait Renderer {
    fn kind(&self) -> ChartKind;

    /// Emit one cohort's geometry, buckets in ascending age order.
    fn draw_cohort(
        &self,
        ctx: &RenderContext,
        cohort: Cohort,
        stats: &CohortStatistics,
        ops: &mut Vec<DrawOp>,
    );

    /// Largest unsigned value this variant plots for one bucket. Fails when
    /// the bucket lacks a statistic the variant draws.
    fn value_extent(&self, stats: &BucketStatistics) -> Result<Decimal>;

    /// Female cohort first, then the mirrored male cohort.
    fn render(&self, ctx: &RenderContext, female: &CohortStatistics, male: &CohortStatistics) -> Vec<DrawOp> {
        let mut ops = Vec::new();
        self.draw_cohort(ctx, Cohort::Female, female, &mut ops);
        self.draw_cohort(ctx, Cohort::Male, male, &mut ops);
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::decimal::RoundingPolicy;
    use crate::state::config::AxisRange;
    use rust_decimal_macros::dec;

    fn ctx() -> RenderContext {
        let g = ScreenGeometry::new(
            1000,
            500,
            AxisRange::symmetric(dec!(50000)),
            AxisRange::new(dec!(0), dec!(100)),
            10,
            RoundingPolicy::HalfUp,
        )
        .unwrap();
        RenderContext::new(g, Theme::Light)
    }

    #[test]
    fn box_height_leaves_gutter() {
        let c = ctx();
        assert_eq!(c.box_height(0, 5), 21);
        assert_eq!(c.box_height(70, 75), 21);
        assert_eq!(c.box_height(4, 5), 1);
        // short run closed at the threshold
        assert_eq!(c.box_height(5, 7), 6);
    }

    #[test]
    fn box_height_never_negative() {
        let g = ScreenGeometry::new(
            100,
            10,
            AxisRange::symmetric(dec!(10)),
            AxisRange::new(dec!(0), dec!(100)),
            4,
            RoundingPolicy::HalfUp,
        )
        .unwrap();
        assert_eq!(RenderContext::new(g, Theme::Light).box_height(0, 5), 0);
    }

    #[test]
    fn midpoints_follow_the_bucket_span() {
        let c = ctx();
        assert_eq!(c.bucket_midpoint(0, 5), dec!(2.5));
        assert_eq!(c.bucket_midpoint(5, 7), dec!(6));
        assert_eq!(c.bucket_midpoint(70, 75), dec!(72.5));
    }

    #[test]
    fn kinds_select_matching_renderer() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.renderer().kind(), kind);
        }
    }
}

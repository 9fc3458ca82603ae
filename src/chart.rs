use image::RgbaImage;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::processing::aggregation::{aggregate, CohortStatistics};
use crate::render::ops::{replay, DrawOp, Surface};
use crate::render::raster::RasterSurface;
use crate::render::transform::ScreenGeometry;
use crate::render::{RenderContext, Renderer};
use crate::state::config::{AxisRange, ChartConfig};
use crate::state::data_series::{Cohort, ScenarioSeries};

/// A fully computed chart: per-bucket statistics for both cohorts and the
/// geometry they are drawn with.
///
/// Building is all-or-nothing. Any failing bucket, misaligned series or bad
/// setting aborts the build, so a `PopulationChart` always renders.
#[derive(Debug, Clone)]
pub struct PopulationChart {
    config: ChartConfig,
    female: CohortStatistics,
    male: CohortStatistics,
    context: RenderContext,
}

impl PopulationChart {
    pub fn build(config: ChartConfig, female: &[ScenarioSeries], male: &[ScenarioSeries]) -> Result<Self> {
        config.validate()?;

        let summarise = |series: &[ScenarioSeries]| -> Result<CohortStatistics> {
            aggregate(series, config.age_interval, config.end_year_threshold)?
                .statistics(config.calculation_precision, config.rounding)
        };
        let female = summarise(female)?;
        let male = summarise(male)?;

        let extent = value_extent(config.chart.renderer(), &female, &male)?;
        let value_range = config.value_range.unwrap_or(AxisRange::symmetric(extent));
        let geometry = ScreenGeometry::from_config(&config, value_range)?;

        tracing::info!(
            "{} chart: {} female / {} male buckets, values [{}, {}], rounding {}, theme {}",
            config.chart.label(),
            female.len(),
            male.len(),
            geometry.value_range().min,
            geometry.value_range().max,
            config.rounding.label(),
            config.theme.label()
        );

        let context = RenderContext::new(geometry, config.theme);
        Ok(Self {
            config,
            female,
            male,
            context,
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn statistics(&self, cohort: Cohort) -> &CohortStatistics {
        match cohort {
            Cohort::Female => &self.female,
            Cohort::Male => &self.male,
        }
    }

    pub fn value_range(&self) -> AxisRange {
        self.context.geometry.value_range()
    }

    /// The chart as drawing operations: the origin line if enabled, then the
    /// female cohort, then the male cohort.
    pub fn draw_ops(&self) -> Vec<DrawOp> {
        let g = &self.context.geometry;
        let mut ops = Vec::new();
        if self.config.draw_origin_line {
            let x = g.origin_column();
            ops.push(DrawOp::line(x, g.top(), x, g.bottom(), self.context.theme.origin_line()));
        }
        ops.extend(
            self.config
                .chart
                .renderer()
                .render(&self.context, &self.female, &self.male),
        );
        tracing::debug!("{} draw ops", ops.len());
        ops
    }

    pub fn render_to<S: Surface + ?Sized>(&self, surface: &mut S) {
        replay(&self.draw_ops(), surface);
    }

    /// Draw onto a fresh image sized for the plot and its margins.
    pub fn rasterize(&self) -> RgbaImage {
        let (width, height) = self.config.surface_size();
        let mut surface = RasterSurface::new(width, height, self.context.theme.plot_bg());
        self.render_to(&mut surface);
        surface.into_image()
    }

    /// Statistics of every bucket of both cohorts, formatted for display.
    pub fn report(&self) -> String {
        let mut out = String::new();
        for cohort in Cohort::ALL {
            for bucket in self.statistics(cohort).values() {
                let label = format!("{} ages {}", cohort.label(), bucket.age_label());
                out.push_str(
                    &bucket
                        .stats
                        .report(&label, self.config.display_precision, self.config.rounding),
                );
            }
        }
        out
    }
}

/// Largest plotted value over both cohorts. Every bucket must have one, even
/// when the value range is configured.
fn value_extent(renderer: &dyn Renderer, female: &CohortStatistics, male: &CohortStatistics) -> Result<Decimal> {
    let mut extent = Decimal::ZERO;
    for bucket in female.values().chain(male.values()) {
        extent = extent.max(renderer.value_extent(&bucket.stats)?.abs());
    }
    Ok(extent)
}

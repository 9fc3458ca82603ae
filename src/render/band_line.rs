use rust_decimal::Decimal;

use crate::error::{ChartError, Result};
use crate::processing::aggregation::CohortStatistics;
use crate::processing::statistics::BucketStatistics;
use crate::render::ops::DrawOp;
use crate::render::{ChartKind, RenderContext, Renderer};
use crate::state::data_series::Cohort;
use crate::state::theme::{Color, Theme};

/// One polyline of a band chart: which statistic it follows and its shade.
struct Track {
    value: fn(&BucketStatistics) -> Option<Decimal>,
    shade: fn(&Theme) -> Color,
}

/// Mean line between the mean ± one standard deviation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispersionBand;

/// Min, max, quartile and median lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiveNumberBand;

// Paint order: outer bands first, central line last.
const DISPERSION_TRACKS: [Track; 3] = [
    Track {
        value: BucketStatistics::mean_plus_std_dev,
        shade: Theme::band_outer,
    },
    Track {
        value: BucketStatistics::mean_minus_std_dev,
        shade: Theme::band_outer,
    },
    Track {
        value: |s| Some(s.mean),
        shade: Theme::stroke,
    },
];

const FIVE_NUMBER_TRACKS: [Track; 5] = [
    Track {
        value: |s| Some(s.min),
        shade: Theme::band_outer,
    },
    Track {
        value: |s| Some(s.max),
        shade: Theme::band_outer,
    },
    Track {
        value: |s| Some(s.q1),
        shade: Theme::band_inner,
    },
    Track {
        value: |s| Some(s.q3),
        shade: Theme::band_inner,
    },
    Track {
        value: |s| Some(s.median),
        shade: Theme::stroke,
    },
];

/// Join consecutive bucket midpoints of every track. The first bucket only
/// seeds the previous point; a bucket missing a tracked value is skipped.
fn draw_tracks(
    ctx: &RenderContext,
    cohort: Cohort,
    stats: &CohortStatistics,
    tracks: &[Track],
    ops: &mut Vec<DrawOp>,
) {
    let g = &ctx.geometry;
    let shades: Vec<Color> = tracks.iter().map(|t| (t.shade)(&ctx.theme)).collect();
    let mut last: Option<(i32, Vec<i32>)> = None;

    for (&key, bucket) in stats {
        let row = g.to_screen_row(ctx.bucket_midpoint(bucket.start, key));
        let cols: Option<Vec<i32>> = tracks
            .iter()
            .map(|t| (t.value)(&bucket.stats).map(|v| g.cohort_column(cohort, v)))
            .collect();
        let Some(cols) = cols else {
            continue;
        };

        if let Some((last_row, last_cols)) = &last {
            for ((&from, &to), &shade) in last_cols.iter().zip(&cols).zip(&shades) {
                ops.push(DrawOp::line(from, *last_row, to, row, shade));
            }
        }
        last = Some((row, cols));
    }
}

impl Renderer for DispersionBand {
    fn kind(&self) -> ChartKind {
        ChartKind::DispersionBand
    }

    fn draw_cohort(
        &self,
        ctx: &RenderContext,
        cohort: Cohort,
        stats: &CohortStatistics,
        ops: &mut Vec<DrawOp>,
    ) {
        draw_tracks(ctx, cohort, stats, &DISPERSION_TRACKS, ops);
    }

    fn value_extent(&self, stats: &BucketStatistics) -> Result<Decimal> {
        stats
            .mean_plus_std_dev()
            .ok_or(ChartError::Overflow("standard deviation"))
    }
}

impl Renderer for FiveNumberBand {
    fn kind(&self) -> ChartKind {
        ChartKind::FiveNumberBand
    }

    fn draw_cohort(
        &self,
        ctx: &RenderContext,
        cohort: Cohort,
        stats: &CohortStatistics,
        ops: &mut Vec<DrawOp>,
    ) {
        draw_tracks(ctx, cohort, stats, &FIVE_NUMBER_TRACKS, ops);
    }

    fn value_extent(&self, stats: &BucketStatistics) -> Result<Decimal> {
        Ok(stats.max)
    }
}

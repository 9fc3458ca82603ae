use rust_decimal::Decimal;

use crate::error::Result;
use crate::processing::aggregation::CohortStatistics;
use crate::processing::statistics::BucketStatistics;
use crate::render::ops::DrawOp;
use crate::render::{ChartKind, RenderContext, Renderer};
use crate::state::data_series::Cohort;

/// Rows between the top of a bucket and the top of its box.
const BOX_INSET: i32 = 2;

/// Box-and-whisker plot, one box per age bucket.
///
/// Per bucket the whiskers are drawn first, then the box fill and outline
/// over them, then the median on top. The fill hides the whisker pixels that
/// run into the box.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxPlot;

impl Renderer for BoxPlot {
    fn kind(&self) -> ChartKind {
        ChartKind::BoxPlot
    }

    fn draw_cohort(
        &self,
        ctx: &RenderContext,
        cohort: Cohort,
        stats: &CohortStatistics,
        ops: &mut Vec<DrawOp>,
    ) {
        let g = &ctx.geometry;
        let stroke = ctx.theme.stroke();
        let fill = ctx.theme.box_fill();

        for (&key, bucket) in stats {
            let s = &bucket.stats;
            let box_height = ctx.box_height(bucket.start, key);
            let tick = box_height / 2;
            let top = g
                .to_screen_row(Decimal::from(bucket.start))
                .saturating_add(BOX_INSET);
            let middle = top.saturating_add(box_height / 2);
            let bottom = top.saturating_add(box_height);
            let (tick_low, tick_high) = (middle.saturating_add(tick / 2), middle.saturating_sub(tick / 2));

            let col = |v: Decimal| g.cohort_column(cohort, v);
            let min_col = col(s.min);
            let q1_col = col(s.q1);
            let median_col = col(s.median);
            let q3_col = col(s.q3);
            let max_col = col(s.max);

            ops.push(DrawOp::line(min_col, middle, q1_col, middle, stroke));
            ops.push(DrawOp::line(min_col, tick_low, min_col, tick_high, stroke));

            ops.push(DrawOp::line(max_col, middle, q3_col, middle, stroke));
            ops.push(DrawOp::line(max_col, tick_low, max_col, tick_high, stroke));

            // mirrored cohort: q3 is left of q1
            let box_left = q1_col.min(q3_col);
            let box_width = q3_col.saturating_sub(q1_col).saturating_abs();
            ops.push(DrawOp::fill_rect(box_left, top, box_width, box_height, fill));
            ops.push(DrawOp::stroke_rect(box_left, top, box_width, box_height, stroke));

            ops.push(DrawOp::line(median_col, top, median_col, bottom, stroke));
        }

        tracing::debug!(
            "box plot: {} buckets for {}",
            stats.len(),
            cohort.label()
        );
    }

    fn value_extent(&self, stats: &BucketStatistics) -> Result<Decimal> {
        Ok(stats.max)
    }
}

use proptest::prelude::*;
use rust_decimal::Decimal;

use pyramidplot::processing::aggregation::aggregate;
use pyramidplot::render::transform::ScreenGeometry;
use pyramidplot::{
    AxisRange, BucketStatistics, ChartConfig, ChartKind, DrawOp, PopulationChart, RoundingPolicy,
    ScenarioSeries,
};

fn rounding() -> impl Strategy<Value = RoundingPolicy> {
    prop_oneof![
        Just(RoundingPolicy::Up),
        Just(RoundingPolicy::Down),
        Just(RoundingPolicy::Ceiling),
        Just(RoundingPolicy::Floor),
        Just(RoundingPolicy::HalfUp),
        Just(RoundingPolicy::HalfDown),
        Just(RoundingPolicy::HalfEven),
    ]
}

fn sample() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((0i64..1_000_000).prop_map(|c| Decimal::new(c, 2)), 1..40)
}

fn flat_series(label: &str, ages: u32, count: Decimal) -> ScenarioSeries {
    let mut s = ScenarioSeries::new(label);
    for age in 0..ages {
        s.insert(age, count + Decimal::from(age));
    }
    s
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn statistics_are_deterministic(values in sample(), precision in 0u32..12, rounding in rounding()) {
        let a = BucketStatistics::compute(&values, precision, rounding).unwrap();
        let b = BucketStatistics::compute(&values, precision, rounding).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn quartiles_are_ordered(values in sample(), rounding in rounding()) {
        let s = BucketStatistics::compute(&values, 6, rounding).unwrap();
        prop_assert!(s.min <= s.q1);
        prop_assert!(s.q1 <= s.median);
        prop_assert!(s.median <= s.q3);
        prop_assert!(s.q3 <= s.max);
        prop_assert!(values.contains(&s.median));
        prop_assert!(s.std_dev().is_some_and(|sd| sd >= Decimal::ZERO));
    }

    #[test]
    fn mirrored_columns_stay_within_one_pixel(
        extent in 1i64..1_000_000,
        width in 1u32..2000,
        value in -1_000_000i64..1_000_000,
        rounding in rounding(),
    ) {
        let g = ScreenGeometry::new(
            width,
            100,
            AxisRange::symmetric(Decimal::from(extent)),
            AxisRange::new(Decimal::ZERO, Decimal::ONE_HUNDRED),
            10,
            rounding,
        )
        .unwrap();
        let v = Decimal::from(value);
        let right = g.to_screen_column(v) - g.origin_column();
        let left = g.origin_column() - g.to_screen_column(-v);
        prop_assert!((right - left).abs() <= 1, "{} vs {}", right, left);
    }

    #[test]
    fn every_age_lands_in_exactly_one_bucket(
        ages in 1u32..120,
        interval in 1u32..12,
        threshold in 0u32..100,
    ) {
        let series = [flat_series("a", ages, Decimal::ONE), flat_series("b", ages, Decimal::TWO)];
        let buckets = aggregate(&series, interval, threshold).unwrap();

        let below = ages.min(threshold);
        let expected = below.div_ceil(interval) + u32::from(ages > threshold);
        prop_assert_eq!(buckets.len() as u32, expected);

        let mut seen: Vec<u32> = buckets.buckets.values().flat_map(|b| b.ages.clone()).collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..ages).collect::<Vec<_>>());

        for (&key, bucket) in &buckets.buckets {
            if key == threshold + interval && bucket.ages.first().is_some_and(|&a| a >= threshold) {
                continue;
            }
            prop_assert_eq!(bucket.ages.last().map(|a| a + 1), Some(key));
        }
    }

    #[test]
    fn median_is_drawn_after_each_box(
        base in 1i64..100_000,
        scenarios in 1usize..6,
        interval in 1u32..10,
    ) {
        let cohort: Vec<ScenarioSeries> = (0..scenarios)
            .map(|i| flat_series(&i.to_string(), 100, Decimal::from(base + i as i64)))
            .collect();
        let config = ChartConfig {
            chart: ChartKind::BoxPlot,
            age_interval: interval,
            draw_origin_line: false,
            ..Default::default()
        };
        let chart = PopulationChart::build(config, &cohort, &cohort).unwrap();
        let ops = chart.draw_ops();
        prop_assert_eq!(ops.len() % 7, 0);
        for bucket in ops.chunks(7) {
            prop_assert!(matches!(bucket[4], DrawOp::FilledRect { .. }), "fill");
            prop_assert!(matches!(bucket[5], DrawOp::StrokedRect { .. }), "outline");
            prop_assert!(matches!(bucket[6], DrawOp::Line { x1, x2, .. } if x1 == x2), "median");
        }
    }
}

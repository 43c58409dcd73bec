use chart_plane::api::{BarStyle, Chart, PlotType};
use chart_plane::core::{ChartData, Key, LinearScale, Point, Viewport, aggregate};
use chart_plane::layout::HeuristicTextMeasurer;
use chart_plane::render::{Color, NullRenderer};
use proptest::prelude::*;

proptest! {
    #[test]
    fn linear_scale_round_trips_and_stays_monotonic(
        min in -10_000.0f64..0.0,
        span in 1.0f64..20_000.0,
        top in 0.0f64..500.0,
        height in 10.0f64..2_000.0,
        a in 0.0f64..1.0,
        b in 0.0f64..1.0
    ) {
        let scale = LinearScale::new(min, min + span, top, height).expect("valid scale");
        let low = min + span * a.min(b);
        let high = min + span * a.max(b);

        let low_px = scale.value_to_pixel(low);
        let high_px = scale.value_to_pixel(high);
        prop_assert!(high_px <= low_px + 1e-9);
        prop_assert!(low_px <= top + height + 1e-9);
        prop_assert!(high_px >= top - 1e-9);

        let restored = scale.pixel_to_value(low_px);
        prop_assert!((restored - low).abs() <= 1e-6 * span.max(1.0));
    }

    #[test]
    fn aggregation_covers_every_point(
        coords in prop::collection::vec((0.0f64..300.0, 0.0f64..300.0), 1..40),
        diameter in 1.0f64..20.0
    ) {
        let points: Vec<Point> = coords.iter().map(|(x, y)| Point::new(*x, *y)).collect();
        let clusters = aggregate(&points, diameter);

        prop_assert!(!clusters.is_empty());
        prop_assert!(clusters.len() <= points.len());
        let covered: usize = clusters.iter().map(|cluster| cluster.count).sum();
        prop_assert!(covered >= points.len());
    }

    #[test]
    fn fitted_bars_stay_inside_the_plot(
        values in prop::collection::vec(3.0f64..10_000.0, 1..30),
        width in 200u32..1_200,
        height in 150u32..800
    ) {
        let data = ChartData::from_values("p", &values, vec![Key::new("k", Color::BLUE)], "u");
        let mut chart = Chart::new(
            NullRenderer::default(),
            Box::new(HeuristicTextMeasurer),
            Viewport::new(width, height),
            data,
            PlotType::bar(BarStyle::Plain),
        )
        .expect("chart init");
        chart.set_should_scroll(false);
        chart.render().expect("render");

        let snapshot = chart.snapshot().expect("snapshot");
        let region = snapshot.data_region.expect("region");
        prop_assert_eq!(snapshot.bar_cells.len(), values.len());
        for cell in &snapshot.bar_cells {
            prop_assert!(cell.min_x() >= region.min_x() - 1e-6);
            prop_assert!(cell.max_x() <= region.max_x() + 1e-6);
        }

        let margins = snapshot.margins.expect("margins");
        prop_assert!(margins.left >= 0.0);
        prop_assert!(margins.top >= 0.0);
        prop_assert!(region.width > 0.0);
    }
}

use chart_plane::api::{BarStyle, Chart, PlotType};
use chart_plane::core::{ChartData, Key, LinearScale, Point, Viewport, aggregate, curve};
use chart_plane::layout::HeuristicTextMeasurer;
use chart_plane::render::{Color, NullRenderer};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_linear_scale_round_trip(c: &mut Criterion) {
    let scale = LinearScale::new(0.0, 10_000.0, 24.0, 1_000.0).expect("valid scale");

    c.bench_function("linear_scale_round_trip", |b| {
        b.iter(|| {
            let px = scale.value_to_pixel(black_box(4_321.123));
            let _ = scale.pixel_to_value(px);
        })
    });
}

fn bench_smooth_curve_5k(c: &mut Criterion) {
    let points: Vec<Point> = (0..5_000)
        .map(|i| {
            let x = f64::from(i) * 0.3;
            Point::new(x, 300.0 + (x * 0.05).sin() * 120.0)
        })
        .collect();

    c.bench_function("smooth_curve_5k", |b| {
        b.iter(|| {
            let _ = curve::smooth_curve(black_box(&points), black_box(0.2));
        })
    });
}

fn bench_scatter_aggregation_2k(c: &mut Criterion) {
    let points: Vec<Point> = (0..2_000)
        .map(|i| {
            let t = f64::from(i);
            Point::new((t * 7.3) % 800.0, (t * 3.1) % 600.0)
        })
        .collect();

    c.bench_function("scatter_aggregation_2k", |b| {
        b.iter(|| {
            let _ = aggregate(black_box(&points), black_box(6.0));
        })
    });
}

fn bench_bar_chart_frame_2k(c: &mut Criterion) {
    let values: Vec<f64> = (0..2_000)
        .map(|i| 100.0 + f64::from(i % 97) * 3.5)
        .collect();
    let data = ChartData::from_values(
        "bench",
        &values,
        vec![Key::new("load", Color::SEA_BLUE)],
        "kWh",
    );
    let mut chart = Chart::new(
        NullRenderer::default(),
        Box::new(HeuristicTextMeasurer),
        Viewport::new(1600, 900),
        data,
        PlotType::bar(BarStyle::Plain),
    )
    .expect("chart init");
    chart.set_should_scroll(false);
    chart.set_show_average_line(true);

    c.bench_function("bar_chart_frame_2k", |b| {
        b.iter(|| {
            let _ = chart.build_render_frame().expect("frame");
        })
    });
}

criterion_group!(
    benches,
    bench_linear_scale_round_trip,
    bench_smooth_curve_5k,
    bench_scatter_aggregation_2k,
    bench_bar_chart_frame_2k
);
criterion_main!(benches);

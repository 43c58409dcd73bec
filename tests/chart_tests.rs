use std::time::Duration;

use chart_plane::api::{BarStyle, Chart, ChartConfig, LineConfig, PlotType};
use chart_plane::core::{ChartData, Key, PlotableData, Viewport};
use chart_plane::error::ChartError;
use chart_plane::interaction::ChartAction;
use chart_plane::layout::HeuristicTextMeasurer;
use chart_plane::render::{Color, NullRenderer};

fn keys() -> Vec<Key> {
    vec![
        Key::new("solar", Color::ORANGE),
        Key::new("wind", Color::SEA_BLUE),
    ]
}

fn bar_chart(values: &[f64]) -> Chart<NullRenderer> {
    let data = ChartData::from_values("energy", values, keys(), "kWh");
    Chart::new(
        NullRenderer::default(),
        Box::new(HeuristicTextMeasurer),
        Viewport::new(400, 300),
        data,
        PlotType::bar(BarStyle::Plain),
    )
    .expect("chart init")
}

#[test]
fn construction_rejects_non_homogeneous_entries() {
    let data = ChartData::new(
        "mixed",
        vec![
            PlotableData::multi("a", vec![1.0, 2.0]),
            PlotableData::multi("b", vec![1.0]),
        ],
        keys(),
        "u",
    );
    let err = Chart::new(
        NullRenderer::default(),
        Box::new(HeuristicTextMeasurer),
        Viewport::new(400, 300),
        data,
        PlotType::default(),
    )
    .expect_err("must reject");
    assert!(matches!(
        err,
        ChartError::NonHomogeneousValues {
            index: 1,
            expected: 2,
            found: 1
        }
    ));
}

#[test]
fn construction_rejects_an_empty_viewport() {
    let data = ChartData::from_values("t", &[1.0], keys(), "u");
    let err = Chart::new(
        NullRenderer::default(),
        Box::new(HeuristicTextMeasurer),
        Viewport::new(0, 300),
        data,
        PlotType::default(),
    )
    .expect_err("must reject");
    assert!(matches!(err, ChartError::InvalidViewport { width: 0, .. }));
}

#[test]
fn render_hands_a_valid_frame_to_the_renderer() {
    let mut chart = bar_chart(&[30.0, 55.0, 70.0]);
    chart.set_should_scroll(false);
    chart.set_show_average_line(true);
    chart.render().expect("render");

    let renderer = chart.renderer();
    assert_eq!(renderer.frames_rendered, 1);
    // three bars, three axis segments and the average line
    assert_eq!(renderer.last_rect_count, 7);
    assert!(renderer.last_text_count >= 4);
    assert!(renderer.last_stroke_count >= 3);
}

#[test]
fn granularity_y_follows_the_data_until_set_explicitly() {
    let mut chart = bar_chart(&[30.0, 55.0, 70.0]);
    assert_eq!(chart.config().granularity_y, 23.0);

    chart
        .update_chart(vec![
            PlotableData::single("a", 90.0),
            PlotableData::single("b", 30.0),
        ])
        .expect("update");
    assert_eq!(chart.config().granularity_y, 30.0);

    chart
        .set_config(ChartConfig::default().with_granularity_y(10.0))
        .expect("config");
    chart
        .update_chart(vec![PlotableData::single("a", 300.0)])
        .expect("update");
    assert_eq!(chart.config().granularity_y, 10.0);
}

#[test]
fn update_with_mismatched_entries_keeps_the_previous_data() {
    let mut chart = bar_chart(&[30.0, 55.0]);
    let err = chart
        .update_chart(vec![
            PlotableData::single("a", 1.0),
            PlotableData::multi("b", vec![1.0, 2.0]),
        ])
        .expect_err("must reject");
    assert!(matches!(err, ChartError::NonHomogeneousValues { index: 1, .. }));
    assert_eq!(chart.data().entries.len(), 2);
}

#[test]
fn initial_animation_is_disabled_once_after_one_second() {
    let mut chart = bar_chart(&[1.0, 2.0]);
    assert!(chart.is_initial_animation_enabled());

    assert!(chart.advance_time(Duration::from_millis(500)).is_empty());
    assert!(chart.is_initial_animation_enabled());

    let fired = chart.advance_time(Duration::from_millis(600));
    assert_eq!(fired, vec![ChartAction::DisableInitialAnimation]);
    assert!(!chart.is_initial_animation_enabled());

    assert!(chart.advance_time(Duration::from_secs(5)).is_empty());
}

#[test]
fn average_line_is_skipped_for_multi_value_lines() {
    let data = ChartData::from_value_rows(
        "grid",
        vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 1.0]],
        keys(),
        "MW",
    );
    let mut chart = Chart::new(
        NullRenderer::default(),
        Box::new(HeuristicTextMeasurer),
        Viewport::new(400, 300),
        data,
        PlotType::Line(LineConfig::default()),
    )
    .expect("chart init");
    chart.set_show_average_line(true);

    let snapshot = chart.snapshot().expect("snapshot");
    assert_eq!(snapshot.average, None);

    let frame = chart.build_render_frame().expect("frame");
    assert!(frame.fills.is_empty());
    assert_eq!(frame.strokes.len(), 3 + 2);
}

#[test]
fn single_value_lines_keep_the_average_line() {
    let data = ChartData::from_values("t", &[2.0, 4.0, 6.0], keys(), "u");
    let mut chart = Chart::new(
        NullRenderer::default(),
        Box::new(HeuristicTextMeasurer),
        Viewport::new(400, 300),
        data,
        PlotType::line(),
    )
    .expect("chart init");
    chart.set_show_average_line(true);

    let snapshot = chart.snapshot().expect("snapshot");
    assert_eq!(snapshot.average, Some(4.0));
    chart.render().expect("render");
    assert_eq!(chart.renderer().last_fill_count, 1);
}

#[test]
fn scatter_chart_renders_clustered_dots() {
    let data = ChartData::new(
        "points",
        vec![
            PlotableData::scatter(1.0, 2.0),
            PlotableData::scatter(5.0, 8.0),
            PlotableData::scatter(9.0, 3.0),
        ],
        keys(),
        "y",
    );
    let mut chart = Chart::new(
        NullRenderer::default(),
        Box::new(HeuristicTextMeasurer),
        Viewport::new(400, 300),
        data,
        PlotType::scatter(),
    )
    .expect("chart init");
    chart.render().expect("render");
    assert_eq!(chart.renderer().last_ellipse_count, 3);
}

#[test]
fn scatter_chart_without_x_values_is_rejected_at_draw_time() {
    let data = ChartData::from_values("t", &[1.0, 2.0], keys(), "u");
    let mut chart = Chart::new(
        NullRenderer::default(),
        Box::new(HeuristicTextMeasurer),
        Viewport::new(400, 300),
        data,
        PlotType::scatter(),
    )
    .expect("chart init");
    let err = chart.render().expect_err("must reject");
    assert!(matches!(err, ChartError::InvalidPlotData(_)));
}

#[test]
fn scrolling_is_clamped_to_the_bar_content() {
    let values: Vec<f64> = (1..=40).map(f64::from).collect();
    let mut chart = bar_chart(&values);

    let offset = chart.scroll_by(-50.0).expect("scroll");
    assert_eq!(offset, 0.0);

    let offset = chart.scroll_by(100_000.0).expect("scroll");
    let snapshot = chart.snapshot().expect("snapshot");
    let region = snapshot.data_region.expect("region");
    assert_eq!(offset, 40.0 * 19.0 - region.width);

    chart.set_should_scroll(false);
    assert_eq!(chart.scroll_offset(), 0.0);
    assert_eq!(chart.scroll_by(10.0).expect("scroll"), 0.0);
}

#[test]
fn snapshot_contract_round_trips() {
    let mut chart = bar_chart(&[30.0, 55.0, 70.0]);
    let json = chart
        .snapshot_json_contract_v1_pretty()
        .expect("snapshot json");
    assert!(json.contains("\"schema_version\": 1"));

    let restored = chart_plane::api::ChartSnapshot::from_json_compat_str(&json).expect("parse");
    let snapshot = chart.snapshot().expect("snapshot");
    assert_eq!(restored, snapshot);
    assert_eq!(restored.entry_count, 3);
    assert_eq!(restored.bar_cells.len(), 3);
}

#[test]
fn snapshot_parser_rejects_unknown_schema_versions() {
    let mut chart = bar_chart(&[1.0]);
    let json = chart
        .snapshot_json_contract_v1_pretty()
        .expect("snapshot json")
        .replace("\"schema_version\": 1", "\"schema_version\": 9");
    let err = chart_plane::api::ChartSnapshot::from_json_compat_str(&json).expect_err("reject");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn named_values_keep_their_insertion_order() {
    let mut values = indexmap::IndexMap::new();
    values.insert("mon".to_owned(), 12.0);
    values.insert("tue".to_owned(), 30.0);
    values.insert("wed".to_owned(), 18.0);
    let data = ChartData::from_named_values("week", &values, keys(), "kWh");
    let names: Vec<&str> = data.entries.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, ["mon", "tue", "wed"]);

    let mut chart = Chart::new(
        NullRenderer::default(),
        Box::new(HeuristicTextMeasurer),
        Viewport::new(400, 300),
        data,
        PlotType::bar(BarStyle::Plain),
    )
    .expect("chart init");
    chart
        .set_config(ChartConfig::default().with_granularity_x(1))
        .expect("config");
    chart.set_should_scroll(false);
    let frame = chart.build_render_frame().expect("frame");
    let drawn: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    for name in ["mon", "tue", "wed"] {
        assert!(drawn.contains(&name));
    }
}

#[test]
fn snapshot_describes_the_frame_it_builds() {
    let mut chart = bar_chart(&[30.0, 55.0, 70.0]);
    chart.set_show_average_line(true);
    let snapshot = chart.snapshot().expect("snapshot");
    assert_eq!(chart.renderer().frames_rendered, 0);

    let frame = chart.build_render_frame().expect("frame");
    let drawn: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert!(!snapshot.labels.is_empty());
    for label in snapshot.labels.iter().filter(|label| !label.text.is_empty()) {
        assert!(drawn.contains(&label.text.as_str()), "{} not drawn", label.text);
    }
    assert_eq!(chart.snapshot().expect("snapshot again"), snapshot);
}

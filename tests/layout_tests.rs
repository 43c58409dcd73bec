use approx::assert_relative_eq;
use chart_plane::api::{CartesianPlane, ChartConfig, PlaneOptions, YPosition};
use chart_plane::core::{ChartData, ChartKind, PathCommand, PlotableData, Point, Rect, Viewport};
use chart_plane::layout::{
    HeuristicTextMeasurer, LabelRole, LayoutInput, LayoutOutcome, MarginResolver, NO_DATA_TEXT,
    ResolvedLayout,
};
use chart_plane::render::RenderFrame;

const BOUNDS: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);

fn quarter_data() -> ChartData {
    ChartData::new(
        "energy",
        vec![
            PlotableData::single("jan", 30.0),
            PlotableData::single("feb", 55.0),
            PlotableData::single("mar", 70.0),
        ],
        Vec::new(),
        "kWh",
    )
}

fn derived_config(data: &ChartData) -> ChartConfig {
    ChartConfig::default().with_granularity_y(data.default_y_granularity(ChartKind::Bar))
}

fn resolve(data: &ChartData, config: &ChartConfig, options: &PlaneOptions) -> ResolvedLayout {
    let outcome = MarginResolver::new(&HeuristicTextMeasurer)
        .resolve(LayoutInput {
            bounds: BOUNDS,
            data,
            kind: ChartKind::Bar,
            config,
            options,
        })
        .expect("layout should resolve");
    match outcome {
        LayoutOutcome::Resolved(layout) => layout,
        LayoutOutcome::NoData(label) => panic!("unexpected placeholder: {}", label.text),
    }
}

fn texts(layout: &ResolvedLayout, role: LabelRole) -> Vec<String> {
    layout
        .labels
        .find(role)
        .map(|label| label.text.clone())
        .collect()
}

#[test]
fn bar_chart_y_labels_follow_the_derived_granularity() {
    let data = quarter_data();
    let config = derived_config(&data);
    assert_eq!(config.granularity_y, 23.0);

    let layout = resolve(&data, &config, &PlaneOptions::default());

    assert_eq!(texts(&layout, LabelRole::YLabel), ["23", "46", "69"]);
    assert_eq!(texts(&layout, LabelRole::TopYLabel), ["70"]);

    let font = config.axes_labels.font;
    let widest = ["23", "46", "69", "70"]
        .iter()
        .map(|text| HeuristicTextMeasurer::text_width(text, font))
        .fold(0.0, f64::max);
    assert_relative_eq!(layout.margins.left, widest + config.tick.length + 4.0);
    assert_eq!(layout.margins.right, 0.0);
}

#[test]
fn top_margin_makes_room_for_the_y_unit() {
    let data = quarter_data();
    let config = derived_config(&data);
    let layout = resolve(&data, &config, &PlaneOptions::default());

    let unit_height = 12.0 * 1.2;
    assert_relative_eq!(layout.margins.top, 5.0 + unit_height + 5.0);
    assert_eq!(texts(&layout, LabelRole::YUnitOfMeasure), ["kWh"]);

    let without_units = PlaneOptions {
        show_units_of_measure: false,
        ..PlaneOptions::default()
    };
    let layout = resolve(&data, &config, &without_units);
    assert_eq!(layout.margins.top, 5.0);
    assert!(texts(&layout, LabelRole::YUnitOfMeasure).is_empty());
}

#[test]
fn average_badge_reserves_width_beside_the_plot() {
    let data = quarter_data();
    let config = derived_config(&data);
    let options = PlaneOptions {
        show_average_line: true,
        ..PlaneOptions::default()
    };
    let layout = resolve(&data, &config, &options);

    let badge = layout.average_badge.clone().expect("badge");
    assert_relative_eq!(badge.average, 155.0 / 3.0);
    assert_eq!(badge.value_text, "51.67");
    assert_eq!(badge.unit_text, "avg. kWh");

    let primary = HeuristicTextMeasurer::text_width("51.67", config.average_view.primary_font);
    let secondary =
        HeuristicTextMeasurer::text_width("avg. kWh", config.average_view.secondary_font);
    assert_relative_eq!(layout.average_reserve, primary.max(secondary) + 15.0);

    let region = layout.data_region();
    let line_width = config.axes_lines.width;
    assert_relative_eq!(region.x, layout.chart_left() + line_width);
    assert_relative_eq!(
        region.width,
        layout.chart_width() - line_width - layout.average_reserve
    );
}

#[test]
fn overlapping_average_badge_reserves_nothing() {
    let data = quarter_data();
    let config = derived_config(&data).with_average_overlap(true);
    let options = PlaneOptions {
        show_average_line: true,
        ..PlaneOptions::default()
    };
    let layout = resolve(&data, &config, &options);

    assert!(layout.average_badge.is_some());
    assert_eq!(layout.average_reserve, 0.0);
}

#[test]
fn right_axis_moves_the_label_margin() {
    let data = quarter_data();
    let config = derived_config(&data);
    let options = PlaneOptions {
        y_axis_position: YPosition::Right,
        ..PlaneOptions::default()
    };
    let layout = resolve(&data, &config, &options);

    assert_eq!(layout.margins.left, 0.0);
    assert!(layout.margins.right > config.tick.length);
    assert_relative_eq!(layout.chart_right(), BOUNDS.max_x() - layout.margins.right);
}

#[test]
fn hidden_y_axis_collapses_the_label_margin() {
    let data = quarter_data();
    let config = derived_config(&data);
    let options = PlaneOptions {
        show_y_axis: false,
        ..PlaneOptions::default()
    };
    let layout = resolve(&data, &config, &options);
    assert_eq!(layout.margins.left, 0.0);

    let plane = CartesianPlane::new(&data, ChartKind::Bar, &config, &options)
        .draw(BOUNDS, &HeuristicTextMeasurer)
        .expect("plane");
    let mut frame = RenderFrame::new(Viewport::new(400, 300));
    plane.append_to(&mut frame, &config, &options);
    let drawn: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert_eq!(drawn, ["kWh"]);
}

#[test]
fn all_zero_values_draw_only_the_placeholder() {
    let data = ChartData::from_values("empty", &[0.0, 0.0, 0.0], Vec::new(), "u");
    let config = ChartConfig::default();
    let options = PlaneOptions::default();

    let plane = CartesianPlane::new(&data, ChartKind::Bar, &config, &options)
        .draw(BOUNDS, &HeuristicTextMeasurer)
        .expect("plane");
    assert!(plane.is_no_data());
    assert!(plane.data_region().is_none());
    assert!(plane.axes.is_empty());

    let mut frame = RenderFrame::new(Viewport::new(400, 300));
    plane.append_to(&mut frame, &config, &options);
    assert_eq!(frame.texts.len(), 1);
    assert_eq!(frame.texts[0].text, NO_DATA_TEXT);
    assert!(frame.strokes.is_empty());

    let width = HeuristicTextMeasurer::text_width(NO_DATA_TEXT, config.axes_labels.font);
    assert_relative_eq!(frame.texts[0].x, BOUNDS.mid_x() - width / 2.0);
}

#[test]
fn plane_places_y_labels_beside_the_axis_with_ticks_and_gridlines() {
    let data = quarter_data();
    let config = derived_config(&data);
    let options = PlaneOptions::default();
    let plane = CartesianPlane::new(&data, ChartKind::Bar, &config, &options)
        .draw(BOUNDS, &HeuristicTextMeasurer)
        .expect("plane");
    let layout = plane.layout.as_ref().expect("resolved");

    for label in plane.labels.iter().filter(|label| label.role.is_y_axis()) {
        assert_relative_eq!(
            label.point.x + label.size.width,
            layout.chart_left() - config.tick.length - 4.0
        );
    }
    let top_label = plane
        .labels
        .find(LabelRole::TopYLabel)
        .next()
        .expect("top label");
    assert_relative_eq!(top_label.mid_y(), layout.chart_top());

    let y_labels = plane
        .labels
        .iter()
        .filter(|label| label.role.is_y_axis())
        .count();
    assert_eq!(y_labels, 4);
    assert_eq!(plane.ticks.subpath_count(), y_labels);
    assert_eq!(plane.dashed.subpath_count(), y_labels);

    assert_eq!(
        plane.axes.commands(),
        [
            PathCommand::MoveTo(Point::new(
                layout.chart_left(),
                layout.chart_top()
            )),
            PathCommand::LineTo(Point::new(
                layout.chart_left(),
                layout.chart_bottom()
            )),
            PathCommand::LineTo(Point::new(
                layout.chart_right(),
                layout.chart_bottom()
            )),
        ]
    );
}

#[test]
fn hidden_axes_drop_their_boundary_legs() {
    let data = quarter_data();
    let config = derived_config(&data);
    let options = PlaneOptions {
        show_x_axis: false,
        show_ticks: false,
        show_dashed_lines: false,
        ..PlaneOptions::default()
    };
    let plane = CartesianPlane::new(&data, ChartKind::Bar, &config, &options)
        .draw(BOUNDS, &HeuristicTextMeasurer)
        .expect("plane");

    assert_eq!(plane.axes.commands().len(), 2);
    assert!(plane.ticks.is_empty());
    assert!(plane.dashed.is_empty());
}

#[test]
fn line_plane_emits_x_labels_under_the_axis() {
    let values = [4.0, 8.0, 6.0, 2.0, 9.0, 1.0, 3.0];
    let data = ChartData::from_values("t", &values, Vec::new(), "u");
    let config = ChartConfig::default()
        .with_granularity_x(3)
        .with_granularity_y(3.0);
    let options = PlaneOptions::default();
    let plane = CartesianPlane::new(&data, ChartKind::Line, &config, &options)
        .draw(BOUNDS, &HeuristicTextMeasurer)
        .expect("plane");
    let layout = plane.layout.as_ref().expect("resolved");

    let x_labels: Vec<_> = plane.labels.find(LabelRole::XLabel).collect();
    let names: Vec<&str> = x_labels.iter().map(|label| label.text.as_str()).collect();
    assert_eq!(names, ["1", "4"]);
    for label in &x_labels {
        assert_relative_eq!(label.point.y, layout.chart_bottom() + config.tick.length);
    }
}

use tracing::{debug, trace};

use crate::api::config::{ChartConfig, PlaneOptions, YPosition};
use crate::core::{ChartData, ChartKind, Path, Point, Rect};
use crate::error::ChartResult;
use crate::layout::margins::TICK_LABEL_SPACING;
use crate::layout::{
    BarXAxis, LabelRole, Labels, LayoutInput, LayoutOutcome, LineXAxis, MarginResolver,
    ResolvedLayout, ScatterXAxis, TextMeasurer, XAxisContext, XAxisProvider,
};
use crate::render::{RectPrimitive, RenderFrame, StrokePrimitive, StrokeStyle, TextPrimitive};

/// Gap between the average line and its badge labels.
pub const AVERAGE_LABEL_SPACING: f64 = 2.0;
/// Inset of the badge labels from the chart edge.
pub const AVERAGE_LABEL_INSET: f64 = 5.0;

const Y_LABEL_ROLES: [LabelRole; 2] = [LabelRole::YLabel, LabelRole::TopYLabel];

/// Average line with its value and unit labels.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageMarker {
    pub line: Rect,
    pub value_text: String,
    pub value_point: Point,
    pub unit_text: String,
    pub unit_point: Point,
}

/// Axis chrome of one draw pass plus the region the data marks share.
#[derive(Debug, Clone)]
pub struct PlaneFrame {
    /// `None` when the pass only draws the no-data placeholder.
    pub layout: Option<ResolvedLayout>,
    pub labels: Labels,
    pub axes: Path,
    pub ticks: Path,
    pub dashed: Path,
    pub average: Option<AverageMarker>,
}

impl PlaneFrame {
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        self.layout.is_none()
    }

    #[must_use]
    pub fn data_region(&self) -> Option<Rect> {
        self.layout.as_ref().map(ResolvedLayout::data_region)
    }

    /// Emits the chrome as stroke batches (axes, ticks, dashes) and texts.
    pub fn append_to(&self, frame: &mut RenderFrame, config: &ChartConfig, options: &PlaneOptions) {
        let axes_labels = config.axes_labels;
        if self.is_no_data() {
            for label in &self.labels {
                frame.texts.push(TextPrimitive::new(
                    label.text.clone(),
                    label.point.x,
                    label.point.y,
                    axes_labels.font,
                    axes_labels.color,
                ));
            }
            return;
        }

        if let Some(average) = &self.average {
            let view = config.average_view;
            frame
                .rects
                .push(RectPrimitive::new(average.line, view.line_color.into()));
            if !average.value_text.is_empty() {
                frame.texts.push(TextPrimitive::new(
                    average.value_text.clone(),
                    average.value_point.x,
                    average.value_point.y,
                    view.primary_font,
                    view.primary_color,
                ));
            }
            frame.texts.push(TextPrimitive::new(
                average.unit_text.clone(),
                average.unit_point.x,
                average.unit_point.y,
                view.secondary_font,
                view.secondary_color,
            ));
        }

        if !self.axes.is_empty() {
            frame.strokes.push(StrokePrimitive::new(
                self.axes.clone(),
                StrokeStyle::solid(config.axes_lines.width, config.axes_lines.color),
            ));
        }
        if !self.ticks.is_empty() {
            frame.strokes.push(StrokePrimitive::new(
                self.ticks.clone(),
                StrokeStyle::solid(config.tick.width, config.tick.color),
            ));
        }
        if !self.dashed.is_empty() {
            let dashed = config.dashed_lines;
            frame.strokes.push(StrokePrimitive::new(
                self.dashed.clone(),
                StrokeStyle::dashed(dashed.width, dashed.color, dashed.dash_width),
            ));
        }

        for label in &self.labels {
            let visible = match label.role {
                LabelRole::YLabel | LabelRole::TopYLabel => options.show_y_axis,
                LabelRole::XLabel | LabelRole::XUnitOfMeasure => options.show_x_axis,
                LabelRole::YUnitOfMeasure => true,
            };
            if !visible || label.text.is_empty() {
                continue;
            }
            frame.texts.push(TextPrimitive::new(
                label.text.clone(),
                label.point.x,
                label.point.y,
                axes_labels.font,
                axes_labels.color,
            ));
        }
    }
}

/// Inputs the data-geometry builders share with the plane.
#[derive(Clone, Copy)]
pub struct PlotContext<'a> {
    pub data: &'a ChartData,
    pub config: &'a ChartConfig,
    pub options: &'a PlaneOptions,
    pub region: Rect,
    /// Value drawn on the x axis.
    pub min_value: f64,
    /// Value drawn at the top of the plot.
    pub max_value: f64,
    pub measurer: &'a dyn TextMeasurer,
}

impl std::fmt::Debug for PlotContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlotContext")
            .field("region", &self.region)
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .finish_non_exhaustive()
    }
}

impl<'a> PlotContext<'a> {
    /// Builds the context for a resolved pass, `None` on the placeholder pass.
    #[must_use]
    pub fn from_plane(
        plane: &PlaneFrame,
        data: &'a ChartData,
        config: &'a ChartConfig,
        options: &'a PlaneOptions,
        measurer: &'a dyn TextMeasurer,
    ) -> Option<Self> {
        let layout = plane.layout.as_ref()?;
        let (min_value, max_value) = layout.scale.domain();
        Some(Self {
            data,
            config,
            options,
            region: layout.data_region(),
            min_value,
            max_value,
            measurer,
        })
    }

    /// Position of `value` inside the value range, 0 for an empty range.
    #[must_use]
    pub fn ratio(&self, value: f64) -> f64 {
        let span = self.max_value - self.min_value;
        if span == 0.0 {
            0.0
        } else {
            (value - self.min_value) / span
        }
    }
}

/// Runs one layout and chrome pass over a chart rectangle.
#[derive(Debug, Clone, Copy)]
pub struct CartesianPlane<'a> {
    data: &'a ChartData,
    kind: ChartKind,
    config: &'a ChartConfig,
    options: &'a PlaneOptions,
}

impl<'a> CartesianPlane<'a> {
    #[must_use]
    pub fn new(
        data: &'a ChartData,
        kind: ChartKind,
        config: &'a ChartConfig,
        options: &'a PlaneOptions,
    ) -> Self {
        Self {
            data,
            kind,
            config,
            options,
        }
    }

    pub fn draw(&self, rect: Rect, measurer: &dyn TextMeasurer) -> ChartResult<PlaneFrame> {
        let outcome = MarginResolver::new(measurer).resolve(LayoutInput {
            bounds: rect,
            data: self.data,
            kind: self.kind,
            config: self.config,
            options: self.options,
        })?;
        let layout = match outcome {
            LayoutOutcome::NoData(label) => {
                let mut labels = Labels::new();
                labels.add(label);
                return Ok(PlaneFrame {
                    layout: None,
                    labels,
                    axes: Path::new(),
                    ticks: Path::new(),
                    dashed: Path::new(),
                    average: None,
                });
            }
            LayoutOutcome::Resolved(layout) => layout,
        };

        let options = self.options;
        let tick_length = self.config.tick.length;
        let chart_left = layout.chart_left();
        let chart_right = layout.chart_right();
        let chart_top = layout.chart_top();
        let chart_bottom = layout.chart_bottom();
        let mut labels = layout.labels.clone();

        labels.edit_labels(&Y_LABEL_ROLES, |label| {
            label.point.x = match options.y_axis_position {
                YPosition::Left => chart_left - tick_length - TICK_LABEL_SPACING - label.size.width,
                YPosition::Right => chart_right + tick_length + TICK_LABEL_SPACING,
            };
            label.point.y -= label.size.height / 2.0;
        });

        let average = layout.average_badge.as_ref().map(|badge| {
            let y = layout.y_position(badge.average);
            let x_for = |width: f64| match options.y_axis_position {
                YPosition::Left => chart_right - width - AVERAGE_LABEL_INSET,
                YPosition::Right => chart_left + AVERAGE_LABEL_INSET,
            };
            AverageMarker {
                line: Rect::new(
                    chart_left,
                    y,
                    layout.chart_width(),
                    self.config.average_view.line_width,
                ),
                value_text: badge.value_text.clone(),
                value_point: Point::new(
                    x_for(badge.value_size.width),
                    y - badge.value_size.height - AVERAGE_LABEL_SPACING,
                ),
                unit_text: badge.unit_text.clone(),
                unit_point: Point::new(x_for(badge.unit_size.width), y + AVERAGE_LABEL_SPACING),
            }
        });

        let axes = axes_path(&layout, options);

        let reserve = layout.average_reserve;
        let unit_offset = match options.y_axis_position {
            YPosition::Left => layout.bounds.min_x() + layout.margins.left,
            YPosition::Right => layout.bounds.min_x() + reserve,
        };
        let useful_width = layout.chart_width() - reserve;
        labels.edit_labels(&[LabelRole::XUnitOfMeasure], |label| {
            label.point.x = unit_offset + useful_width / 2.0 - label.size.width / 2.0;
        });

        let context = XAxisContext {
            data: self.data,
            config: self.config,
            chart_rect: layout.chart_rect(),
            y_axis_position: options.y_axis_position,
            average_reserve: reserve,
            show_average_line: layout.average_badge.is_some(),
            measurer,
        };
        let ticks_for_kind = match self.kind {
            ChartKind::Bar | ChartKind::SideBySideBar => BarXAxis.ticks(&context)?,
            ChartKind::Line => LineXAxis.ticks(&context)?,
            ChartKind::Scatter => ScatterXAxis.ticks(&context)?,
        };

        let mut ticks = Path::new();
        let mut dashed = Path::new();
        let draw_x_ticks = options.show_ticks && options.show_x_axis;
        for &x in &ticks_for_kind.positions {
            if draw_x_ticks {
                ticks.append(&Path::segment(
                    Point::new(x, chart_bottom),
                    Point::new(x, chart_bottom + tick_length),
                ));
            }
            if options.show_dashed_lines {
                dashed.append(&Path::segment(
                    Point::new(x, chart_top),
                    Point::new(x, chart_bottom),
                ));
            }
        }

        labels.add_all(ticks_for_kind.labels);
        labels.edit_labels(&[LabelRole::XLabel], |label| {
            label.point.y = chart_bottom + tick_length;
        });

        let draw_y_ticks = options.show_ticks && options.show_y_axis;
        for label in labels.iter().filter(|label| label.role.is_y_axis()) {
            let y = label.mid_y();
            trace!(y, text = %label.text, "y gridline");
            if draw_y_ticks {
                let (from, to) = match options.y_axis_position {
                    YPosition::Left => (chart_left - tick_length, chart_left),
                    YPosition::Right => (chart_right + tick_length, chart_right),
                };
                ticks.append(&Path::segment(Point::new(from, y), Point::new(to, y)));
            }
            if options.show_dashed_lines {
                dashed.append(&Path::segment(
                    Point::new(chart_left, y),
                    Point::new(chart_right, y),
                ));
            }
        }

        debug!(
            kind = ?self.kind,
            labels = labels.len(),
            x_ticks = ticks_for_kind.positions.len(),
            average = average.is_some(),
            "cartesian plane pass"
        );

        Ok(PlaneFrame {
            layout: Some(layout),
            labels,
            axes,
            ticks,
            dashed,
            average,
        })
    }
}

fn axes_path(layout: &ResolvedLayout, options: &PlaneOptions) -> Path {
    let left = layout.chart_left();
    let right = layout.chart_right();
    let top = layout.chart_top();
    let bottom = layout.chart_bottom();
    let (axis_x, far_x) = match options.y_axis_position {
        YPosition::Left => (left, right),
        YPosition::Right => (right, left),
    };
    let corner = Point::new(axis_x, bottom);
    let vertical_end = Point::new(axis_x, top);
    let horizontal_end = Point::new(far_x, bottom);

    match (options.show_y_axis, options.show_x_axis) {
        (true, true) => Path::polyline(&[vertical_end, corner, horizontal_end]),
        (true, false) => Path::segment(vertical_end, corner),
        (false, true) => Path::segment(corner, horizontal_end),
        (false, false) => Path::new(),
    }
}

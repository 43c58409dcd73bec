use tracing::debug;

use crate::api::cartesian_plane::PlotContext;
use crate::api::config::LineConfig;
use crate::core::curve::{DEFAULT_FILL_SMOOTHNESS, smooth_curve};
use crate::core::{Path, Point, Rect};
use crate::error::ChartResult;
use crate::render::{
    EllipsePrimitive, FillPrimitive, GradientPaint, RenderFrame, StrokePrimitive, StrokeStyle,
};

/// Below this diameter markers keep the full line width.
const MIN_CIRCLE_DIAMETER: f64 = 4.0;

/// Vertex positions of every drawn line, one list per value slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineGeometry {
    pub series: Vec<Vec<Point>>,
}

/// One path per value slot through the entries, left to right.
#[derive(Debug, Clone, Copy)]
pub struct LinePlot<'a> {
    config: &'a LineConfig,
}

impl<'a> LinePlot<'a> {
    #[must_use]
    pub fn new(config: &'a LineConfig) -> Self {
        Self { config }
    }

    /// Vertices of value slot `slot`, inset by half the line width.
    #[must_use]
    pub fn points(&self, context: &PlotContext<'_>, slot: usize) -> Vec<Point> {
        let region = context.region;
        let line_width = self.config.width;
        let entries = &context.data.entries;
        let width = (region.width - line_width).max(0.0);
        let height = (region.height - line_width).max(0.0);
        let spacing = if entries.len() > 1 {
            width / (entries.len() - 1) as f64
        } else {
            0.0
        };
        entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let value = *entry.values.get(slot)?;
                let ratio = context.ratio(value);
                Some(Point::new(
                    region.x + spacing * index as f64 + line_width / 2.0,
                    region.y + line_width / 2.0 + height * (1.0 - ratio),
                ))
            })
            .collect()
    }

    fn marker_diameter(&self) -> f64 {
        let reduced = self.config.width - 2.0;
        if reduced < MIN_CIRCLE_DIAMETER {
            self.config.width
        } else {
            reduced
        }
    }

    pub fn draw(
        &self,
        context: &PlotContext<'_>,
        frame: &mut RenderFrame,
    ) -> ChartResult<LineGeometry> {
        let data = context.data;
        data.validate_for_plot()?;
        let region = context.region;
        let slots = data.number_of_values();
        let mut geometry = LineGeometry::default();

        if slots == 1
            && data.entries.len() > 1
            && let Some(fill) = &self.config.background_fill
        {
            let points = self.points(context, 0);
            let path = fill_path(&points, region, self.config.is_smooth);
            frame.fills.push(FillPrimitive::new(
                path,
                GradientPaint::new(fill.clone(), region, true),
            ));
        }

        for (slot, key) in data.legend_keys.iter().take(slots).enumerate() {
            let points = self.points(context, slot);
            let path = self.config.curve_style().build(&points);
            let style = StrokeStyle::solid(self.config.width, key.color.main_color())
                .with_cap(self.config.cap);
            let mut stroke = StrokePrimitive::new(path, style);
            if key.color.is_gradient() {
                stroke = stroke.with_gradient(GradientPaint::new(
                    key.color.clone(),
                    region,
                    key.is_vertical,
                ));
            }
            frame.strokes.push(stroke);

            if self.config.show_circles {
                let diameter = self.marker_diameter();
                frame.ellipses.extend(points.iter().map(|point| {
                    EllipsePrimitive::filled(
                        Rect::centered_square(*point, diameter),
                        self.config.circle_color,
                    )
                }));
            }
            geometry.series.push(points);
        }

        debug!(
            lines = geometry.series.len(),
            entries = data.entries.len(),
            smooth = self.config.is_smooth,
            "line plot pass"
        );
        Ok(geometry)
    }
}

/// Area under the line, closed along the bottom of `region`.
fn fill_path(points: &[Point], region: Rect, smooth: bool) -> Path {
    let mut path = if smooth {
        smooth_curve(points, DEFAULT_FILL_SMOOTHNESS)
    } else {
        Path::polyline(points)
    };
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        path.line_to(Point::new(last.x, region.max_y()));
        path.line_to(Point::new(first.x, region.max_y()));
        path.close();
    }
    path
}

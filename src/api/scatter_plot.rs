use tracing::debug;

use crate::api::cartesian_plane::PlotContext;
use crate::core::data::SCATTER_HEADROOM;
use crate::core::{Cluster, Point, Rect, aggregate};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, EllipsePrimitive, RenderFrame};

/// Dots placed by their x and y values, merged where they overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPlot {
    dot_diameter: f64,
}

impl ScatterPlot {
    #[must_use]
    pub fn new(dot_diameter: f64) -> Self {
        Self { dot_diameter }
    }

    /// Pixel position of every entry, in entry order.
    pub fn points(&self, context: &PlotContext<'_>) -> ChartResult<Vec<Point>> {
        let region = context.region;
        let max_x = context.data.max_x_value().unwrap_or(0.0);
        let domain = max_x * SCATTER_HEADROOM;
        context
            .data
            .entries
            .iter()
            .map(|entry| {
                let (Some(x), Some(y)) = (entry.x, entry.y()) else {
                    return Err(ChartError::InvalidPlotData(format!(
                        "scatter entry `{}` has no x/y pair",
                        entry.name
                    )));
                };
                let x_ratio = if domain > 0.0 { x / domain } else { 0.0 };
                Ok(Point::new(
                    region.x + region.width * x_ratio,
                    region.max_y() - region.height * context.ratio(y),
                ))
            })
            .collect()
    }

    pub fn draw(
        &self,
        context: &PlotContext<'_>,
        frame: &mut RenderFrame,
    ) -> ChartResult<Vec<Cluster>> {
        let points = self.points(context)?;
        let clusters = aggregate(&points, self.dot_diameter);
        let fill = context
            .data
            .legend_keys
            .first()
            .map_or(Color::BLUE, |key| key.color.main_color());
        frame.ellipses.extend(clusters.iter().map(|cluster| {
            let diameter = self.dot_diameter * cluster.count as f64;
            EllipsePrimitive::filled(Rect::centered_square(cluster.center, diameter), fill)
        }));
        debug!(
            points = points.len(),
            clusters = clusters.len(),
            "scatter plot pass"
        );
        Ok(clusters)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::ScatterPlot;
    use crate::api::cartesian_plane::PlotContext;
    use crate::api::config::{ChartConfig, PlaneOptions};
    use crate::core::{ChartData, PlotableData, Rect, Viewport};
    use crate::error::ChartError;
    use crate::layout::HeuristicTextMeasurer;
    use crate::render::RenderFrame;

    fn context<'a>(
        data: &'a ChartData,
        config: &'a ChartConfig,
        options: &'a PlaneOptions,
    ) -> PlotContext<'a> {
        PlotContext {
            data,
            config,
            options,
            region: Rect::new(0.0, 0.0, 110.0, 110.0),
            min_value: 0.0,
            max_value: 11.0,
            measurer: &HeuristicTextMeasurer,
        }
    }

    #[test]
    fn points_map_against_the_padded_x_domain() {
        let entries = vec![
            PlotableData::scatter(5.0, 0.0),
            PlotableData::scatter(10.0, 11.0),
        ];
        let data = ChartData::new("s", entries, Vec::new(), "u");
        let config = ChartConfig::default();
        let options = PlaneOptions::default();
        let points = ScatterPlot::new(6.0)
            .points(&context(&data, &config, &options))
            .expect("points");
        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0].x, 50.0, epsilon = 1e-9);
        assert_relative_eq!(points[0].y, 110.0, epsilon = 1e-9);
        assert_relative_eq!(points[1].x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(points[1].y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn overlapping_dots_merge_and_grow() {
        let entries = vec![
            PlotableData::scatter(10.0, 5.0),
            PlotableData::scatter(10.0, 5.0),
            PlotableData::scatter(1.0, 1.0),
        ];
        let data = ChartData::new("s", entries, Vec::new(), "u");
        let config = ChartConfig::default();
        let options = PlaneOptions::default();
        let mut frame = RenderFrame::new(Viewport::new(200, 200));
        let clusters = ScatterPlot::new(6.0)
            .draw(&context(&data, &config, &options), &mut frame)
            .expect("scatter");
        assert_eq!(clusters.len(), 2);
        assert_eq!(frame.ellipses.len(), 2);
        assert!(frame.ellipses.iter().any(|dot| dot.rect.width == 12.0));
    }

    #[test]
    fn entries_without_x_are_rejected() {
        let data = ChartData::from_values("t", &[1.0], Vec::new(), "u");
        let config = ChartConfig::default();
        let options = PlaneOptions::default();
        let err = ScatterPlot::new(6.0)
            .points(&context(&data, &config, &options))
            .expect_err("no x");
        assert!(matches!(err, ChartError::InvalidPlotData(_)));
    }
}

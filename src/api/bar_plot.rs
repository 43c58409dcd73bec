use tracing::{debug, trace};

use crate::api::cartesian_plane::PlotContext;
use crate::api::config::BarConfig;
use crate::api::plot_type::{BarSlot, ChartBar};
use crate::core::data::ensure_homogeneous;
use crate::core::{Path, Point, Rect};
use crate::error::ChartResult;
use crate::render::{RectPrimitive, RenderFrame, StrokePrimitive, StrokeStyle, TextPrimitive};

/// Gap between the x axis and a bar's label.
pub const BAR_LABEL_SPACING: f64 = 5.0;

/// Hit area of one drawn bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarCell {
    pub index: usize,
    /// Full-height column the bar sits in; pointer hits resolve against it.
    pub cell: Rect,
    /// Pixel y of the top of the painted bar.
    pub bar_top: f64,
}

/// Cells of one bar pass and the scrollable content width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarGeometry {
    pub cells: Vec<BarCell>,
    pub content_width: f64,
}

impl BarGeometry {
    #[must_use]
    pub fn hit_rects(&self) -> Vec<Rect> {
        self.cells.iter().map(|cell| cell.cell).collect()
    }

    /// Dataset index and hit rectangle of every drawn bar.
    #[must_use]
    pub fn hit_targets(&self) -> Vec<(usize, Rect)> {
        self.cells.iter().map(|cell| (cell.index, cell.cell)).collect()
    }

    /// Cell of the bar at dataset `index`, if it was drawn.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&BarCell> {
        self.cells.iter().find(|cell| cell.index == index)
    }
}

/// Lays bars out in fixed-width (scrolling) or fitted cells.
#[derive(Debug, Clone, Copy)]
pub struct BarPlot<'a, B: ChartBar + ?Sized> {
    style: &'a B,
    config: &'a BarConfig,
    scroll_offset: f64,
}

impl<'a, B: ChartBar + ?Sized> BarPlot<'a, B> {
    #[must_use]
    pub fn new(style: &'a B, config: &'a BarConfig) -> Self {
        Self {
            style,
            config,
            scroll_offset: 0.0,
        }
    }

    #[must_use]
    pub fn with_scroll_offset(mut self, scroll_offset: f64) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }

    /// Width of one cell (bar plus spacing).
    #[must_use]
    pub fn cell_width(&self, region_width: f64, count: usize, should_scroll: bool) -> f64 {
        let fixed = self.config.width + self.config.spacing;
        if should_scroll || count == 0 {
            return fixed;
        }
        let fitted = region_width / count as f64;
        if self.config.limit_width {
            fitted.min(fixed)
        } else {
            fitted
        }
    }

    pub fn draw(
        &self,
        context: &PlotContext<'_>,
        frame: &mut RenderFrame,
    ) -> ChartResult<BarGeometry> {
        let data = context.data;
        ensure_homogeneous(&data.entries)?;
        let region = context.region;
        let options = context.options;
        let config = context.config;
        let count = data.entries.len();
        let cell_width = self.cell_width(region.width, count, options.should_scroll);
        let max_individual_value = data.max_individual_value().unwrap_or(0.0);
        let line_width = config.axes_lines.width;
        let label_y = region.max_y() + line_width + BAR_LABEL_SPACING;
        let granularity = config.granularity_x;

        let mut geometry = BarGeometry {
            cells: Vec::with_capacity(count),
            content_width: cell_width * count as f64,
        };
        let mut ticks = Path::new();

        for (index, entry) in data.entries.iter().enumerate() {
            let cell_x = region.x + index as f64 * cell_width - self.scroll_offset;
            let cell = Rect::new(cell_x, region.y, cell_width, region.height);
            if cell.max_x() < region.min_x() || cell.min_x() > region.max_x() {
                continue;
            }

            let ratio = context.ratio(self.style.bar_value(entry));
            let bar_height = (region.height * ratio).max(0.0);
            let bar_rect = Rect::new(
                cell_x + self.config.spacing / 2.0,
                region.max_y() - bar_height,
                (cell_width - self.config.spacing).max(0.0),
                bar_height,
            );
            trace!(index, ratio, bar_height, "bar cell");

            let rects = self.style.configure_bar(BarSlot {
                rect: bar_rect,
                entry,
                keys: &data.legend_keys,
                config: self.config,
                max_individual_value,
            })?;
            frame.rects.extend(rects);

            if options.show_x_axis {
                frame.rects.push(RectPrimitive::new(
                    Rect::new(cell_x, region.max_y(), cell_width, line_width),
                    config.axes_lines.color.into(),
                ));
                if options.show_ticks {
                    let trailing = cell.max_x();
                    ticks.append(&Path::segment(
                        Point::new(trailing, region.max_y() + line_width),
                        Point::new(trailing, region.max_y() + line_width + config.tick.length),
                    ));
                }
                let labelled = granularity != 0 && index % granularity == 0;
                if labelled && !entry.name.is_empty() {
                    let font = config.axes_labels.font;
                    let size = context.measurer.measure(&entry.name, font);
                    frame.texts.push(TextPrimitive::new(
                        entry.name.clone(),
                        cell.mid_x() - size.width / 2.0,
                        label_y,
                        font,
                        config.axes_labels.color,
                    ));
                }
            }

            geometry.cells.push(BarCell {
                index,
                cell,
                bar_top: bar_rect.min_y(),
            });
        }

        if !ticks.is_empty() {
            frame.strokes.push(StrokePrimitive::new(
                ticks,
                StrokeStyle::solid(config.tick.width, config.tick.color),
            ));
        }

        debug!(
            bars = geometry.cells.len(),
            cell_width,
            content_width = geometry.content_width,
            "bar plot pass"
        );
        Ok(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::BarPlot;
    use crate::api::cartesian_plane::PlotContext;
    use crate::api::config::{BarConfig, ChartConfig, PlaneOptions};
    use crate::api::plot_type::BarStyle;
    use crate::core::{ChartData, Key, Rect, Viewport};
    use crate::layout::HeuristicTextMeasurer;
    use crate::render::{Color, RenderFrame};

    fn context<'a>(
        data: &'a ChartData,
        config: &'a ChartConfig,
        options: &'a PlaneOptions,
    ) -> PlotContext<'a> {
        PlotContext {
            data,
            config,
            options,
            region: Rect::new(50.0, 10.0, 200.0, 100.0),
            min_value: 0.0,
            max_value: 40.0,
            measurer: &HeuristicTextMeasurer,
        }
    }

    #[test]
    fn fitted_cells_split_the_region_evenly() {
        let data = ChartData::from_values(
            "t",
            &[10.0, 20.0, 40.0, 0.0],
            vec![Key::new("k", Color::RED)],
            "u",
        );
        let config = ChartConfig::default().with_granularity_x(1);
        let options = PlaneOptions {
            should_scroll: false,
            ..PlaneOptions::default()
        };
        let bar_config = BarConfig::default();
        let mut frame = RenderFrame::new(Viewport::new(300, 200));
        let geometry = BarPlot::new(&BarStyle::Plain, &bar_config)
            .draw(&context(&data, &config, &options), &mut frame)
            .expect("bars");

        assert_eq!(geometry.cells.len(), 4);
        assert_eq!(geometry.cells[1].cell, Rect::new(100.0, 10.0, 50.0, 100.0));
        assert_eq!(geometry.cells[2].bar_top, 10.0);
        assert_eq!(geometry.cells[3].bar_top, 110.0);
        assert_eq!(frame.texts.len(), 4);
    }

    #[test]
    fn scrolled_cells_outside_the_region_are_skipped() {
        let values: Vec<f64> = (1..=30).map(f64::from).collect();
        let data = ChartData::from_values("t", &values, vec![Key::new("k", Color::RED)], "u");
        let config = ChartConfig::default();
        let options = PlaneOptions::default();
        let bar_config = BarConfig::default();
        let mut frame = RenderFrame::new(Viewport::new(300, 200));
        let geometry = BarPlot::new(&BarStyle::Plain, &bar_config)
            .with_scroll_offset(95.0)
            .draw(&context(&data, &config, &options), &mut frame)
            .expect("bars");

        assert_eq!(geometry.content_width, 30.0 * 19.0);
        assert_eq!(geometry.cells.first().map(|cell| cell.index), Some(4));
        assert!(geometry.cells.iter().all(|cell| cell.cell.max_x() >= 50.0));
    }

    #[test]
    fn limit_width_caps_fitted_cells() {
        let bar_config = BarConfig {
            limit_width: true,
            ..BarConfig::default()
        };
        let plot = BarPlot::new(&BarStyle::Plain, &bar_config);
        assert_eq!(plot.cell_width(200.0, 2, false), 19.0);
        assert_eq!(plot.cell_width(200.0, 20, false), 10.0);
    }
}

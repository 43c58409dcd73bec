use tracing::{debug, trace, warn};

use crate::api::config::{ChartConfig, DEFAULT_MARGINS, PlaneOptions, YPosition};
use crate::core::{ChartData, ChartKind, EdgeInsets, LinearScale, Point, Rect, Size};
use crate::error::ChartResult;
use crate::layout::labels::{Label, LabelRole, Labels};
use crate::layout::text::{Font, TextMeasurer};

/// Space between the y unit label and the plot top.
pub const Y_UNIT_LABEL_SPACING: f64 = 5.0;
/// Added to the bottom margin together with the x unit label height.
pub const X_UNIT_LABEL_SPACING: f64 = -5.0;
/// Gap between a y tick and its label.
pub const TICK_LABEL_SPACING: f64 = 4.0;
/// A top label is pinned at the maximum when the last y label sits this close to the plot top.
pub const TOP_LABEL_THRESHOLD: f64 = 15.0;
/// Extra room reserved beside the wider average badge label.
pub const AVERAGE_BADGE_PADDING: f64 = 15.0;
pub const NO_DATA_TEXT: &str = "No data available";

const MAX_Y_LABELS: usize = 1_000;

/// Everything one layout pass depends on.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    pub bounds: Rect,
    pub data: &'a ChartData,
    pub kind: ChartKind,
    pub config: &'a ChartConfig,
    pub options: &'a PlaneOptions,
}

/// Measured text of the average line badge.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageBadge {
    pub average: f64,
    pub value_text: String,
    pub value_size: Size,
    pub unit_text: String,
    pub unit_size: Size,
}

impl AverageBadge {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.value_size.width.max(self.unit_size.width)
    }
}

/// Margins, raw axis labels and value mapping for one pass.
///
/// Y labels keep their sweep position (`x` at the bounds edge, `y` on the
/// tick); the orchestrator moves them beside the axis.
#[derive(Debug, Clone)]
pub struct ResolvedLayout {
    pub bounds: Rect,
    pub margins: EdgeInsets,
    pub labels: Labels,
    pub scale: LinearScale,
    pub y_axis_position: YPosition,
    pub axes_line_width: f64,
    pub average_badge: Option<AverageBadge>,
    /// Width kept free for the average badge, 0 in overlap mode.
    pub average_reserve: f64,
}

impl ResolvedLayout {
    #[must_use]
    pub fn chart_left(&self) -> f64 {
        self.bounds.min_x() + self.margins.left
    }

    #[must_use]
    pub fn chart_right(&self) -> f64 {
        self.bounds.max_x() - self.margins.right
    }

    #[must_use]
    pub fn chart_top(&self) -> f64 {
        chart_top(self.bounds, self.margins, self.axes_line_width)
    }

    #[must_use]
    pub fn chart_bottom(&self) -> f64 {
        chart_bottom(self.bounds, self.margins, self.axes_line_width)
    }

    #[must_use]
    pub fn chart_width(&self) -> f64 {
        self.chart_right() - self.chart_left()
    }

    #[must_use]
    pub fn chart_height(&self) -> f64 {
        self.chart_bottom() - self.chart_top()
    }

    /// Rectangle framed by the axis lines.
    #[must_use]
    pub fn chart_rect(&self) -> Rect {
        Rect::new(
            self.chart_left(),
            self.chart_top(),
            self.chart_width(),
            self.chart_height(),
        )
    }

    /// Area shared with the data geometry: inside the axis lines and clear
    /// of the average badge reservation.
    #[must_use]
    pub fn data_region(&self) -> Rect {
        let lw = self.axes_line_width;
        let width = (self.chart_width() - lw - self.average_reserve).max(0.0);
        let x = match self.y_axis_position {
            YPosition::Left => self.chart_left() + lw,
            YPosition::Right => self.chart_left() + self.average_reserve,
        };
        let top = self.bounds.min_y() + self.margins.top;
        let bottom = self.bounds.max_y() - self.margins.bottom;
        Rect::new(x, top, width, (bottom - top).max(0.0))
    }

    /// Pixel y of `value` on the chart rectangle.
    #[must_use]
    pub fn y_position(&self, value: f64) -> f64 {
        self.scale.value_to_pixel(value)
    }
}

/// Result of one layout pass.
#[derive(Debug, Clone)]
pub enum LayoutOutcome {
    /// Nothing to plot; only the centred placeholder is drawn.
    NoData(Label),
    Resolved(ResolvedLayout),
}

fn chart_top(bounds: Rect, margins: EdgeInsets, axes_line_width: f64) -> f64 {
    bounds.min_y() + margins.top - axes_line_width / 2.0
}

fn chart_bottom(bounds: Rect, margins: EdgeInsets, axes_line_width: f64) -> f64 {
    bounds.max_y() - margins.bottom + axes_line_width / 2.0
}

/// Grows the default margins from label measurements, once per pass.
#[derive(Debug)]
pub struct MarginResolver<'m, M: TextMeasurer + ?Sized> {
    measurer: &'m M,
}

impl<'m, M: TextMeasurer + ?Sized> MarginResolver<'m, M> {
    #[must_use]
    pub fn new(measurer: &'m M) -> Self {
        Self { measurer }
    }

    fn measure(&self, text: &str, font: Font) -> Size {
        self.measurer.measure(text, font)
    }

    pub fn resolve(&self, input: LayoutInput<'_>) -> ChartResult<LayoutOutcome> {
        let LayoutInput {
            bounds,
            data,
            kind,
            config,
            options,
        } = input;
        let font = config.axes_labels.font;
        let axes_line_width = config.axes_lines.width;

        let data_max = data.max_y_value(kind).unwrap_or(0.0);
        let min = options.min_plot_y.unwrap_or(0.0);
        let max = options.max_plot_y.unwrap_or(data_max);
        if !(data_max.is_finite() && data_max > 0.0) {
            debug!(data_max, "no plottable data");
            return Ok(LayoutOutcome::NoData(self.no_data_label(bounds, font)));
        }
        if !(min.is_finite() && max.is_finite() && max > min) {
            warn!(min, max, "empty plot value range, drawing placeholder");
            return Ok(LayoutOutcome::NoData(self.no_data_label(bounds, font)));
        }

        let mut margins = DEFAULT_MARGINS;
        let mut labels = Labels::new();

        if options.show_units_of_measure {
            let size = self.measure(&data.y_unit, font);
            margins.top += size.height + Y_UNIT_LABEL_SPACING;
            let x = match options.y_axis_position {
                YPosition::Left => bounds.min_x(),
                YPosition::Right => bounds.max_x() - margins.right - size.width,
            };
            if !data.y_unit.is_empty() {
                labels.add(Label::new(
                    data.y_unit.clone(),
                    size,
                    Point::new(x, bounds.min_y()),
                    LabelRole::YUnitOfMeasure,
                ));
            }

            if let Some(x_unit) = data.x_unit.as_deref().filter(|unit| !unit.is_empty())
                && options.show_x_axis
            {
                let size = self.measure(x_unit, font);
                margins.bottom += size.height + X_UNIT_LABEL_SPACING;
                labels.add(Label::new(
                    x_unit,
                    size,
                    Point::new(bounds.min_x(), bounds.max_y() - size.height),
                    LabelRole::XUnitOfMeasure,
                ));
            }
        }

        let top = chart_top(bounds, margins, axes_line_width);
        let height = chart_bottom(bounds, margins, axes_line_width) - top;
        let scale = LinearScale::new(min, max, top, height)?;

        let mut max_label_width: f64 = 0.0;
        let step = config.granularity_y;
        if step > 0.0 {
            // Labels sit on multiples of the step strictly above the plot minimum.
            let first = ((min / step + 1e-9).floor() + 1.0).max(1.0);
            let last = (max / step + 1e-9).floor();
            let count = (last - first + 1.0).max(0.0);
            let count = if count > MAX_Y_LABELS as f64 {
                warn!(step, min, max, "y granularity too fine, truncating labels");
                MAX_Y_LABELS
            } else {
                count as usize
            };
            for index in 0..count {
                let value = step * (first + index as f64);
                let text = data.y_formatter.format(value);
                let size = self.measure(&text, font);
                max_label_width = max_label_width.max(size.width);
                let y = scale.value_to_pixel(value);
                trace!(value, y, text = %text, "y label");
                labels.add(Label::new(
                    text,
                    size,
                    Point::new(bounds.min_x(), y),
                    LabelRole::YLabel,
                ));
            }
        }

        let pin_top = labels
            .find(LabelRole::YLabel)
            .last()
            .is_some_and(|last| last.point.y - top <= TOP_LABEL_THRESHOLD);
        if pin_top {
            let text = data.y_formatter.format(max);
            let size = self.measure(&text, font);
            max_label_width = max_label_width.max(size.width);
            labels.add(Label::new(
                text,
                size,
                Point::new(bounds.min_x(), top),
                LabelRole::TopYLabel,
            ));
        }

        let horizontal = if options.show_y_axis {
            max_label_width + config.tick.length + TICK_LABEL_SPACING
        } else {
            0.0
        };
        match options.y_axis_position {
            YPosition::Left => {
                margins.left = horizontal;
                margins.right = 0.0;
            }
            YPosition::Right => {
                margins.left = 0.0;
                margins.right = horizontal;
            }
        }

        let average_badge = options
            .show_average_line
            .then(|| self.average_badge(data, config));
        let average_reserve = match &average_badge {
            Some(badge) if !config.average_view.overlaps_chart => {
                badge.width() + AVERAGE_BADGE_PADDING
            }
            _ => 0.0,
        };

        debug!(
            top = margins.top,
            left = margins.left,
            bottom = margins.bottom,
            right = margins.right,
            labels = labels.len(),
            average_reserve,
            "resolved chart margins"
        );

        Ok(LayoutOutcome::Resolved(ResolvedLayout {
            bounds,
            margins,
            labels,
            scale,
            y_axis_position: options.y_axis_position,
            axes_line_width,
            average_badge,
            average_reserve,
        }))
    }

    fn average_badge(&self, data: &ChartData, config: &ChartConfig) -> AverageBadge {
        let average = data.average();
        let value_text = data.y_formatter.format(average);
        let unit_text = format!("avg. {}", data.y_unit);
        AverageBadge {
            average,
            value_size: self.measure(&value_text, config.average_view.primary_font),
            unit_size: self.measure(&unit_text, config.average_view.secondary_font),
            value_text,
            unit_text,
        }
    }

    fn no_data_label(&self, bounds: Rect, font: Font) -> Label {
        let size = self.measure(NO_DATA_TEXT, font);
        Label::new(
            NO_DATA_TEXT,
            size,
            Point::new(
                bounds.min_x() + bounds.width / 2.0 - size.width / 2.0,
                bounds.min_y() + bounds.height / 2.0,
            ),
            LabelRole::XLabel,
        )
    }
}

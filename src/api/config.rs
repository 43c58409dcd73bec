use serde::{Deserialize, Serialize};

use crate::core::EdgeInsets;
use crate::core::curve::{DEFAULT_LINE_SMOOTHNESS, CurveStyle};
use crate::core::legend::KeyColor;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Corners, Font, FontWeight, LineCap};

/// Margins every layout pass starts from before growing them.
pub const DEFAULT_MARGINS: EdgeInsets = EdgeInsets::new(5.0, 45.0, 25.0, 0.0);

/// Horizontal side on which the y axis is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum YPosition {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickConfig {
    pub color: Color,
    pub width: f64,
    pub length: f64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            color: Color::DARK_GRAY,
            width: 1.0,
            length: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxesLabelConfig {
    pub color: Color,
    pub font: Font,
}

impl Default for AxesLabelConfig {
    fn default() -> Self {
        Self {
            color: Color::DARK_GRAY,
            font: Font::regular(12.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxesLineConfig {
    pub color: Color,
    pub width: f64,
}

impl Default for AxesLineConfig {
    fn default() -> Self {
        Self {
            color: Color::DARK_GRAY,
            width: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashedLineConfig {
    pub color: Color,
    pub width: f64,
    pub dash_width: f64,
}

impl Default for DashedLineConfig {
    fn default() -> Self {
        Self {
            color: Color::DARK_GRAY,
            width: 1.0,
            dash_width: 3.0,
        }
    }
}

/// Style of the average line and its value/unit badge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AverageViewConfig {
    pub line_width: f64,
    pub line_color: Color,
    pub primary_font: Font,
    pub primary_color: Color,
    pub secondary_font: Font,
    pub secondary_color: Color,
    /// Draw the badge over the plot instead of reserving a margin for it.
    pub overlaps_chart: bool,
}

impl Default for AverageViewConfig {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            line_color: Color::DARK_GRAY,
            primary_font: Font::new(14.0, FontWeight::Semibold),
            primary_color: Color::BLACK,
            secondary_font: Font::new(12.0, FontWeight::Medium),
            secondary_color: Color::DARK_GRAY,
            overlaps_chart: false,
        }
    }
}

/// Axis, tick, gridline and average styling shared by every chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Index stride between x labels; 0 keeps only the first label.
    pub granularity_x: usize,
    /// Value step between y labels; 0 means derive it from the data.
    pub granularity_y: f64,
    pub tick: TickConfig,
    pub axes_labels: AxesLabelConfig,
    pub axes_lines: AxesLineConfig,
    pub dashed_lines: DashedLineConfig,
    pub average_view: AverageViewConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            granularity_x: 3,
            granularity_y: 0.0,
            tick: TickConfig::default(),
            axes_labels: AxesLabelConfig::default(),
            axes_lines: AxesLineConfig::default(),
            dashed_lines: DashedLineConfig::default(),
            average_view: AverageViewConfig::default(),
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn with_granularity_x(mut self, granularity_x: usize) -> Self {
        self.granularity_x = granularity_x;
        self
    }

    #[must_use]
    pub fn with_granularity_y(mut self, granularity_y: f64) -> Self {
        self.granularity_y = granularity_y;
        self
    }

    #[must_use]
    pub fn with_average_overlap(mut self, overlaps_chart: bool) -> Self {
        self.average_view.overlaps_chart = overlaps_chart;
        self
    }

    /// Sets the width of axis lines and ticks together.
    pub fn set_axes_line_width(&mut self, width: f64) {
        self.tick.width = width;
        self.axes_lines.width = width;
    }

    /// Sets the colour of axis lines, ticks and axis labels together.
    pub fn set_axes_color(&mut self, color: Color) {
        self.tick.color = color;
        self.axes_lines.color = color;
        self.axes_labels.color = color;
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.granularity_y.is_finite() || self.granularity_y < 0.0 {
            return Err(ChartError::InvalidData(
                "y granularity must be finite and >= 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("tick width", self.tick.width),
            ("tick length", self.tick.length),
            ("axes line width", self.axes_lines.width),
            ("dashed line width", self.dashed_lines.width),
            ("dash width", self.dashed_lines.dash_width),
            ("average line width", self.average_view.line_width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        self.axes_labels.font.validate()?;
        self.average_view.primary_font.validate()?;
        self.average_view.secondary_font.validate()
    }
}

/// Visibility and placement switches applied to every layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneOptions {
    pub y_axis_position: YPosition,
    pub show_ticks: bool,
    pub show_dashed_lines: bool,
    pub show_units_of_measure: bool,
    pub show_average_line: bool,
    pub show_x_axis: bool,
    pub show_y_axis: bool,
    /// Bars keep their configured width and scroll instead of fitting.
    pub should_scroll: bool,
    /// Value drawn on the x axis. Defaults to 0.
    pub min_plot_y: Option<f64>,
    /// Value drawn at the top of the plot. Defaults to the data maximum.
    pub max_plot_y: Option<f64>,
}

impl Default for PlaneOptions {
    fn default() -> Self {
        Self {
            y_axis_position: YPosition::Left,
            show_ticks: true,
            show_dashed_lines: true,
            show_units_of_measure: true,
            show_average_line: false,
            show_x_axis: true,
            show_y_axis: true,
            should_scroll: true,
            min_plot_y: None,
            max_plot_y: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BarRadius {
    None,
    /// Half of the bar's shorter edge.
    Capsule,
    Custom(f64),
    Corners { corners: Corners, radius: f64 },
}

impl BarRadius {
    /// Corner radius and rounded corners for a bar whose shorter edge is `shorter_edge`.
    #[must_use]
    pub fn resolve(self, shorter_edge: f64) -> (f64, Corners) {
        match self {
            Self::None => (0.0, Corners::NONE),
            Self::Capsule => (shorter_edge / 2.0, Corners::ALL),
            Self::Custom(radius) => (radius, Corners::ALL),
            Self::Corners { corners, radius } => (radius, corners),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarConfig {
    pub radius: BarRadius,
    /// Bar width while scrolling.
    pub width: f64,
    /// Gap between neighbouring bars.
    pub spacing: f64,
    /// Caps fitted cells at `width + spacing`.
    pub limit_width: bool,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            radius: BarRadius::Corners {
                corners: Corners::TOP,
                radius: 3.0,
            },
            width: 12.0,
            spacing: 7.0,
            limit_width: false,
        }
    }
}

impl BarConfig {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ChartError::InvalidData(
                "bar width must be finite and > 0".to_owned(),
            ));
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(ChartError::InvalidData(
                "bar spacing must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    pub width: f64,
    pub cap: LineCap,
    /// Area fill under single-value lines.
    pub background_fill: Option<KeyColor>,
    pub show_circles: bool,
    pub is_smooth: bool,
    pub circle_color: Color,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            width: 4.0,
            cap: LineCap::Round,
            background_fill: Some(KeyColor::LIGHT_BLUE_FADE),
            show_circles: false,
            is_smooth: true,
            circle_color: Color::WHITE,
        }
    }
}

impl LineConfig {
    #[must_use]
    pub fn curve_style(&self) -> CurveStyle {
        if self.is_smooth {
            CurveStyle::Smooth {
                smoothness: DEFAULT_LINE_SMOOTHNESS,
            }
        } else {
            CurveStyle::Segmented
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line width must be finite and > 0".to_owned(),
            ));
        }
        if let Some(fill) = &self.background_fill {
            fill.validate()?;
        }
        self.circle_color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{BarRadius, ChartConfig};
    use crate::render::{Color, Corners};

    #[test]
    fn axes_color_propagates_to_labels() {
        let mut config = ChartConfig::default();
        config.set_axes_color(Color::RED);
        config.set_axes_line_width(2.0);
        assert_eq!(config.axes_labels.color, Color::RED);
        assert_eq!(config.tick.color, Color::RED);
        assert_eq!(config.tick.width, 2.0);
        assert_eq!(config.dashed_lines.color, Color::DARK_GRAY);
    }

    #[test]
    fn capsule_radius_is_half_the_shorter_edge() {
        assert_eq!(BarRadius::Capsule.resolve(12.0), (6.0, Corners::ALL));
        assert_eq!(BarRadius::None.resolve(12.0), (0.0, Corners::NONE));
    }

    #[test]
    fn negative_granularity_is_rejected() {
        assert!(ChartConfig::default().with_granularity_y(-1.0).validate().is_err());
    }
}

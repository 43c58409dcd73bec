use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::legend::KeyColor;
use crate::core::{Path, Rect};
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const CLEAR: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    pub const LIGHT_BLUE: Self = Self::rgb8(0xC2, 0xE8, 0xFF);
    pub const BLUE: Self = Self::rgb8(0x4E, 0xBC, 0xFF);
    pub const SEA_BLUE: Self = Self::rgb8(0x42, 0x66, 0xE8);
    pub const DARK_BLUE: Self = Self::rgb8(0x1B, 0x20, 0x5E);
    pub const GREEN: Self = Self::rgb8(0x72, 0xBF, 0x82);
    pub const ORANGE: Self = Self::rgb8(0xFF, 0x78, 0x2C);
    pub const RED: Self = Self::rgb8(0xEC, 0x23, 0x01);
    pub const PURPLE: Self = Self::rgb8(0x7B, 0x75, 0xFF);
    pub const LIGHT_GRAY: Self = Self::rgb8(0xE8, 0xE7, 0xEA);
    pub const MEDIUM_GRAY: Self = Self::rgb8(0xA7, 0xA6, 0xA8);
    pub const DARK_GRAY: Self = Self::rgb8(0x54, 0x54, 0x54);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub const fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            red as f64 / 255.0,
            green as f64 / 255.0,
            blue as f64 / 255.0,
        )
    }

    /// Parses `RRGGBB` or `#RRGGBB`.
    pub fn from_hex(hex: &str) -> ChartResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let parsed = (digits.len() == 6)
            .then(|| u32::from_str_radix(digits, 16).ok())
            .flatten()
            .ok_or_else(|| ChartError::InvalidData(format!("invalid hex color `{hex}`")))?;
        let [_, red, green, blue] = parsed.to_be_bytes();
        Ok(Self::rgb8(red, green, blue))
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Regular,
    Medium,
    Semibold,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size_px: f64,
    pub weight: FontWeight,
}

impl Font {
    #[must_use]
    pub const fn new(size_px: f64, weight: FontWeight) -> Self {
        Self { size_px, weight }
    }

    #[must_use]
    pub const fn regular(size_px: f64) -> Self {
        Self::new(size_px, FontWeight::Regular)
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.size_px.is_finite() || self.size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::regular(12.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke parameters shared by every path in one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub width: f64,
    pub color: Color,
    pub cap: LineCap,
    /// On/off dash lengths; empty means a solid stroke.
    pub dash: SmallVec<[f64; 2]>,
}

impl StrokeStyle {
    #[must_use]
    pub fn solid(width: f64, color: Color) -> Self {
        Self {
            width,
            color,
            cap: LineCap::Butt,
            dash: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn dashed(width: f64, color: Color, dash_length: f64) -> Self {
        let mut dash = SmallVec::new();
        dash.push(dash_length);
        Self {
            width,
            color,
            cap: LineCap::Butt,
            dash,
        }
    }

    #[must_use]
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    #[must_use]
    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ChartError::InvalidData(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        if self.dash.iter().any(|len| !len.is_finite() || *len <= 0.0) {
            return Err(ChartError::InvalidData(
                "dash lengths must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Key colour spread over `bounds`, top to bottom when `vertical`, left to
/// right otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientPaint {
    pub color: KeyColor,
    pub bounds: Rect,
    pub vertical: bool,
}

impl GradientPaint {
    #[must_use]
    pub fn new(color: KeyColor, bounds: Rect, vertical: bool) -> Self {
        Self {
            color,
            bounds,
            vertical,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.bounds.origin().is_finite()
            || !self.bounds.width.is_finite()
            || !self.bounds.height.is_finite()
        {
            return Err(ChartError::InvalidData(
                "gradient bounds must be finite".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// One or more subpaths stroked with the same style.
///
/// A gradient, when present, replaces the style colour.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePrimitive {
    pub path: Path,
    pub style: StrokeStyle,
    pub gradient: Option<GradientPaint>,
}

impl StrokePrimitive {
    #[must_use]
    pub fn new(path: Path, style: StrokeStyle) -> Self {
        Self {
            path,
            style,
            gradient: None,
        }
    }

    #[must_use]
    pub fn with_gradient(mut self, gradient: GradientPaint) -> Self {
        self.gradient = Some(gradient);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.path.validate()?;
        if let Some(gradient) = &self.gradient {
            gradient.validate()?;
        }
        self.style.validate()
    }
}

/// Closed area painted with a key colour.
#[derive(Debug, Clone, PartialEq)]
pub struct FillPrimitive {
    pub path: Path,
    pub paint: GradientPaint,
}

impl FillPrimitive {
    #[must_use]
    pub fn new(path: Path, paint: GradientPaint) -> Self {
        Self { path, paint }
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.path.validate()?;
        self.paint.validate()
    }
}

/// Which corners of a rectangle get rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corners {
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
}

impl Corners {
    pub const ALL: Self = Self {
        top_left: true,
        top_right: true,
        bottom_left: true,
        bottom_right: true,
    };
    pub const TOP: Self = Self {
        top_left: true,
        top_right: true,
        bottom_left: false,
        bottom_right: false,
    };
    pub const NONE: Self = Self {
        top_left: false,
        top_right: false,
        bottom_left: false,
        bottom_right: false,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectPrimitive {
    pub rect: Rect,
    pub fill: KeyColor,
    pub corner_radius: f64,
    pub corners: Corners,
}

impl RectPrimitive {
    #[must_use]
    pub fn new(rect: Rect, fill: KeyColor) -> Self {
        Self {
            rect,
            fill,
            corner_radius: 0.0,
            corners: Corners::NONE,
        }
    }

    #[must_use]
    pub fn with_corner_radius(mut self, corner_radius: f64, corners: Corners) -> Self {
        self.corner_radius = corner_radius;
        self.corners = corners;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        let rect = self.rect;
        if !rect.x.is_finite()
            || !rect.y.is_finite()
            || !rect.width.is_finite()
            || !rect.height.is_finite()
        {
            return Err(ChartError::InvalidData(
                "rect geometry must be finite".to_owned(),
            ));
        }
        if rect.width < 0.0 || rect.height < 0.0 {
            return Err(ChartError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        if !self.corner_radius.is_finite() || self.corner_radius < 0.0 {
            return Err(ChartError::InvalidData(
                "corner radius must be finite and >= 0".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

/// Ellipse inscribed in `rect`, used for scatter dots and line markers.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipsePrimitive {
    pub rect: Rect,
    pub fill: Color,
    pub stroke: Option<StrokeStyle>,
}

impl EllipsePrimitive {
    #[must_use]
    pub fn filled(rect: Rect, fill: Color) -> Self {
        Self {
            rect,
            fill,
            stroke: None,
        }
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        let rect = self.rect;
        if !rect.origin().is_finite() || !rect.width.is_finite() || !rect.height.is_finite() {
            return Err(ChartError::InvalidData(
                "ellipse geometry must be finite".to_owned(),
            ));
        }
        if let Some(stroke) = &self.stroke {
            stroke.validate()?;
        }
        self.fill.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextHAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Draw command for one label. `y` is the top of the text box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font: Font,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(text: impl Into<String>, x: f64, y: f64, font: Font, color: Color) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font,
            color,
            h_align: TextHAlign::Left,
        }
    }

    #[must_use]
    pub fn with_h_align(mut self, h_align: TextHAlign) -> Self {
        self.h_align = h_align;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        self.font.validate()?;
        self.color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, StrokeStyle};

    #[test]
    fn hex_colors_parse_with_or_without_hash() {
        let color = Color::from_hex("#4266E8").expect("valid hex");
        assert_eq!(color, Color::SEA_BLUE);
        assert_eq!(Color::from_hex("FFFFFF").expect("valid hex"), Color::WHITE);
        assert!(Color::from_hex("12345").is_err());
        assert!(Color::from_hex("GG0000").is_err());
    }

    #[test]
    fn dashed_stroke_rejects_non_positive_dash() {
        let mut style = StrokeStyle::dashed(1.0, Color::BLACK, 3.0);
        assert!(style.validate().is_ok());
        style.dash[0] = 0.0;
        assert!(style.validate().is_err());
    }
}

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::data::PlotableData;
use crate::core::formatter::Formatter;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Paint attached to a legend key and to the marks it colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KeyColor {
    Solid(Color),
    /// Two-stop gradient. Its direction comes from the painted mark.
    Gradient { start: Color, end: Color },
    /// Hard-edged bands. Without explicit locations the bands are evenly
    /// distributed along the gradient axis.
    Segmented {
        colors: SmallVec<[Color; 4]>,
        locations: Option<SmallVec<[f64; 4]>>,
        vertical: bool,
    },
}

impl KeyColor {
    /// Translucent light blue fading to clear, used under single lines.
    pub const LIGHT_BLUE_FADE: Self = Self::Gradient {
        start: Color::LIGHT_BLUE,
        end: Color::LIGHT_BLUE.with_alpha(0.0),
    };

    /// Colour used where a single solid colour is needed.
    #[must_use]
    pub fn main_color(&self) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::Gradient { start, .. } => *start,
            Self::Segmented { colors, .. } => colors.first().copied().unwrap_or(Color::BLACK),
        }
    }

    #[must_use]
    pub fn is_gradient(&self) -> bool {
        !matches!(self, Self::Solid(_))
    }

    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Solid(color) => color.validate(),
            Self::Gradient { start, end } => {
                start.validate()?;
                end.validate()
            }
            Self::Segmented {
                colors, locations, ..
            } => {
                if colors.is_empty() {
                    return Err(ChartError::InvalidData(
                        "segmented color needs at least one color".to_owned(),
                    ));
                }
                if let Some(locations) = locations {
                    if locations.len() != colors.len() {
                        return Err(ChartError::InvalidData(
                            "segmented color needs one location per color".to_owned(),
                        ));
                    }
                    if locations.iter().any(|location| !location.is_finite()) {
                        return Err(ChartError::InvalidData(
                            "segmented color locations must be finite".to_owned(),
                        ));
                    }
                }
                colors.iter().try_for_each(|color| color.validate())
            }
        }
    }
}

impl From<Color> for KeyColor {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

/// Legend entry naming one value slot and its colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub name: String,
    pub color: KeyColor,
    pub value: Option<f64>,
    pub is_vertical: bool,
}

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<KeyColor>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            value: None,
            is_vertical: false,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Line key coloured left to right by `colors`.
    #[must_use]
    pub fn x_segmented(name: impl Into<String>, colors: &[Color]) -> Self {
        Self::new(
            name,
            KeyColor::Segmented {
                colors: colors.iter().copied().collect(),
                locations: None,
                vertical: false,
            },
        )
    }

    /// Line key coloured bottom to top by value thresholds.
    ///
    /// Each threshold's band starts at `1 - threshold / max`, where `max` is
    /// the largest value in `entries`.
    #[must_use]
    pub fn y_thresholds(
        name: impl Into<String>,
        thresholds: &[(f64, Color)],
        entries: &[PlotableData],
    ) -> Self {
        let fallback = thresholds.first().map_or(Color::BLACK, |(_, color)| *color);
        let mut key = Self::new(name, fallback);
        key.is_vertical = true;

        if entries.len() < 2 || thresholds.iter().any(|(threshold, _)| *threshold <= 0.0) {
            return key;
        }
        let Some(max) = entries
            .iter()
            .filter_map(|entry| entry.values.iter().copied().reduce(f64::max))
            .reduce(f64::max)
        else {
            key.color = KeyColor::Solid(Color::BLACK);
            return key;
        };

        let mut sorted = thresholds.to_vec();
        sorted.sort_by(|a, b| b.0.total_cmp(&a.0));
        key.color = KeyColor::Segmented {
            colors: sorted.iter().map(|(_, color)| *color).collect(),
            locations: Some(sorted.iter().map(|(threshold, _)| 1.0 - threshold / max).collect()),
            vertical: true,
        };
        key
    }

    /// "<value> <name>" when a value is set, otherwise the name.
    #[must_use]
    pub fn text_with_value(&self, formatter: &Formatter) -> String {
        match self.value {
            Some(value) => format!("{} {}", formatter.format(value), self.name),
            None => self.name.clone(),
        }
    }
}

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::api::config::{BarConfig, LineConfig};
use crate::core::{ChartKind, Key, PlotableData, Rect};
use crate::error::{ChartError, ChartResult};
use crate::interaction::HighlightedView;
use crate::render::{Color, Corners, RectPrimitive};

/// Gap between the sub-bars of one grouped bar.
pub const GROUPED_BAR_SPACING: f64 = 2.0;
pub const DEFAULT_DOT_DIAMETER: f64 = 6.0;

pub type BarRects = SmallVec<[RectPrimitive; 4]>;

/// Everything one bar needs to paint itself.
#[derive(Debug, Clone, Copy)]
pub struct BarSlot<'a> {
    /// Full extent of the bar, bottom-aligned on the x axis.
    pub rect: Rect,
    pub entry: &'a PlotableData,
    pub keys: &'a [Key],
    pub config: &'a BarConfig,
    /// Largest single value of the dataset (or the caller's max override).
    pub max_individual_value: f64,
}

/// Capability shared by the bar styles.
pub trait ChartBar {
    /// Value range family the bar heights are scaled against.
    fn kind(&self) -> ChartKind;

    /// Value a whole bar represents, compared against the plot range.
    fn bar_value(&self, entry: &PlotableData) -> f64 {
        match self.kind() {
            ChartKind::SideBySideBar => entry.max_value(),
            _ => entry.total(),
        }
    }

    /// Rectangles painting one bar.
    fn configure_bar(&self, slot: BarSlot<'_>) -> ChartResult<BarRects>;
}

/// Built-in bar styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BarStyle {
    /// One solid bar coloured with the first legend key.
    Plain,
    /// Values stacked bottom-up, one legend key per segment.
    #[default]
    MultiStacked,
    /// Values side by side, each sub-bar as wide as the value count allows.
    MultiSideBySide,
    /// Values side by side, sub-bar width reserved for every legend key.
    HorizontalGrouped,
}

impl ChartBar for BarStyle {
    fn kind(&self) -> ChartKind {
        match self {
            Self::Plain | Self::MultiStacked => ChartKind::Bar,
            Self::MultiSideBySide | Self::HorizontalGrouped => ChartKind::SideBySideBar,
        }
    }

    fn configure_bar(&self, slot: BarSlot<'_>) -> ChartResult<BarRects> {
        match self {
            Self::Plain => Ok(plain_bar(slot)),
            Self::MultiStacked => stacked_bar(slot),
            Self::MultiSideBySide => grouped_bar(slot, slot.entry.values.len()),
            Self::HorizontalGrouped => grouped_bar(slot, slot.keys.len()),
        }
    }
}

fn ensure_keys(slot: &BarSlot<'_>) -> ChartResult<()> {
    let required = slot.entry.values.len();
    if slot.keys.len() < required {
        return Err(ChartError::MissingLegendKeys {
            required,
            available: slot.keys.len(),
        });
    }
    Ok(())
}

/// Applies the configured radius, restricted to the corners in `edges`.
fn rounded(primitive: RectPrimitive, config: &BarConfig, edges: Corners) -> RectPrimitive {
    let rect = primitive.rect;
    let shorter = rect.width.min(rect.height);
    if shorter <= 0.0 {
        return primitive;
    }
    let (radius, mask) = config.radius.resolve(shorter);
    let corners = Corners {
        top_left: mask.top_left && edges.top_left,
        top_right: mask.top_right && edges.top_right,
        bottom_left: mask.bottom_left && edges.bottom_left,
        bottom_right: mask.bottom_right && edges.bottom_right,
    };
    primitive.with_corner_radius(radius, corners)
}

fn plain_bar(slot: BarSlot<'_>) -> BarRects {
    let color = slot
        .keys
        .first()
        .map_or(Color::BLUE, |key| key.color.main_color());
    let primitive = RectPrimitive::new(slot.rect, color.into());
    let mut rects = BarRects::new();
    rects.push(rounded(primitive, slot.config, Corners::ALL));
    rects
}

fn stacked_bar(slot: BarSlot<'_>) -> ChartResult<BarRects> {
    ensure_keys(&slot)?;
    let total = slot.entry.total();
    let mut rects = BarRects::new();
    if slot.entry.values.len() < 2 {
        return Ok(plain_bar(slot));
    }

    let last = slot.entry.values.len() - 1;
    let mut bottom = slot.rect.max_y();
    for (index, value) in slot.entry.values.iter().enumerate() {
        let share = if total == 0.0 { 0.0 } else { value / total };
        let height = (slot.rect.height * share).max(0.0);
        let rect = Rect::new(slot.rect.x, bottom - height, slot.rect.width, height);
        bottom -= height;
        let edges = Corners {
            top_left: index == last,
            top_right: index == last,
            bottom_left: index == 0,
            bottom_right: index == 0,
        };
        let primitive = RectPrimitive::new(rect, slot.keys[index].color.main_color().into());
        rects.push(rounded(primitive, slot.config, edges));
    }
    Ok(rects)
}

fn grouped_bar(slot: BarSlot<'_>, columns: usize) -> ChartResult<BarRects> {
    ensure_keys(&slot)?;
    let mut rects = BarRects::new();
    let columns = columns.max(1);
    let sub_width = ((slot.rect.width - (columns - 1) as f64 * GROUPED_BAR_SPACING)
        / columns as f64)
        .max(0.0);
    let entry_max = slot.entry.max_value();
    for (index, value) in slot.entry.values.iter().enumerate() {
        let share = if entry_max == 0.0 || slot.max_individual_value == 0.0 {
            0.0
        } else {
            value / entry_max
        };
        let height = (slot.rect.height * share).max(0.0);
        let x = slot.rect.x + index as f64 * (sub_width + GROUPED_BAR_SPACING);
        let rect = Rect::new(x, slot.rect.max_y() - height, sub_width, height);
        let primitive = RectPrimitive::new(rect, slot.keys[index].color.main_color().into());
        rects.push(rounded(primitive, slot.config, Corners::ALL));
    }
    Ok(rects)
}

/// Which plot the chart draws on top of the cartesian plane.
#[derive(Debug)]
pub enum PlotType {
    Bar {
        style: BarStyle,
        highlight_view: Option<Box<dyn HighlightedView>>,
        config: BarConfig,
    },
    Line(LineConfig),
    Scatter { dot_diameter: f64 },
}

impl Default for PlotType {
    fn default() -> Self {
        Self::bar(BarStyle::default())
    }
}

impl PlotType {
    #[must_use]
    pub fn bar(style: BarStyle) -> Self {
        Self::Bar {
            style,
            highlight_view: None,
            config: BarConfig::default(),
        }
    }

    #[must_use]
    pub fn line() -> Self {
        Self::Line(LineConfig::default())
    }

    #[must_use]
    pub fn scatter() -> Self {
        Self::Scatter {
            dot_diameter: DEFAULT_DOT_DIAMETER,
        }
    }

    /// Attaches a highlight overlay. Ignored by non-bar plots.
    #[must_use]
    pub fn with_highlight_view(mut self, view: Box<dyn HighlightedView>) -> Self {
        if let Self::Bar { highlight_view, .. } = &mut self {
            *highlight_view = Some(view);
        }
        self
    }

    #[must_use]
    pub fn with_bar_config(mut self, bar_config: BarConfig) -> Self {
        if let Self::Bar { config, .. } = &mut self {
            *config = bar_config;
        }
        self
    }

    #[must_use]
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Bar { style, .. } => style.kind(),
            Self::Line(_) => ChartKind::Line,
            Self::Scatter { .. } => ChartKind::Scatter,
        }
    }

    /// Average line availability: every bar, lines with one value per entry.
    #[must_use]
    pub fn supports_average_line(&self, number_of_values: usize) -> bool {
        match self {
            Self::Bar { .. } => true,
            Self::Line(_) => number_of_values == 1,
            Self::Scatter { .. } => false,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Bar { config, .. } => config.validate(),
            Self::Line(config) => config.validate(),
            Self::Scatter { dot_diameter } => {
                if !dot_diameter.is_finite() || *dot_diameter <= 0.0 {
                    return Err(ChartError::InvalidData(
                        "dot diameter must be finite and > 0".to_owned(),
                    ));
                }
                Ok(())
            }
        }
    }
}

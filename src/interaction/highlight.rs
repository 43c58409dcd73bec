use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use tracing::{debug, trace};

use crate::core::formatter::Formatter;
use crate::core::{ChartData, PlotableData, Point, Rect, Size};
use crate::layout::TextMeasurer;
use crate::render::{Color, Corners, Font, FontWeight, RectPrimitive, RenderFrame, TextPrimitive};

/// Space between the overlay and the top of the plot.
pub const OVERLAY_SPACING: f64 = 5.0;
/// Width of the line joining the overlay to the highlighted bar.
pub const INDICATOR_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// Phase-tagged pointer sample in chart coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub phase: GesturePhase,
    pub position: Point,
}

impl GestureEvent {
    #[must_use]
    pub fn new(phase: GesturePhase, position: Point) -> Self {
        Self { phase, position }
    }

    #[must_use]
    pub fn began(x: f64, y: f64) -> Self {
        Self::new(GesturePhase::Began, Point::new(x, y))
    }

    #[must_use]
    pub fn changed(x: f64, y: f64) -> Self {
        Self::new(GesturePhase::Changed, Point::new(x, y))
    }

    #[must_use]
    pub fn ended(x: f64, y: f64) -> Self {
        Self::new(GesturePhase::Ended, Point::new(x, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightEvent {
    Began,
    Entered(usize),
    Left(usize),
    Ended,
}

pub type HighlightEvents = SmallVec<[HighlightEvent; 4]>;

/// Observer of highlight transitions. Every hook defaults to a no-op.
pub trait ChartHighlightingDelegate {
    fn did_begin_highlighting(&mut self) {}

    /// Called every time a new bar becomes highlighted.
    fn did_highlight(&mut self, _index: usize, _entry: &PlotableData) {}

    fn did_end_highlighting(&mut self) {}
}

/// Forwards `events` to `delegate`, resolving entered indices against `entries`.
pub fn notify_delegate(
    delegate: &mut dyn ChartHighlightingDelegate,
    events: &[HighlightEvent],
    entries: &[PlotableData],
) {
    for event in events {
        match *event {
            HighlightEvent::Began => delegate.did_begin_highlighting(),
            HighlightEvent::Entered(index) => {
                if let Some(entry) = entries.get(index) {
                    delegate.did_highlight(index, entry);
                }
            }
            HighlightEvent::Left(_) => {}
            HighlightEvent::Ended => delegate.did_end_highlighting(),
        }
    }
}

/// Overlay shown above the highlighted bar.
pub trait HighlightedView: fmt::Debug {
    /// Size the view wants for its current content.
    fn natural_size(&self, measurer: &dyn TextMeasurer) -> Size;

    /// Currently displayed value text.
    fn data_value(&self) -> Option<&str>;

    fn update_value(&mut self, value: Option<String>);

    fn update_with_bar_data(&mut self, _bar: &PlotableData) {}

    fn update_with_chart_data(&mut self, _data: &ChartData) {}

    fn set_visible(&mut self, _visible: bool) {}

    fn is_visible(&self) -> bool {
        true
    }

    /// Emits the view's primitives inside `rect`.
    fn draw(&self, _frame: &mut RenderFrame, _rect: Rect, _measurer: &dyn TextMeasurer) {}
}

/// Rounded badge with the bar value and the y unit.
#[derive(Debug, Clone, PartialEq)]
pub struct BarHighlightedView {
    data_value: Option<String>,
    unit: Option<String>,
    visible: bool,
    pub background: Color,
    pub value_color: Color,
    pub unit_color: Color,
    pub value_font: Font,
    pub unit_font: Font,
}

impl Default for BarHighlightedView {
    fn default() -> Self {
        Self {
            data_value: Some("0".to_owned()),
            unit: None,
            visible: false,
            background: Color::LIGHT_GRAY,
            value_color: Color::BLACK,
            unit_color: Color::MEDIUM_GRAY,
            value_font: Font::new(14.0, FontWeight::Bold),
            unit_font: Font::new(12.0, FontWeight::Medium),
        }
    }
}

impl BarHighlightedView {
    const PADDING: f64 = 10.0;
    const GAP: f64 = 5.0;
    const CORNER_RADIUS: f64 = 5.0;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    fn sizes(&self, measurer: &dyn TextMeasurer) -> (Size, Size) {
        let value_text = self.data_value.as_deref().unwrap_or_default();
        let unit_text = self.unit.as_deref().unwrap_or_default();
        (
            measurer.measure(value_text, self.value_font),
            measurer.measure(unit_text, self.unit_font),
        )
    }
}

impl HighlightedView for BarHighlightedView {
    fn natural_size(&self, measurer: &dyn TextMeasurer) -> Size {
        let (value, unit) = self.sizes(measurer);
        Size::new(
            Self::PADDING + value.width + Self::GAP + unit.width + Self::PADDING,
            Self::PADDING + value.height + Self::PADDING,
        )
    }

    fn data_value(&self) -> Option<&str> {
        self.data_value.as_deref()
    }

    fn update_value(&mut self, value: Option<String>) {
        self.data_value = value;
    }

    fn update_with_chart_data(&mut self, data: &ChartData) {
        self.unit = Some(data.y_unit.clone());
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn draw(&self, frame: &mut RenderFrame, rect: Rect, measurer: &dyn TextMeasurer) {
        frame.rects.push(
            RectPrimitive::new(rect, self.background.into())
                .with_corner_radius(Self::CORNER_RADIUS, Corners::ALL),
        );
        let (value_size, unit_size) = self.sizes(measurer);
        let value_top = rect.min_y() + Self::PADDING;
        if let Some(value) = self.data_value.as_deref().filter(|text| !text.is_empty()) {
            frame.texts.push(TextPrimitive::new(
                value,
                rect.min_x() + Self::PADDING,
                value_top,
                self.value_font,
                self.value_color,
            ));
        }
        if let Some(unit) = self.unit.as_deref().filter(|text| !text.is_empty()) {
            frame.texts.push(TextPrimitive::new(
                unit,
                rect.min_x() + Self::PADDING + value_size.width + Self::GAP,
                value_top + value_size.height - unit_size.height,
                self.unit_font,
                self.unit_color,
            ));
        }
    }
}

/// Overlay frame and the indicator joining it to the bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPlacement {
    pub view: Rect,
    pub indicator: Rect,
}

/// Centres a `view_size` overlay above `cell`, clamped horizontally to `plot_area`.
#[must_use]
pub fn overlay_placement(
    cell: Rect,
    plot_area: Rect,
    bar_top: f64,
    view_size: Size,
) -> OverlayPlacement {
    let mut x = cell.mid_x() - view_size.width / 2.0;
    if x < plot_area.min_x() {
        x = plot_area.min_x();
    }
    if x + view_size.width > plot_area.max_x() {
        x = plot_area.max_x() - view_size.width;
    }
    let view = Rect::new(
        x,
        plot_area.min_y() - view_size.height - OVERLAY_SPACING,
        view_size.width,
        view_size.height,
    );
    let indicator_top = plot_area.min_y() - OVERLAY_SPACING;
    let indicator = Rect::new(
        cell.mid_x() - INDICATOR_WIDTH / 2.0,
        indicator_top,
        INDICATOR_WIDTH,
        (bar_top - indicator_top).max(0.0),
    );
    OverlayPlacement { view, indicator }
}

/// Text shown in the overlay for a highlighted entry.
#[must_use]
pub fn highlight_value_text(entry: &PlotableData) -> String {
    Formatter::decimal(1).format(entry.total())
}

/// Long-press highlight state machine over bar cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightController {
    active: bool,
    highlighted: Option<usize>,
    scroll_disabled: bool,
}

impl HighlightController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    #[must_use]
    pub fn is_scroll_enabled(&self) -> bool {
        !self.scroll_disabled
    }

    /// Advances the state machine. `cells` pairs each drawn bar's dataset
    /// index with its hit rectangle; `data_bounds` is the area pointer moves
    /// are tracked in.
    pub fn handle(
        &mut self,
        event: GestureEvent,
        cells: &[(usize, Rect)],
        data_bounds: Rect,
    ) -> HighlightEvents {
        let mut events = HighlightEvents::new();
        match event.phase {
            GesturePhase::Began => {
                self.scroll_disabled = true;
                self.active = true;
                events.push(HighlightEvent::Began);
                let hit = hit_test(cells, event.position);
                // A restarted press keeps enter/leave paired with the bar it left.
                if let Some(current) = self.highlighted
                    && hit != Some(current)
                {
                    events.push(HighlightEvent::Left(current));
                    self.highlighted = None;
                }
                if let Some(index) = hit
                    && self.highlighted != Some(index)
                {
                    self.highlighted = Some(index);
                    events.push(HighlightEvent::Entered(index));
                }
            }
            GesturePhase::Changed => {
                if !self.active || !data_bounds.contains(event.position) {
                    return events;
                }
                let Some(index) = hit_test(cells, event.position) else {
                    return events;
                };
                match self.highlighted {
                    Some(current) if current == index => {}
                    Some(current) => {
                        events.push(HighlightEvent::Left(current));
                        events.push(HighlightEvent::Entered(index));
                        self.highlighted = Some(index);
                    }
                    None => {
                        events.push(HighlightEvent::Entered(index));
                        self.highlighted = Some(index);
                    }
                }
            }
            GesturePhase::Ended | GesturePhase::Cancelled => {
                if !self.active {
                    return events;
                }
                if let Some(current) = self.highlighted.take() {
                    events.push(HighlightEvent::Left(current));
                }
                events.push(HighlightEvent::Ended);
                self.scroll_disabled = false;
                self.active = false;
            }
        }
        if !events.is_empty() {
            debug!(phase = ?event.phase, highlighted = ?self.highlighted, "highlight transition");
        }
        events
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn hit_test(cells: &[(usize, Rect)], position: Point) -> Option<usize> {
    let hit = cells
        .iter()
        .find(|(_, cell)| cell.contains(position))
        .map(|(index, _)| *index);
    trace!(x = position.x, y = position.y, ?hit, "bar hit test");
    hit
}

//! Pointer-driven bar highlighting and the deferred callbacks the chart runs
//! on the host loop.

mod highlight;
mod scheduler;

pub use highlight::{
    BarHighlightedView, ChartHighlightingDelegate, GestureEvent, GesturePhase, HighlightController,
    HighlightEvent, HighlightEvents, HighlightedView, INDICATOR_WIDTH, OVERLAY_SPACING,
    OverlayPlacement, highlight_value_text, notify_delegate, overlay_placement,
};
pub use scheduler::{ChartAction, DeferredCallbacks, INITIAL_ANIMATION_WINDOW};

//! Text measurement, label bookkeeping and the margin/axis resolution that
//! every cartesian draw pass runs before emitting geometry.

pub mod labels;
pub mod margins;
pub mod text;
pub mod x_axis;

pub use labels::{Label, LabelRole, Labels};
pub use margins::{
    AverageBadge, LayoutInput, LayoutOutcome, MarginResolver, NO_DATA_TEXT, ResolvedLayout,
};
pub use text::{HeuristicTextMeasurer, TextMeasurer};
pub use x_axis::{BarXAxis, LineXAxis, ScatterXAxis, XAxisContext, XAxisProvider, XAxisTicks};

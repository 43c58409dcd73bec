pub mod aggregator;
pub mod curve;
pub mod data;
pub mod formatter;
pub mod legend;
pub mod scale;
pub mod types;

pub use aggregator::{Cluster, aggregate};
pub use curve::{CurveStyle, Path, PathCommand};
pub use data::{ChartData, ChartKind, PlotableData};
pub use formatter::{Formatter, NumberLocale};
pub use legend::{Key, KeyColor};
pub use scale::LinearScale;
pub use types::{EdgeInsets, Point, Rect, Size, Viewport};

//! Public chart component plus the plane and plot builders it drives.

mod bar_plot;
mod cartesian_plane;
mod chart;
pub mod config;
mod line_plot;
mod plot_type;
mod scatter_plot;
mod snapshot;

pub use bar_plot::{BAR_LABEL_SPACING, BarCell, BarGeometry, BarPlot};
pub use cartesian_plane::{
    AVERAGE_LABEL_INSET, AVERAGE_LABEL_SPACING, AverageMarker, CartesianPlane, PlaneFrame,
    PlotContext,
};
pub use chart::Chart;
pub use config::{
    AverageViewConfig, AxesLabelConfig, AxesLineConfig, BarConfig, BarRadius, ChartConfig,
    DEFAULT_MARGINS, DashedLineConfig, LineConfig, PlaneOptions, TickConfig, YPosition,
};
pub use line_plot::{LineGeometry, LinePlot};
pub use plot_type::{
    BarRects, BarSlot, BarStyle, ChartBar, DEFAULT_DOT_DIAMETER, GROUPED_BAR_SPACING, PlotType,
};
pub use scatter_plot::ScatterPlot;
pub use snapshot::{CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartSnapshot, ChartSnapshotJsonContractV1};

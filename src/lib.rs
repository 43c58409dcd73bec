//! chart-plane: headless cartesian chart layout engine.
//!
//! Given a dataset and a declarative configuration the crate resolves chart
//! margins, axis ticks, gridlines and labels, lays out bars, lines or scatter
//! dots on the shared data region and hands a backend-agnostic
//! [`render::RenderFrame`] to a [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod telemetry;

pub use api::{BarStyle, Chart, ChartConfig, PlaneOptions, PlotType};
pub use error::{ChartError, ChartResult};

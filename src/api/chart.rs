use std::time::Duration;

use tracing::{debug, trace};

use crate::api::bar_plot::{BarGeometry, BarPlot};
use crate::api::cartesian_plane::{CartesianPlane, PlaneFrame, PlotContext};
use crate::api::config::{ChartConfig, PlaneOptions, YPosition};
use crate::api::line_plot::LinePlot;
use crate::api::plot_type::PlotType;
use crate::api::scatter_plot::ScatterPlot;
use crate::api::snapshot::ChartSnapshot;
use crate::core::data::ensure_homogeneous;
use crate::core::{ChartData, ChartKind, PlotableData, Rect, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    ChartAction, ChartHighlightingDelegate, DeferredCallbacks, GestureEvent, HighlightController,
    HighlightEvent, HighlightEvents, HighlightedView, INITIAL_ANIMATION_WINDOW,
    highlight_value_text, notify_delegate, overlay_placement,
};
use crate::layout::TextMeasurer;
use crate::render::{RectPrimitive, RenderFrame, Renderer};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Geometry of the last pass that pointer events and scrolling resolve against.
#[derive(Debug, Clone, Default)]
struct PassCache {
    data_region: Option<Rect>,
    bars: Option<BarGeometry>,
    plane: Option<PlaneFrame>,
}

/// Chart component consumed by host applications.
///
/// `Chart` owns the dataset, configuration and plot type, runs one layout
/// pass per frame and forwards the result to its `Renderer`.
pub struct Chart<R: Renderer> {
    renderer: R,
    measurer: Box<dyn TextMeasurer>,
    viewport: Viewport,
    data: ChartData,
    plot_type: PlotType,
    config: ChartConfig,
    /// The caller left the y granularity at 0; it follows the data.
    derive_granularity_y: bool,
    options: PlaneOptions,
    highlight: HighlightController,
    delegate: Option<Box<dyn ChartHighlightingDelegate>>,
    callbacks: DeferredCallbacks<ChartAction>,
    initial_animation: bool,
    scroll_offset: f64,
    cache: PassCache,
}

impl<R: Renderer> std::fmt::Debug for Chart<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("viewport", &self.viewport)
            .field("kind", &self.plot_type.kind())
            .field("entries", &self.data.entries.len())
            .field("options", &self.options)
            .field("highlight", &self.highlight)
            .field("initial_animation", &self.initial_animation)
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> Chart<R> {
    /// Creates a chart with default configuration and options.
    ///
    /// Schedules the end of the initial appearance animation one second out.
    pub fn new(
        renderer: R,
        measurer: Box<dyn TextMeasurer>,
        viewport: Viewport,
        data: ChartData,
        plot_type: PlotType,
    ) -> ChartResult<Self> {
        let viewport = viewport.validate()?;
        ensure_homogeneous(&data.entries)?;
        plot_type.validate()?;

        let mut callbacks = DeferredCallbacks::new();
        callbacks.schedule(INITIAL_ANIMATION_WINDOW, ChartAction::DisableInitialAnimation);

        let mut chart = Self {
            renderer,
            measurer,
            viewport,
            data,
            plot_type,
            config: ChartConfig::default(),
            derive_granularity_y: true,
            options: PlaneOptions::default(),
            highlight: HighlightController::new(),
            delegate: None,
            callbacks,
            initial_animation: true,
            scroll_offset: 0.0,
            cache: PassCache::default(),
        };
        chart.refresh_granularity_y();
        if let Some(view) = bar_view(&mut chart.plot_type) {
            view.set_visible(false);
        }
        debug!(
            kind = ?chart.plot_type.kind(),
            entries = chart.data.entries.len(),
            "chart created"
        );
        Ok(chart)
    }

    #[must_use]
    pub fn data(&self) -> &ChartData {
        &self.data
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn options(&self) -> &PlaneOptions {
        &self.options
    }

    #[must_use]
    pub fn plot_type(&self) -> &PlotType {
        &self.plot_type
    }

    #[must_use]
    pub fn kind(&self) -> ChartKind {
        self.plot_type.kind()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn is_initial_animation_enabled(&self) -> bool {
        self.initial_animation
    }

    #[must_use]
    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlight.highlighted_index()
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        self.viewport = viewport.validate()?;
        self.invalidate();
        Ok(())
    }

    /// Replaces the configuration. A y granularity of 0 is derived from the data.
    pub fn set_config(&mut self, config: ChartConfig) -> ChartResult<()> {
        config.validate()?;
        self.derive_granularity_y = config.granularity_y == 0.0;
        self.config = config;
        self.refresh_granularity_y();
        self.invalidate();
        Ok(())
    }

    pub fn set_plot_type(&mut self, plot_type: PlotType) -> ChartResult<()> {
        plot_type.validate()?;
        self.plot_type = plot_type;
        self.highlight.reset();
        self.refresh_granularity_y();
        self.invalidate();
        Ok(())
    }

    pub fn set_highlighting_delegate(&mut self, delegate: Box<dyn ChartHighlightingDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn clear_highlighting_delegate(&mut self) {
        self.delegate = None;
    }

    pub fn set_show_ticks(&mut self, show: bool) {
        self.options.show_ticks = show;
        self.invalidate();
    }

    pub fn set_show_dashed_lines(&mut self, show: bool) {
        self.options.show_dashed_lines = show;
        self.invalidate();
    }

    /// Requests the average line. Only bars and single-value lines draw it.
    pub fn set_show_average_line(&mut self, show: bool) {
        self.options.show_average_line = show;
        self.invalidate();
    }

    pub fn set_average_overlaps_chart(&mut self, overlaps: bool) {
        self.config.average_view.overlaps_chart = overlaps;
        self.invalidate();
    }

    pub fn set_show_units_of_measure(&mut self, show: bool) {
        self.options.show_units_of_measure = show;
        self.invalidate();
    }

    pub fn set_show_x_axis(&mut self, show: bool) {
        self.options.show_x_axis = show;
        self.invalidate();
    }

    pub fn set_show_y_axis(&mut self, show: bool) {
        self.options.show_y_axis = show;
        self.invalidate();
    }

    pub fn set_y_axis_position(&mut self, position: YPosition) {
        self.options.y_axis_position = position;
        self.invalidate();
    }

    /// Switches bars between fixed-width scrolling cells and fitted cells.
    pub fn set_should_scroll(&mut self, should_scroll: bool) {
        self.options.should_scroll = should_scroll;
        self.scroll_offset = 0.0;
        self.invalidate();
    }

    pub fn set_min_plot_y(&mut self, min: Option<f64>) -> ChartResult<()> {
        validate_override(min)?;
        self.options.min_plot_y = min;
        self.invalidate();
        Ok(())
    }

    pub fn set_max_plot_y(&mut self, max: Option<f64>) -> ChartResult<()> {
        validate_override(max)?;
        self.options.max_plot_y = max;
        self.invalidate();
        Ok(())
    }

    /// Replaces every entry, keeping legend keys, units and formatters.
    pub fn update_chart(&mut self, entries: Vec<PlotableData>) -> ChartResult<()> {
        ensure_homogeneous(&entries)?;
        self.data.update_entries(entries);
        self.refresh_granularity_y();
        self.highlight.reset();
        self.scroll_offset = 0.0;
        self.invalidate();
        if let Some(view) = bar_view(&mut self.plot_type) {
            view.set_visible(false);
        }
        debug!(entries = self.data.entries.len(), "chart data updated");
        Ok(())
    }

    /// Scrolls bar content by `delta` pixels, clamped to the content width.
    ///
    /// Ignored while highlighting or when bars fit the viewport.
    pub fn scroll_by(&mut self, delta: f64) -> ChartResult<f64> {
        if !delta.is_finite() {
            return Err(ChartError::InvalidData(
                "scroll delta must be finite".to_owned(),
            ));
        }
        if !self.options.should_scroll || !self.highlight.is_scroll_enabled() {
            return Ok(self.scroll_offset);
        }
        self.ensure_pass()?;
        let (Some(bars), Some(region)) = (&self.cache.bars, self.cache.data_region) else {
            return Ok(self.scroll_offset);
        };
        let max_offset = (bars.content_width - region.width).max(0.0);
        self.scroll_offset = (self.scroll_offset + delta).clamp(0.0, max_offset);
        trace!(offset = self.scroll_offset, max_offset, "scrolled bars");
        Ok(self.scroll_offset)
    }

    /// Runs one layout pass and returns its primitives.
    pub fn build_render_frame(&mut self) -> ChartResult<RenderFrame> {
        ensure_homogeneous(&self.data.entries)?;
        let kind = self.plot_type.kind();
        let mut options = self.options;
        options.show_average_line = options.show_average_line
            && self
                .plot_type
                .supports_average_line(self.data.number_of_values());

        let measurer = self.measurer.as_ref();
        let plane = CartesianPlane::new(&self.data, kind, &self.config, &options)
            .draw(self.viewport.bounds(), measurer)?;
        let mut frame = RenderFrame::new(self.viewport);
        plane.append_to(&mut frame, &self.config, &options);

        let mut cache = PassCache {
            data_region: plane.data_region(),
            ..PassCache::default()
        };
        if let Some(context) =
            PlotContext::from_plane(&plane, &self.data, &self.config, &options, measurer)
        {
            match &self.plot_type {
                PlotType::Bar {
                    style,
                    highlight_view,
                    config,
                } => {
                    let geometry = BarPlot::new(style, config)
                        .with_scroll_offset(self.scroll_offset)
                        .draw(&context, &mut frame)?;
                    if let (Some(view), Some(index)) =
                        (highlight_view, self.highlight.highlighted_index())
                        && view.is_visible()
                        && let Some(cell) = geometry.cell(index)
                    {
                        let size = view.natural_size(measurer);
                        let placement =
                            overlay_placement(cell.cell, context.region, cell.bar_top, size);
                        frame.rects.push(RectPrimitive::new(
                            placement.indicator,
                            self.config.axes_lines.color.into(),
                        ));
                        view.draw(&mut frame, placement.view, measurer);
                    }
                    cache.bars = Some(geometry);
                }
                PlotType::Line(config) => {
                    LinePlot::new(config).draw(&context, &mut frame)?;
                }
                PlotType::Scatter { dot_diameter } => {
                    ScatterPlot::new(*dot_diameter).draw(&context, &mut frame)?;
                }
            }
        }
        debug!(
            kind = ?kind,
            no_data = plane.is_no_data(),
            primitives = frame.primitive_count(),
            "chart frame built"
        );
        cache.plane = Some(plane);
        self.cache = cache;
        Ok(frame)
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_render_frame()?;
        self.renderer.render(&frame)
    }

    /// Renders the frame into an external cairo context.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> ChartResult<()>
    where
        R: CairoContextRenderer,
    {
        let frame = self.build_render_frame()?;
        self.renderer.render_on_cairo_context(context, &frame)
    }

    /// Feeds one pointer event to the bar highlight state machine.
    ///
    /// Non-bar plots ignore gestures and return no events.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> ChartResult<HighlightEvents> {
        if !matches!(self.plot_type, PlotType::Bar { .. }) {
            return Ok(HighlightEvents::new());
        }
        self.ensure_pass()?;
        let (cells, bounds) = match (&self.cache.bars, self.cache.data_region) {
            (Some(bars), Some(region)) => (bars.hit_targets(), region),
            _ => (Vec::new(), Rect::default()),
        };
        let events = self.highlight.handle(event, &cells, bounds);

        for highlight_event in &events {
            match *highlight_event {
                HighlightEvent::Began => {
                    if let Some(view) = bar_view(&mut self.plot_type) {
                        view.update_with_chart_data(&self.data);
                    }
                }
                HighlightEvent::Entered(index) => {
                    if let (Some(view), Some(entry)) =
                        (bar_view(&mut self.plot_type), self.data.entries.get(index))
                    {
                        view.update_with_bar_data(entry);
                        view.update_value(Some(highlight_value_text(entry)));
                        view.set_visible(true);
                    }
                }
                HighlightEvent::Left(_) => {}
                HighlightEvent::Ended => {
                    if let Some(view) = bar_view(&mut self.plot_type) {
                        view.set_visible(false);
                        view.update_value(None);
                    }
                }
            }
        }
        if let Some(delegate) = self.delegate.as_deref_mut() {
            notify_delegate(delegate, &events, &self.data.entries);
        }
        Ok(events)
    }

    /// Moves the host clock forward and runs the callbacks that came due.
    pub fn advance_time(&mut self, elapsed: Duration) -> Vec<ChartAction> {
        let fired = self.callbacks.advance(elapsed);
        for action in &fired {
            match action {
                ChartAction::DisableInitialAnimation => {
                    self.initial_animation = false;
                    debug!("initial animation disabled");
                }
            }
        }
        fired
    }

    /// Deterministic state summary built from a fresh layout pass.
    pub fn snapshot(&mut self) -> ChartResult<ChartSnapshot> {
        self.build_render_frame()?;
        let Some(plane) = self.cache.plane.as_ref() else {
            return Err(ChartError::InvalidData(
                "layout pass produced no plane".to_owned(),
            ));
        };
        let bar_cells = self
            .cache
            .bars
            .as_ref()
            .map(BarGeometry::hit_rects)
            .unwrap_or_default();
        Ok(ChartSnapshot::from_pass(
            self.viewport,
            self.plot_type.kind(),
            &self.data,
            plane,
            bar_cells,
            self.highlight.highlighted_index(),
            self.initial_animation,
        ))
    }

    pub fn snapshot_json_contract_v1_pretty(&mut self) -> ChartResult<String> {
        self.snapshot()?.to_json_contract_v1_pretty()
    }

    fn ensure_pass(&mut self) -> ChartResult<()> {
        if self.cache.data_region.is_none() {
            self.build_render_frame()?;
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        self.cache = PassCache::default();
    }

    fn refresh_granularity_y(&mut self) {
        if self.derive_granularity_y {
            let kind = self.plot_type.kind();
            self.config.granularity_y = self.data.default_y_granularity(kind);
            trace!(granularity_y = self.config.granularity_y, "derived y granularity");
        }
    }
}

fn bar_view(plot_type: &mut PlotType) -> Option<&mut (dyn HighlightedView + 'static)> {
    match plot_type {
        PlotType::Bar {
            highlight_view: Some(view),
            ..
        } => Some(view.as_mut()),
        _ => None,
    }
}

fn validate_override(value: Option<f64>) -> ChartResult<()> {
    match value {
        Some(value) if !value.is_finite() => Err(ChartError::InvalidData(
            "plot range override must be finite".to_owned(),
        )),
        _ => Ok(()),
    }
}

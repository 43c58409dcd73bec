use cairo::{Context, Format, ImageSurface, LinearGradient};
use pango::FontDescription;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::core::{KeyColor, PathCommand, Rect, Size};
use crate::error::{ChartError, ChartResult};
use crate::layout::TextMeasurer;
use crate::render::{
    Color, Corners, Font, FontWeight, GradientPaint, LineCap, RectPrimitive, RenderFrame, Renderer,
    StrokePrimitive, TextHAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub fills_drawn: usize,
    pub rects_drawn: usize,
    pub strokes_drawn: usize,
    pub ellipses_drawn: usize,
    pub texts_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a GTK `DrawingArea` callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// This renderer supports two modes:
/// - offscreen image-surface rendering through `Renderer::render`
/// - in-place rendering on an external Cairo context through
///   `CairoContextRenderer`
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::WHITE,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.clear_color.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();

        for fill in &frame.fills {
            context.new_path();
            append_path(context, fill.path.commands());
            apply_paint(context, &fill.paint)?;
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill path", err))?;
            stats.fills_drawn += 1;
        }

        for rect in &frame.rects {
            context.new_path();
            append_rect_path(context, rect);
            let paint = GradientPaint::new(rect.fill.clone(), rect.rect, rect_is_vertical(rect));
            apply_paint(context, &paint)?;
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            stats.rects_drawn += 1;
        }

        for stroke in &frame.strokes {
            draw_stroke(context, stroke)?;
            stats.strokes_drawn += 1;
        }

        for ellipse in &frame.ellipses {
            let rect = ellipse.rect;
            context.new_path();
            context
                .save()
                .map_err(|err| map_backend_error("failed to save context", err))?;
            context.translate(rect.mid_x(), rect.mid_y());
            context.scale(
                (rect.width / 2.0).max(f64::EPSILON),
                (rect.height / 2.0).max(f64::EPSILON),
            );
            context.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
            context
                .restore()
                .map_err(|err| map_backend_error("failed to restore context", err))?;
            apply_color(context, ellipse.fill);
            match &ellipse.stroke {
                Some(style) => {
                    context
                        .fill_preserve()
                        .map_err(|err| map_backend_error("failed to fill ellipse", err))?;
                    apply_color(context, style.color);
                    context.set_line_width(style.width);
                    context
                        .stroke()
                        .map_err(|err| map_backend_error("failed to stroke ellipse", err))?;
                }
                None => context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill ellipse", err))?,
            }
            stats.ellipses_drawn += 1;
        }

        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            layout.set_font_description(Some(&font_description(text.font)));
            layout.set_text(&text.text);

            let (text_width, _text_height) = layout.pixel_size();
            let x = match text.h_align {
                TextHAlign::Left => text.x,
                TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                TextHAlign::Right => text.x - f64::from(text_width),
            };

            apply_color(context, text.color);
            context.move_to(x, text.y);
            pangocairo::functions::show_layout(context, &layout);
            stats.texts_drawn += 1;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame)
    }
}

/// Measures labels with the same Pango layout path the renderer draws with.
#[derive(Debug)]
pub struct PangoTextMeasurer {
    context: Context,
}

impl PangoTextMeasurer {
    pub fn new() -> ChartResult<Self> {
        let surface = ImageSurface::create(Format::ARgb32, 1, 1)
            .map_err(|err| map_backend_error("failed to create measuring surface", err))?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create measuring context", err))?;
        Ok(Self { context })
    }
}

impl TextMeasurer for PangoTextMeasurer {
    fn measure(&self, text: &str, font: Font) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let layout = pangocairo::functions::create_layout(&self.context);
        layout.set_font_description(Some(&font_description(font)));
        layout.set_text(text);
        let (width, height) = layout.pixel_size();
        Size::new(f64::from(width), f64::from(height))
    }
}

fn font_description(font: Font) -> FontDescription {
    let mut description = FontDescription::new();
    description.set_family("Sans");
    description.set_absolute_size(font.size_px * f64::from(pango::SCALE));
    description.set_weight(match font.weight {
        FontWeight::Regular => pango::Weight::Normal,
        FontWeight::Medium => pango::Weight::Medium,
        FontWeight::Semibold => pango::Weight::Semibold,
        FontWeight::Bold => pango::Weight::Bold,
    });
    description
}

fn draw_stroke(context: &Context, stroke: &StrokePrimitive) -> ChartResult<()> {
    let style = &stroke.style;
    context.new_path();
    append_path(context, stroke.path.commands());
    context.set_line_width(style.width);
    context.set_line_cap(match style.cap {
        LineCap::Butt => cairo::LineCap::Butt,
        LineCap::Round => cairo::LineCap::Round,
        LineCap::Square => cairo::LineCap::Square,
    });
    context.set_line_join(cairo::LineJoin::Round);
    context.set_dash(&style.dash, 0.0);
    match &stroke.gradient {
        Some(gradient) => apply_paint(context, gradient)?,
        None => apply_color(context, style.color),
    }
    let result = context.stroke();
    context.set_dash(&[], 0.0);
    result.map_err(|err| map_backend_error("failed to stroke path", err))
}

fn append_path(context: &Context, commands: &[PathCommand]) {
    for command in commands {
        match *command {
            PathCommand::MoveTo(point) => context.move_to(point.x, point.y),
            PathCommand::LineTo(point) => context.line_to(point.x, point.y),
            PathCommand::CubicTo {
                control1,
                control2,
                to,
            } => context.curve_to(control1.x, control1.y, control2.x, control2.y, to.x, to.y),
            PathCommand::Close => context.close_path(),
        }
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn apply_paint(context: &Context, paint: &GradientPaint) -> ChartResult<()> {
    let stops = match &paint.color {
        KeyColor::Solid(color) => {
            apply_color(context, *color);
            return Ok(());
        }
        KeyColor::Gradient { start, end } => vec![(0.0, *start), (1.0, *end)],
        KeyColor::Segmented {
            colors, locations, ..
        } => segmented_stops(colors, locations.as_deref()),
    };

    let bounds: Rect = paint.bounds;
    let gradient = if paint.vertical {
        LinearGradient::new(bounds.min_x(), bounds.min_y(), bounds.min_x(), bounds.max_y())
    } else {
        LinearGradient::new(bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.min_y())
    };
    for (offset, color) in stops {
        gradient.add_color_stop_rgba(offset, color.red, color.green, color.blue, color.alpha);
    }
    context
        .set_source(&gradient)
        .map_err(|err| map_backend_error("failed to set gradient source", err))
}

/// Hard-edged bands: each colour holds from its location up to the next one.
fn segmented_stops(colors: &[Color], locations: Option<&[f64]>) -> Vec<(f64, Color)> {
    let count = colors.len();
    let start_of = |index: usize| match locations {
        Some(locations) => locations[index].clamp(0.0, 1.0),
        None => index as f64 / count as f64,
    };
    let mut stops = Vec::with_capacity(count * 2);
    for (index, color) in colors.iter().enumerate() {
        let end = if index + 1 < count {
            start_of(index + 1)
        } else {
            1.0
        };
        stops.push((start_of(index), *color));
        stops.push((end, *color));
    }
    stops
}

fn rect_is_vertical(rect: &RectPrimitive) -> bool {
    matches!(rect.fill, KeyColor::Segmented { vertical: true, .. })
}

fn append_rect_path(context: &Context, rect: &RectPrimitive) {
    let bounds = rect.rect;
    if rect.corner_radius <= 0.0 || rect.corners == Corners::NONE {
        context.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);
        return;
    }

    let radius = rect
        .corner_radius
        .min(bounds.width * 0.5)
        .min(bounds.height * 0.5);
    let radius_for = |rounded: bool| if rounded { radius } else { 0.0 };
    let left = bounds.min_x();
    let top = bounds.min_y();
    let right = bounds.max_x();
    let bottom = bounds.max_y();

    let top_right = radius_for(rect.corners.top_right);
    let bottom_right = radius_for(rect.corners.bottom_right);
    let bottom_left = radius_for(rect.corners.bottom_left);
    let top_left = radius_for(rect.corners.top_left);

    context.new_sub_path();
    context.arc(right - top_right, top + top_right, top_right, -FRAC_PI_2, 0.0);
    context.arc(right - bottom_right, bottom - bottom_right, bottom_right, 0.0, FRAC_PI_2);
    context.arc(left + bottom_left, bottom - bottom_left, bottom_left, FRAC_PI_2, PI);
    context.arc(left + top_left, top + top_left, top_left, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}

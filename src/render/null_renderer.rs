use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless usage.
///
/// It still validates frame content so tests catch invalid geometry without a
/// real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_stroke_count: usize,
    pub last_fill_count: usize,
    pub last_rect_count: usize,
    pub last_ellipse_count: usize,
    pub last_text_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_stroke_count = frame.strokes.len();
        self.last_fill_count = frame.fills.len();
        self.last_rect_count = frame.rects.len();
        self.last_ellipse_count = frame.ellipses.len();
        self.last_text_count = frame.texts.len();
        Ok(())
    }
}

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    EllipsePrimitive, FillPrimitive, RectPrimitive, StrokePrimitive, TextPrimitive,
};

/// Backend-agnostic scene for one chart draw pass.
///
/// Backends paint fills, then rects, then strokes, then ellipses and
/// finally texts, each list in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub fills: Vec<FillPrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub strokes: Vec<StrokePrimitive>,
    pub ellipses: Vec<EllipsePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            fills: Vec::new(),
            rects: Vec::new(),
            strokes: Vec::new(),
            ellipses: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: StrokePrimitive) -> Self {
        self.strokes.push(stroke);
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: FillPrimitive) -> Self {
        self.fills.push(fill);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    #[must_use]
    pub fn with_ellipse(mut self, ellipse: EllipsePrimitive) -> Self {
        self.ellipses.push(ellipse);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    /// Moves every primitive of `other` behind the ones already stored.
    pub fn extend(&mut self, other: Self) {
        self.fills.extend(other.fills);
        self.rects.extend(other.rects);
        self.strokes.extend(other.strokes);
        self.ellipses.extend(other.ellipses);
        self.texts.extend(other.texts);
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for fill in &self.fills {
            fill.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for stroke in &self.strokes {
            stroke.validate()?;
        }
        for ellipse in &self.ellipses {
            ellipse.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.fills.len()
            + self.rects.len()
            + self.strokes.len()
            + self.ellipses.len()
            + self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}

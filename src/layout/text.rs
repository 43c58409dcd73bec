use crate::core::Size;
pub use crate::render::{Font, FontWeight};

/// Line height relative to the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Measures the rendered extent of a single-line string.
///
/// Layout consults the measurer for every label it places, so results must be
/// deterministic for identical input within one pass.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: Font) -> Size;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font: Font) -> Size {
        (**self).measure(text, font)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn measure(&self, text: &str, font: Font) -> Size {
        (**self).measure(text, font)
    }
}

/// Backend-independent width estimate from per-glyph unit widths.
///
/// Empty strings measure as zero; anything else is at least one font size
/// wide and one line tall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeuristicTextMeasurer;

impl HeuristicTextMeasurer {
    #[must_use]
    pub fn text_width(text: &str, font: Font) -> f64 {
        let units = text.chars().fold(0.0, |acc, ch| {
            acc + match ch {
                '0'..='9' => 0.62,
                '.' | ',' => 0.34,
                '-' | '+' | '%' => 0.42,
                ' ' => 0.33,
                _ => 0.58,
            }
        });
        (units * font.size_px * weight_factor(font.weight)).max(font.size_px)
    }
}

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font: Font) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        Size::new(
            Self::text_width(text, font),
            font.size_px * LINE_HEIGHT_FACTOR,
        )
    }
}

fn weight_factor(weight: FontWeight) -> f64 {
    match weight {
        FontWeight::Regular => 1.0,
        FontWeight::Medium => 1.02,
        FontWeight::Semibold => 1.05,
        FontWeight::Bold => 1.08,
    }
}

#[cfg(test)]
mod tests {
    use super::{Font, HeuristicTextMeasurer, TextMeasurer};
    use crate::core::Size;

    #[test]
    fn digits_are_wider_than_separators() {
        let font = Font::regular(10.0);
        let size = HeuristicTextMeasurer.measure("1,5", font);
        assert!((size.width - 15.8).abs() < 1e-9);
        assert!((size.height - 12.0).abs() < 1e-9);
    }

    #[test]
    fn short_text_is_floored_at_font_size_and_empty_is_zero() {
        let font = Font::regular(12.0);
        assert_eq!(HeuristicTextMeasurer.measure("1", font).width, 12.0);
        assert_eq!(HeuristicTextMeasurer.measure("", font), Size::ZERO);
    }
}

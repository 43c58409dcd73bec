use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Linear value axis mapped onto an inverted (downward growing) pixel span.
///
/// `min` lands on the bottom edge of the span and `max` on its top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    min: f64,
    max: f64,
    pixel_top: f64,
    pixel_height: f64,
}

impl LinearScale {
    pub fn new(min: f64, max: f64, pixel_top: f64, pixel_height: f64) -> ChartResult<Self> {
        if !min.is_finite() || !max.is_finite() || min == max {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !pixel_top.is_finite() || !pixel_height.is_finite() {
            return Err(ChartError::InvalidData(
                "scale pixel span must be finite".to_owned(),
            ));
        }

        Ok(Self {
            min,
            max,
            pixel_top,
            pixel_height,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.min, self.max)
    }

    #[must_use]
    pub fn pixel_span(self) -> (f64, f64) {
        (self.pixel_top, self.pixel_top + self.pixel_height)
    }

    /// Ratio of `value` inside the domain, 0 at `min` and 1 at `max`.
    #[must_use]
    pub fn ratio(self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    #[must_use]
    pub fn value_to_pixel(self, value: f64) -> f64 {
        self.pixel_top + self.pixel_height - self.pixel_height * self.ratio(value)
    }

    #[must_use]
    pub fn pixel_to_value(self, pixel: f64) -> f64 {
        if self.pixel_height == 0.0 {
            return self.min;
        }
        let ratio = (self.pixel_top + self.pixel_height - pixel) / self.pixel_height;
        self.min + ratio * (self.max - self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::LinearScale;

    #[test]
    fn domain_edges_map_to_span_edges() {
        let scale = LinearScale::new(0.0, 70.0, 20.0, 140.0).expect("valid scale");
        assert_eq!(scale.value_to_pixel(0.0), 160.0);
        assert_eq!(scale.value_to_pixel(70.0), 20.0);
        assert_eq!(scale.value_to_pixel(35.0), 90.0);
    }

    #[test]
    fn degenerate_domain_is_rejected() {
        assert!(LinearScale::new(5.0, 5.0, 0.0, 100.0).is_err());
        assert!(LinearScale::new(f64::NAN, 5.0, 0.0, 100.0).is_err());
    }
}

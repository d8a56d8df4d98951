//! Text measurement for legend layout.

/// Fraction of the font size one character occupies, on average.
pub const CHAR_WIDTH_FACTOR: f64 = 0.60;

/// Platform text measurement.
///
/// Implementations return `None` when measurement is unavailable (e.g. a detached
/// document); callers fall back to [`estimate_text_width_px`].
pub trait TextMeasurer {
    fn measure_width(&self, text: &str, font_px: f64) -> Option<f64>;
}

/// Heuristic: estimate pixel width of text from its character count.
pub fn estimate_text_width_px(text: &str, font_px: f64) -> f64 {
    text.chars().count() as f64 * font_px.max(0.0) * CHAR_WIDTH_FACTOR
}

/// Measured width, or the estimate when measurement fails or reports a zero width.
pub fn measure_or_estimate(measurer: &dyn TextMeasurer, text: &str, font_px: f64) -> f64 {
    match measurer.measure_width(text, font_px) {
        Some(w) if w.is_finite() && w > 0.0 => w,
        _ => estimate_text_width_px(text, font_px),
    }
}

/// Measurer that always uses the character-count estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasurer;

impl TextMeasurer for ApproximateMeasurer {
    fn measure_width(&self, text: &str, font_px: f64) -> Option<f64> {
        Some(estimate_text_width_px(text, font_px))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Detached;

    impl TextMeasurer for Detached {
        fn measure_width(&self, _text: &str, _font_px: f64) -> Option<f64> {
            Some(0.0)
        }
    }

    #[test]
    fn zero_width_falls_back_to_estimate() {
        let w = measure_or_estimate(&Detached, "Germany", 10.0);
        assert!((w - 42.0).abs() < 1e-9);
    }

    #[test]
    fn estimate_counts_chars_not_bytes() {
        assert_eq!(
            estimate_text_width_px("Côte", 10.0),
            estimate_text_width_px("Cote", 10.0)
        );
    }
}

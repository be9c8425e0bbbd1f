//! Text measurement

/// Measured extent of a run of text
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
}

/// Intrinsic text sizing, usually provided by the host's font stack
pub trait TextMeasurer {
    fn measure(
        &self,
        text: &str,
        font_family: &str,
        font_size: f32,
        font_weight: &str,
        font_style: &str,
    ) -> TextMetrics;
}

/// Fixed-advance approximation for hosts without fonts
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasurer;

impl TextMeasurer for ApproxTextMeasurer {
    fn measure(
        &self,
        text: &str,
        _font_family: &str,
        font_size: f32,
        _font_weight: &str,
        _font_style: &str,
    ) -> TextMetrics {
        let chars = text.chars().count();
        if chars == 0 {
            return TextMetrics::default();
        }
        TextMetrics {
            width: chars as f32 * font_size * 0.6,
            height: font_size * 1.2,
        }
    }
}

/// Collapse whitespace runs to single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_measure() {
        let m = ApproxTextMeasurer.measure("abcd", "serif", 10.0, "normal", "normal");
        assert_eq!(m.width, 24.0);
        assert_eq!(m.height, 12.0);
        assert_eq!(
            ApproxTextMeasurer.measure("", "serif", 10.0, "normal", "normal"),
            TextMetrics::default()
        );
    }

    #[test]
    fn test_collapse() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace(" \n "), "");
    }
}

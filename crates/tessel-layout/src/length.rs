//! Length values
//!
//! Computed styles hold raw text; layout reads lengths out of it here.

use tessel_dom::ComputedStyle;

const ROOT_FONT_SIZE: f32 = 16.0;

/// A length as far as layout cares
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f32),
    Percent(f32),
    Auto,
    /// `none`, used by `max-width`/`max-height`
    None,
}

impl Length {
    /// Parse a length. `em` is relative to `font_size`; anything we
    /// cannot read is treated as `auto`.
    pub fn parse(value: &str, font_size: f32) -> Length {
        let value = value.trim().to_ascii_lowercase();
        let number = |s: &str| s.trim().parse::<f32>().ok().filter(|n| n.is_finite());

        match value.as_str() {
            "auto" | "" => return Length::Auto,
            "none" => return Length::None,
            "thin" => return Length::Px(1.0),
            "medium" => return Length::Px(3.0),
            "thick" => return Length::Px(5.0),
            _ => {}
        }

        let parsed = if let Some(n) = value.strip_suffix("px") {
            number(n).map(Length::Px)
        } else if let Some(n) = value.strip_suffix('%') {
            number(n).map(Length::Percent)
        } else if let Some(n) = value.strip_suffix("rem") {
            number(n).map(|n| Length::Px(n * ROOT_FONT_SIZE))
        } else if let Some(n) = value.strip_suffix("em") {
            number(n).map(|n| Length::Px(n * font_size))
        } else if let Some(n) = value.strip_suffix("pt") {
            number(n).map(|n| Length::Px(n * 4.0 / 3.0))
        } else {
            number(&value).map(Length::Px)
        };
        parsed.unwrap_or(Length::Auto)
    }

    /// Absolute value against a percentage basis, if definite
    pub fn resolve(self, basis: Option<f32>) -> Option<f32> {
        match self {
            Length::Px(px) => Some(px),
            Length::Percent(p) => basis.map(|b| b * p / 100.0),
            Length::Auto | Length::None => None,
        }
    }

    pub fn is_auto(self) -> bool {
        self == Length::Auto
    }
}

/// Font size of a computed style in px
pub fn font_size(style: &ComputedStyle) -> f32 {
    let Some(value) = style.get("font-size") else {
        return ROOT_FONT_SIZE;
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "xx-small" => 9.0,
        "x-small" => 10.0,
        "small" => 13.0,
        "medium" => 16.0,
        "large" => 18.0,
        "x-large" => 24.0,
        "xx-large" => 32.0,
        _ => Length::parse(value, ROOT_FONT_SIZE)
            .resolve(Some(ROOT_FONT_SIZE))
            .unwrap_or(ROOT_FONT_SIZE),
    }
}

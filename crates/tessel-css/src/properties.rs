//! CSS Property Definitions
//!
//! Every longhand the engine knows about: its name, initial value, whether
//! it inherits and whether the renderer needs to hear about changes.

/// Property identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PropertyId {
    // Display & Layout
    Display,
    FlexDirection,
    FlexWrap,
    JustifyContent,
    AlignItems,
    AlignSelf,
    FlexGrow,
    FlexShrink,
    FlexBasis,

    // Box Model
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,

    // Border
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    BorderStyle,
    BorderColor,
    BorderRadius,

    // Colors & Background
    Color,
    BackgroundColor,
    Opacity,

    // Text
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    LineHeight,
    TextAlign,
    TextDecoration,
    LetterSpacing,
    WordSpacing,
    WhiteSpace,
    Direction,

    // Visual
    Overflow,
    Visibility,
    ZIndex,
    Cursor,
}

struct PropertyInfo {
    name: &'static str,
    initial: &'static str,
    inherited: bool,
    render: bool,
}

const fn info(name: &'static str, initial: &'static str, inherited: bool, render: bool) -> PropertyInfo {
    PropertyInfo {
        name,
        initial,
        inherited,
        render,
    }
}

impl PropertyId {
    pub const ALL: [PropertyId; 48] = [
        Self::Display,
        Self::FlexDirection,
        Self::FlexWrap,
        Self::JustifyContent,
        Self::AlignItems,
        Self::AlignSelf,
        Self::FlexGrow,
        Self::FlexShrink,
        Self::FlexBasis,
        Self::Width,
        Self::Height,
        Self::MinWidth,
        Self::MinHeight,
        Self::MaxWidth,
        Self::MaxHeight,
        Self::MarginTop,
        Self::MarginRight,
        Self::MarginBottom,
        Self::MarginLeft,
        Self::PaddingTop,
        Self::PaddingRight,
        Self::PaddingBottom,
        Self::PaddingLeft,
        Self::BorderTopWidth,
        Self::BorderRightWidth,
        Self::BorderBottomWidth,
        Self::BorderLeftWidth,
        Self::BorderStyle,
        Self::BorderColor,
        Self::BorderRadius,
        Self::Color,
        Self::BackgroundColor,
        Self::Opacity,
        Self::FontFamily,
        Self::FontSize,
        Self::FontWeight,
        Self::FontStyle,
        Self::LineHeight,
        Self::TextAlign,
        Self::TextDecoration,
        Self::LetterSpacing,
        Self::WordSpacing,
        Self::WhiteSpace,
        Self::Direction,
        Self::Overflow,
        Self::Visibility,
        Self::ZIndex,
        Self::Cursor,
    ];

    fn info(self) -> PropertyInfo {
        use PropertyId::*;
        match self {
            Display => info("display", "inline", false, true),
            FlexDirection => info("flex-direction", "column", false, false),
            FlexWrap => info("flex-wrap", "nowrap", false, false),
            JustifyContent => info("justify-content", "flex-start", false, false),
            AlignItems => info("align-items", "stretch", false, false),
            AlignSelf => info("align-self", "auto", false, false),
            FlexGrow => info("flex-grow", "0", false, false),
            FlexShrink => info("flex-shrink", "1", false, false),
            FlexBasis => info("flex-basis", "auto", false, false),

            Width => info("width", "auto", false, false),
            Height => info("height", "auto", false, false),
            MinWidth => info("min-width", "auto", false, false),
            MinHeight => info("min-height", "auto", false, false),
            MaxWidth => info("max-width", "none", false, false),
            MaxHeight => info("max-height", "none", false, false),
            MarginTop => info("margin-top", "0", false, false),
            MarginRight => info("margin-right", "0", false, false),
            MarginBottom => info("margin-bottom", "0", false, false),
            MarginLeft => info("margin-left", "0", false, false),
            PaddingTop => info("padding-top", "0", false, false),
            PaddingRight => info("padding-right", "0", false, false),
            PaddingBottom => info("padding-bottom", "0", false, false),
            PaddingLeft => info("padding-left", "0", false, false),

            BorderTopWidth => info("border-top-width", "0", false, true),
            BorderRightWidth => info("border-right-width", "0", false, true),
            BorderBottomWidth => info("border-bottom-width", "0", false, true),
            BorderLeftWidth => info("border-left-width", "0", false, true),
            BorderStyle => info("border-style", "none", false, true),
            BorderColor => info("border-color", "currentcolor", false, true),
            BorderRadius => info("border-radius", "0", false, true),

            Color => info("color", "black", true, true),
            BackgroundColor => info("background-color", "transparent", false, true),
            Opacity => info("opacity", "1", false, true),

            FontFamily => info("font-family", "sans-serif", true, true),
            FontSize => info("font-size", "16px", true, true),
            FontWeight => info("font-weight", "normal", true, true),
            FontStyle => info("font-style", "normal", true, true),
            LineHeight => info("line-height", "normal", true, true),
            TextAlign => info("text-align", "start", true, true),
            TextDecoration => info("text-decoration", "none", false, true),
            LetterSpacing => info("letter-spacing", "normal", true, true),
            WordSpacing => info("word-spacing", "normal", true, true),
            WhiteSpace => info("white-space", "normal", true, true),
            Direction => info("direction", "ltr", true, true),

            Overflow => info("overflow", "visible", false, true),
            Visibility => info("visibility", "visible", true, true),
            ZIndex => info("z-index", "auto", false, true),
            Cursor => info("cursor", "auto", true, true),
        }
    }

    /// Parse a property name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn initial_value(self) -> &'static str {
        self.info().initial
    }

    pub fn is_inherited(self) -> bool {
        self.info().inherited
    }

    /// Whether the renderer draws from this property. Layout-only
    /// properties reach it through geometry instead.
    pub fn is_render_relevant(self) -> bool {
        self.info().render
    }
}

/// Whether a property (by name) inherits from the parent by default
pub fn is_inherited(name: &str) -> bool {
    PropertyId::from_name(name).is_some_and(PropertyId::is_inherited)
}

/// Initial value for a known property
pub fn initial_value(name: &str) -> Option<&'static str> {
    PropertyId::from_name(name).map(PropertyId::initial_value)
}

/// Unknown properties are forwarded to the renderer as-is
pub fn is_render_relevant(name: &str) -> bool {
    PropertyId::from_name(name).is_none_or(PropertyId::is_render_relevant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inherited_set() {
        let inherited: Vec<&str> = PropertyId::ALL
            .iter()
            .filter(|p| p.is_inherited())
            .map(|p| p.name())
            .collect();
        for name in [
            "color",
            "font-size",
            "font-family",
            "font-weight",
            "font-style",
            "line-height",
            "text-align",
            "visibility",
            "cursor",
            "direction",
            "letter-spacing",
            "word-spacing",
            "white-space",
        ] {
            assert!(inherited.contains(&name), "{name} should inherit");
        }
        assert!(!is_inherited("margin-top"));
        assert!(!is_inherited("background-color"));
    }

    #[test]
    fn test_initial_values() {
        assert_eq!(initial_value("display"), Some("inline"));
        assert_eq!(initial_value("flex-direction"), Some("column"));
        assert_eq!(initial_value("FONT-SIZE"), Some("16px"));
        assert_eq!(initial_value("no-such-thing"), None);
    }

    #[test]
    fn test_render_relevance() {
        assert!(is_render_relevant("color"));
        assert!(!is_render_relevant("width"));
        assert!(is_render_relevant("--custom"));
    }
}

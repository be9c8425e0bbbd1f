//! Shorthand expansion
//!
//! The cascade works on longhands only, so shorthands are split before
//! they compete with longhand declarations.

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

/// Expand a declaration into `(longhand, value)` pairs. Anything that is
/// not a known shorthand passes through unchanged.
pub fn expand(property: &str, value: &str) -> Vec<(String, String)> {
    let value = value.trim();
    match property {
        "margin" => four_sides(value, |side| format!("margin-{side}")),
        "padding" => four_sides(value, |side| format!("padding-{side}")),
        "border-width" => four_sides(value, |side| format!("border-{side}-width")),
        "border" => border(value),
        "flex" => flex(value),
        "background" => vec![("background-color".to_string(), value.to_string())],
        _ => vec![(property.to_string(), value.to_string())],
    }
}

/// Whether `property` is expanded by [`expand`]
pub fn is_shorthand(property: &str) -> bool {
    matches!(
        property,
        "margin" | "padding" | "border-width" | "border" | "flex" | "background"
    )
}

fn is_wide_keyword(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "inherit" | "initial" | "unset"
    )
}

/// `a`, `a b`, `a b c` or `a b c d` in top/right/bottom/left order
fn four_sides(value: &str, name: impl Fn(&str) -> String) -> Vec<(String, String)> {
    let parts: Vec<&str> = value.split_ascii_whitespace().collect();
    let values: [&str; 4] = match parts[..] {
        [all] => [all, all, all, all],
        [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
        [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
        [top, right, bottom, left] => [top, right, bottom, left],
        _ => {
            tracing::debug!(value, "ignoring malformed box shorthand");
            return Vec::new();
        }
    };
    SIDES
        .iter()
        .zip(values)
        .map(|(side, v)| (name(side), v.to_string()))
        .collect()
}

fn border(value: &str) -> Vec<(String, String)> {
    let mut width = None;
    let mut style = None;
    let mut color = None;
    if is_wide_keyword(value) {
        width = Some(value);
        style = Some(value);
        color = Some(value);
    } else {
        for token in value.split_ascii_whitespace() {
            let lower = token.to_ascii_lowercase();
            if BORDER_STYLES.contains(&lower.as_str()) {
                style = Some(token);
            } else if matches!(lower.as_str(), "thin" | "medium" | "thick")
                || token.starts_with(|c: char| c.is_ascii_digit() || c == '.')
            {
                width = Some(token);
            } else {
                color = Some(token);
            }
        }
    }

    let mut out: Vec<(String, String)> = SIDES
        .iter()
        .map(|side| {
            (
                format!("border-{side}-width"),
                width.unwrap_or("medium").to_string(),
            )
        })
        .collect();
    out.push(("border-style".to_string(), style.unwrap_or("none").to_string()));
    out.push((
        "border-color".to_string(),
        color.unwrap_or("currentcolor").to_string(),
    ));
    out
}

/// `flex: none | auto | <grow> [<shrink>] [<basis>]`
fn flex(value: &str) -> Vec<(String, String)> {
    let (grow, shrink, basis) = match value.to_ascii_lowercase().as_str() {
        "none" => ("0", "0", "auto"),
        "auto" => ("1", "1", "auto"),
        "initial" => ("0", "1", "auto"),
        v if is_wide_keyword(v) => (value, value, value),
        _ => {
            let mut numbers = Vec::new();
            let mut basis = None;
            for token in value.split_ascii_whitespace() {
                if token.parse::<f32>().is_ok() && numbers.len() < 2 {
                    numbers.push(token);
                } else {
                    basis = Some(token);
                }
            }
            match numbers.as_slice() {
                [grow] => (*grow, "1", basis.unwrap_or("0%")),
                [grow, shrink] => (*grow, *shrink, basis.unwrap_or("0%")),
                _ => ("1", "1", basis.unwrap_or("auto")),
            }
        }
    };
    vec![
        ("flex-grow".to_string(), grow.to_string()),
        ("flex-shrink".to_string(), shrink.to_string()),
        ("flex-basis".to_string(), basis.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_margin_forms() {
        let one = expand("margin", "4px");
        assert_eq!(one.len(), 4);
        assert_eq!(get(&one, "margin-left"), Some("4px"));

        let two = expand("margin", "1px 2px");
        assert_eq!(get(&two, "margin-top"), Some("1px"));
        assert_eq!(get(&two, "margin-right"), Some("2px"));
        assert_eq!(get(&two, "margin-bottom"), Some("1px"));

        let three = expand("padding", "1px 2px 3px");
        assert_eq!(get(&three, "padding-bottom"), Some("3px"));
        assert_eq!(get(&three, "padding-left"), Some("2px"));

        assert!(expand("margin", "1px 2px 3px 4px 5px").is_empty());
    }

    #[test]
    fn test_flex_forms() {
        let none = expand("flex", "none");
        assert_eq!(get(&none, "flex-shrink"), Some("0"));

        let single = expand("flex", "2");
        assert_eq!(get(&single, "flex-grow"), Some("2"));
        assert_eq!(get(&single, "flex-shrink"), Some("1"));
        assert_eq!(get(&single, "flex-basis"), Some("0%"));

        let full = expand("flex", "1 0 100px");
        assert_eq!(get(&full, "flex-shrink"), Some("0"));
        assert_eq!(get(&full, "flex-basis"), Some("100px"));
    }

    #[test]
    fn test_border_and_passthrough() {
        let border = expand("border", "2px solid red");
        assert_eq!(get(&border, "border-top-width"), Some("2px"));
        assert_eq!(get(&border, "border-style"), Some("solid"));
        assert_eq!(get(&border, "border-color"), Some("red"));

        assert_eq!(
            expand("color", " red "),
            vec![("color".to_string(), "red".to_string())]
        );
        assert_eq!(get(&expand("background", "#fff"), "background-color"), Some("#fff"));
    }
}

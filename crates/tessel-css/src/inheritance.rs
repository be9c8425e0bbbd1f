//! Inheritance
//!
//! Fills in every property the cascade left unset: inherited properties
//! copy the parent's computed value, the rest take their initial value.
//! `inherit` and `initial` keywords are resolved here too.

use tessel_dom::{ComputedStyle, StyleMap};

use crate::properties::{self, PropertyId};

/// Complete a cascaded map into a computed style
pub fn apply_inheritance(cascaded: &StyleMap, parent: Option<&ComputedStyle>) -> ComputedStyle {
    let from_parent = |property: &str| -> Option<String> {
        parent
            .and_then(|p| p.get(property))
            .map(str::to_string)
            .or_else(|| properties::initial_value(property).map(str::to_string))
    };
    let initial = |property: &str| properties::initial_value(property).map(str::to_string);

    let mut style = ComputedStyle::new();
    for property in PropertyId::ALL {
        let name = property.name();
        let value = match cascaded.get(name).map(String::as_str) {
            Some(v) => keyword(name, v, property.is_inherited(), &from_parent, &initial),
            None if property.is_inherited() => from_parent(name),
            None => Some(property.initial_value().to_string()),
        };
        if let Some(value) = value {
            style.set(name, value);
        }
    }

    // Properties we have no table entry for keep their cascaded value
    for (name, value) in cascaded {
        if PropertyId::from_name(name).is_some() {
            continue;
        }
        let value = keyword(name, value, false, &from_parent, &initial).unwrap_or_default();
        style.set(name.as_str(), value);
    }
    style
}

fn keyword(
    name: &str,
    value: &str,
    inherited: bool,
    from_parent: &impl Fn(&str) -> Option<String>,
    initial: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "inherit" => from_parent(name),
        "initial" => initial(name),
        "unset" if inherited => from_parent(name),
        "unset" => initial(name),
        _ => Some(value.to_string()),
    }
}

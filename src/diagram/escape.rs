//! Escaping identifiers and values for D2 source.

use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// Words D2 interprets as attributes rather than object keys.
static RESERVED_KEYWORDS: Lazy<AHashSet<&'static str>> = Lazy::new(|| {
    [
        // simple
        "label",
        "desc",
        "shape",
        "icon",
        "constraint",
        "tooltip",
        "link",
        "near",
        "width",
        "height",
        "direction",
        "top",
        "left",
        "grid-rows",
        "grid-columns",
        "grid-gap",
        "vertical-gap",
        "horizontal-gap",
        "class",
        "vars",
        "legend-label",
        // holders
        "style",
        "source-arrowhead",
        "target-arrowhead",
        // composite
        "classes",
        // boards
        "layers",
        "scenarios",
        "steps",
        // style attributes
        "opacity",
        "stroke",
        "fill",
        "fill-pattern",
        "stroke-width",
        "stroke-dash",
        "border-radius",
        "font",
        "font-size",
        "font-color",
        "bold",
        "italic",
        "underline",
        "animated",
        "shadow",
        "multiple",
        "3d",
        "double-border",
        "text-transform",
    ]
    .into_iter()
    .collect()
});

/// D2's reference to the enclosing container
const PARENT_REF: &str = "_";

/// Keys that can be emitted bare
static PLAIN_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]*$").unwrap());

/// Values that can be emitted bare
static PLAIN_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_ (),]*$").unwrap());

/// Case-insensitive reserved keyword check
pub fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(name.to_ascii_lowercase().as_str())
}

/// Escape one key segment (table, column or group name).
///
/// Reserved keywords are quoted with a trailing space, which D2 keeps as
/// part of the key so it is not read as the keyword. Names containing D2
/// syntax, and the parent reference `_`, are quoted. Everything else is
/// emitted verbatim.
pub fn escape_key(name: &str) -> String {
    if is_reserved_keyword(name) {
        format!("\"{} \"", escape_quoted(name))
    } else if name != PARENT_REF
        && PLAIN_KEY.is_match(name)
        && !name.contains("--")
        && !name.ends_with('-')
    {
        name.to_string()
    } else {
        format!("\"{}\"", escape_quoted(name))
    }
}

/// Escape a value such as a column type or a container label
pub fn escape_value(value: &str) -> String {
    if PLAIN_VALUE.is_match(value) && value == value.trim_end() {
        value.to_string()
    } else {
        format!("\"{}\"", escape_quoted(value))
    }
}

fn escape_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

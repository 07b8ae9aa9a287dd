//! Diagram generation.
//!
//! This module provides:
//! - An in-memory diagram tree ([`ir`]) built from tables or groups
//! - Identifier escaping for the D2 language
//! - Serialization of the tree to D2 source
//! - A JSON export of the annotated schema

pub mod builder;
pub mod d2;
pub mod escape;
pub mod ir;
pub mod json;

pub use builder::{build, table_edges};
pub use d2::to_d2;
pub use escape::{escape_key, escape_value, is_reserved_keyword};
pub use ir::Diagram;
pub use json::{to_json, SchemaJson};

use crate::palette::Theme;
use crate::schema::Group;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("failed to emit D2 source: {0}")]
    Emit(#[from] fmt::Error),
    #[error("failed to emit JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build the diagram for `groups` and serialize it to D2 source.
///
/// A single group renders flat; any other count renders grouped.
pub fn generate_d2(
    groups: &[Group],
    direction: Direction,
    theme: &Theme,
) -> Result<String, DiagramError> {
    let diagram = build(groups, direction, theme);
    Ok(to_d2(&diagram)?)
}

/// Overall flow of the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" | "bt" | "bottom-top" => Ok(Direction::Up),
            "down" | "tb" | "td" | "top-bottom" | "top-down" => Ok(Direction::Down),
            "left" | "rl" | "right-left" => Ok(Direction::Left),
            "right" | "lr" | "left-right" => Ok(Direction::Right),
            _ => Err(format!(
                "Unknown direction: {}. Valid options: up, down, left, right",
                s
            )),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Output format for the final artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// D2 source text
    D2,
    /// Rendered by the d2 binary
    #[default]
    Svg,
    Png,
    Pdf,
    /// Annotated schema for programmatic use
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "d2" => Ok(OutputFormat::D2),
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Valid options: d2, svg, png, pdf, json",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::D2 => "d2",
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Json => "json",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "d2" => Some(OutputFormat::D2),
            "svg" => Some(OutputFormat::Svg),
            "png" => Some(OutputFormat::Png),
            "pdf" => Some(OutputFormat::Pdf),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    /// Whether the d2 binary has to run to produce this format
    pub fn needs_render(&self) -> bool {
        matches!(
            self,
            OutputFormat::Svg | OutputFormat::Png | OutputFormat::Pdf
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!("down".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!("LR".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!("tb".parse::<Direction>().unwrap(), Direction::Down);
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::Left.to_string(), "left");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_extension("D2"), Some(OutputFormat::D2));
        assert_eq!(OutputFormat::from_extension("svg"), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::from_extension("dot"), None);
        assert!(OutputFormat::Png.needs_render());
        assert!(!OutputFormat::Json.needs_render());
    }
}

//! In-memory diagram tree.
//!
//! Names are stored raw; escaping happens when the tree is serialized.

use crate::diagram::Direction;
use crate::schema::KeyConstraint;

/// A complete diagram: style classes, shapes and connections
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub direction: Direction,
    pub classes: Vec<Class>,
    pub shapes: Vec<Shape>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    pub fn new(direction: Direction, classes: Vec<Class>) -> Self {
        Self {
            direction,
            classes,
            shapes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// All table shapes, top-level and inside groups, in emission order
    pub fn tables(&self) -> impl Iterator<Item = &TableShape> {
        self.shapes.iter().flat_map(|shape| match shape {
            Shape::Table(t) => std::slice::from_ref(t).iter(),
            Shape::Group(g) => g.tables.iter(),
            Shape::Anchor(_) => (&[] as &[TableShape]).iter(),
        })
    }

    pub fn table_count(&self) -> usize {
        self.tables().count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn column_count(&self) -> usize {
        self.tables().map(|t| t.rows.len()).sum()
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupShape> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Group(g) => Some(g),
            _ => None,
        })
    }
}

/// Style attributes; unset fields are not emitted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub font_color: Option<String>,
    pub opacity: Option<f32>,
    pub border_radius: Option<u32>,
    pub stroke_width: Option<u32>,
    pub bold: Option<bool>,
}

impl Style {
    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }
}

/// A reusable named style
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: &'static str,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Table(TableShape),
    Group(GroupShape),
    Anchor(AnchorShape),
}

/// A `sql_table` shape
#[derive(Debug, Clone, PartialEq)]
pub struct TableShape {
    pub key: String,
    pub style: Style,
    pub rows: Vec<Row>,
}

/// One column row of a table shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub data_type: String,
    pub constraint: Option<KeyConstraint>,
}

/// A labelled container holding tables
#[derive(Debug, Clone, PartialEq)]
pub struct GroupShape {
    pub key: String,
    pub label: String,
    pub class: Option<&'static str>,
    pub style: Style,
    pub tables: Vec<TableShape>,
}

/// A fixed-size shape with a literal label
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorShape {
    pub key: String,
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub style: Style,
}

/// Dotted path to an object, one raw segment per level
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

/// A directed connection between two objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: KeyPath,
    pub target: KeyPath,
    pub class: Option<&'static str>,
    pub stroke: String,
}

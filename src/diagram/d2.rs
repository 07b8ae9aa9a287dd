//! D2 source output for diagram trees.

use crate::diagram::escape::{escape_key, escape_value};
use crate::diagram::ir::{
    AnchorShape, Class, Diagram, Edge, GroupShape, KeyPath, Row, Shape, Style, TableShape,
};
use std::fmt::{self, Write};

const INDENT: &str = "  ";

/// Serialize a diagram to D2 source
pub fn to_d2(diagram: &Diagram) -> Result<String, fmt::Error> {
    let mut output = String::new();
    write_d2(diagram, &mut output)?;
    Ok(output)
}

/// Serialize a diagram into any `fmt::Write` sink
pub fn write_d2<W: Write>(diagram: &Diagram, out: &mut W) -> fmt::Result {
    let mut w = D2Writer { out, depth: 0 };

    if !diagram.classes.is_empty() {
        w.open(format_args!("classes:"))?;
        for class in &diagram.classes {
            w.class(class)?;
        }
        w.close()?;
    }
    w.line(format_args!("direction: {}", diagram.direction))?;

    for shape in &diagram.shapes {
        w.blank()?;
        match shape {
            Shape::Table(table) => w.table(table)?,
            Shape::Group(group) => w.group(group)?,
            Shape::Anchor(anchor) => w.anchor(anchor)?,
        }
    }

    if !diagram.edges.is_empty() {
        w.blank()?;
    }
    for edge in &diagram.edges {
        w.edge(edge)?;
    }

    Ok(())
}

/// Dotted path with every segment escaped
pub fn key_path(path: &KeyPath) -> String {
    path.segments()
        .iter()
        .map(|s| escape_key(s))
        .collect::<Vec<_>>()
        .join(".")
}

struct D2Writer<'a, W: Write> {
    out: &'a mut W,
    depth: usize,
}

impl<W: Write> D2Writer<'_, W> {
    fn line(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            self.out.write_str(INDENT)?;
        }
        self.out.write_fmt(args)?;
        self.out.write_char('\n')
    }

    fn blank(&mut self) -> fmt::Result {
        self.out.write_char('\n')
    }

    fn open(&mut self, header: fmt::Arguments<'_>) -> fmt::Result {
        self.line(format_args!("{} {{", header))?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self) -> fmt::Result {
        self.depth = self.depth.saturating_sub(1);
        self.line(format_args!("}}"))
    }

    fn class(&mut self, class: &Class) -> fmt::Result {
        self.open(format_args!("{}:", escape_key(class.name)))?;
        self.style(&class.style)?;
        self.close()
    }

    fn style(&mut self, style: &Style) -> fmt::Result {
        if style.is_empty() {
            return Ok(());
        }
        self.open(format_args!("style:"))?;
        if let Some(ref fill) = style.fill {
            self.line(format_args!("fill: \"{}\"", fill))?;
        }
        if let Some(ref stroke) = style.stroke {
            self.line(format_args!("stroke: \"{}\"", stroke))?;
        }
        if let Some(ref color) = style.font_color {
            self.line(format_args!("font-color: \"{}\"", color))?;
        }
        if let Some(opacity) = style.opacity {
            self.line(format_args!("opacity: {}", opacity))?;
        }
        if let Some(radius) = style.border_radius {
            self.line(format_args!("border-radius: {}", radius))?;
        }
        if let Some(width) = style.stroke_width {
            self.line(format_args!("stroke-width: {}", width))?;
        }
        if let Some(bold) = style.bold {
            self.line(format_args!("bold: {}", bold))?;
        }
        self.close()
    }

    fn table(&mut self, table: &TableShape) -> fmt::Result {
        self.open(format_args!("{}:", escape_key(&table.key)))?;
        self.line(format_args!("shape: sql_table"))?;
        self.style(&table.style)?;
        for row in &table.rows {
            self.row(row)?;
        }
        self.close()
    }

    fn row(&mut self, row: &Row) -> fmt::Result {
        let name = escape_key(&row.name);
        let data_type = escape_value(&row.data_type);
        match row.constraint {
            Some(constraint) => self.line(format_args!(
                "{}: {} {{constraint: {}}}",
                name,
                data_type,
                constraint.as_d2()
            )),
            None => self.line(format_args!("{}: {}", name, data_type)),
        }
    }

    fn group(&mut self, group: &GroupShape) -> fmt::Result {
        self.open(format_args!(
            "{}: {}",
            escape_key(&group.key),
            escape_value(&group.label)
        ))?;
        if let Some(class) = group.class {
            self.line(format_args!("class: {}", class))?;
        }
        self.style(&group.style)?;
        for table in &group.tables {
            self.blank()?;
            self.table(table)?;
        }
        self.close()
    }

    fn anchor(&mut self, anchor: &AnchorShape) -> fmt::Result {
        self.open(format_args!(
            "{}: \"{}\"",
            escape_key(&anchor.key),
            anchor.label
        ))?;
        self.line(format_args!("width: {}", anchor.width))?;
        self.line(format_args!("height: {}", anchor.height))?;
        self.style(&anchor.style)?;
        self.close()
    }

    fn edge(&mut self, edge: &Edge) -> fmt::Result {
        let source = key_path(&edge.source);
        let target = key_path(&edge.target);
        match edge.class {
            Some(class) => self.line(format_args!(
                "{} -> {}: {{class: {}; style.stroke: \"{}\"}}",
                source, target, class, edge.stroke
            )),
            None => self.line(format_args!(
                "{} -> {}: {{style.stroke: \"{}\"}}",
                source, target, edge.stroke
            )),
        }
    }
}

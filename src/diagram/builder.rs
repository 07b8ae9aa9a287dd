//! Turns tables and groups into a diagram tree.

use crate::diagram::ir::{
    AnchorShape, Class, Diagram, Edge, GroupShape, KeyPath, Row, Shape, Style, TableShape,
};
use crate::diagram::Direction;
use crate::palette::Theme;
use crate::schema::{ColumnRef, Group, Table};
use ahash::AHashMap;
use indexmap::IndexMap;

pub const GROUP_CLASS: &str = "group";
pub const RELATION_CLASS: &str = "relation";

const TABLE_STROKE: &str = "#FFF";

/// Invisible bold node; makes the renderer embed the bold font face
const FONT_ANCHOR_KEY: &str = "xxx-bold-node";

/// A relationship leaving a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEdge<'a> {
    /// Column holding the reference
    pub column: &'a str,
    pub target: &'a ColumnRef,
}

/// Build the diagram tree.
///
/// Exactly one group renders flat: tables at the top level, each with its
/// own foreground color. Any other number of groups renders grouped: one
/// container per group, its tables filled with the group's foreground color.
pub fn build(groups: &[Group], direction: Direction, theme: &Theme) -> Diagram {
    let mut diagram = Diagram::new(direction, default_classes());

    match groups {
        [single] => build_flat(&mut diagram, &single.tables, theme),
        _ => build_grouped(&mut diagram, groups, theme),
    }

    diagram
}

/// Outgoing edges of `table`, one per referenced table.
///
/// References are visited column by column; the first reference to a given
/// table is kept and later ones to the same table are dropped.
pub fn table_edges(table: &Table) -> Vec<TableEdge<'_>> {
    let mut seen: IndexMap<&str, TableEdge<'_>> = IndexMap::new();

    for column in &table.columns {
        for target in &column.references {
            seen.entry(target.table.as_str()).or_insert(TableEdge {
                column: &column.name,
                target,
            });
        }
    }

    seen.into_values().collect()
}

fn build_flat(diagram: &mut Diagram, tables: &[Table], theme: &Theme) {
    for (idx, table) in tables.iter().enumerate() {
        let fg = theme.foreground(idx as isize);
        diagram.shapes.push(Shape::Table(table_shape(table, fg)));
    }

    for (idx, table) in tables.iter().enumerate() {
        let fg = theme.foreground(idx as isize);
        for edge in table_edges(table) {
            diagram.edges.push(relation(
                KeyPath::new([table.name.as_str()]),
                KeyPath::new([edge.target.table.as_str(), edge.target.column.as_str()]),
                fg,
            ));
        }
    }

    diagram.shapes.push(Shape::Anchor(font_anchor()));
}

fn build_grouped(diagram: &mut Diagram, groups: &[Group], theme: &Theme) {
    // first group wins if a table is listed twice
    let mut owners: AHashMap<&str, &str> = AHashMap::new();
    for group in groups {
        for table in &group.tables {
            owners.entry(table.name.as_str()).or_insert(group.name.as_str());
        }
    }

    for (idx, group) in groups.iter().enumerate() {
        let bg = theme.background(idx as isize);
        let fg = theme.foreground(idx as isize);

        diagram.shapes.push(Shape::Group(GroupShape {
            key: group.name.clone(),
            label: group.label.clone(),
            class: Some(GROUP_CLASS),
            style: Style {
                fill: Some(bg.to_string()),
                stroke: Some(fg.to_string()),
                font_color: Some(fg.to_string()),
                ..Style::default()
            },
            tables: group.tables.iter().map(|t| table_shape(t, fg)).collect(),
        }));
    }

    for (idx, group) in groups.iter().enumerate() {
        let fg = theme.foreground(idx as isize);
        for table in &group.tables {
            for edge in table_edges(table) {
                let target_group = owners
                    .get(edge.target.table.as_str())
                    .copied()
                    .unwrap_or(group.name.as_str());

                diagram.edges.push(relation(
                    KeyPath::new([group.name.as_str(), table.name.as_str()]),
                    KeyPath::new([
                        target_group,
                        edge.target.table.as_str(),
                        edge.target.column.as_str(),
                    ]),
                    fg,
                ));
            }
        }
    }
}

fn table_shape(table: &Table, fill: &str) -> TableShape {
    TableShape {
        key: table.name.clone(),
        style: Style {
            fill: Some(fill.to_string()),
            stroke: Some(TABLE_STROKE.to_string()),
            ..Style::default()
        },
        rows: table
            .columns
            .iter()
            .map(|c| Row {
                name: c.name.clone(),
                data_type: c.data_type.clone(),
                constraint: c.key_constraint(),
            })
            .collect(),
    }
}

fn relation(source: KeyPath, target: KeyPath, stroke: &str) -> Edge {
    Edge {
        source,
        target,
        class: Some(RELATION_CLASS),
        stroke: stroke.to_string(),
    }
}

fn default_classes() -> Vec<Class> {
    vec![
        Class {
            name: GROUP_CLASS,
            style: Style {
                border_radius: Some(20),
                stroke_width: Some(2),
                bold: Some(true),
                ..Style::default()
            },
        },
        Class {
            name: RELATION_CLASS,
            style: Style {
                stroke_width: Some(2),
                ..Style::default()
            },
        },
    ]
}

fn font_anchor() -> AnchorShape {
    AnchorShape {
        key: FONT_ANCHOR_KEY.to_string(),
        label: "|".to_string(),
        width: 1,
        height: 1,
        style: Style {
            opacity: Some(0.0),
            stroke_width: Some(0),
            bold: Some(true),
            ..Style::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, KeyConstraint};

    fn fk(name: &str, target: &str) -> Column {
        let mut col = Column::new(name, "INT8");
        col.is_foreign_key = true;
        col.references.push(ColumnRef::new(target, name));
        col
    }

    #[test]
    fn test_table_edges_dedup_by_target_table() {
        let table = Table::new("orders")
            .with_column(Column::new("id", "INT8").primary_key())
            .with_column(fk("customer_id", "customers"))
            .with_column(fk("device_id", "devices"))
            .with_column(fk("billing_customer_id", "customers"));

        let edges = table_edges(&table);
        let targets: Vec<String> = edges.iter().map(|e| e.target.to_string()).collect();
        assert_eq!(targets, ["customers.customer_id", "devices.device_id"]);
        assert_eq!(edges[0].column, "customer_id");
    }

    #[test]
    fn test_flat_mode_uses_per_table_foreground() {
        let theme = Theme::default();
        let group = Group::named(
            "schema",
            vec![Table::new("a"), Table::new("b"), Table::new("c")],
        );
        let diagram = build(&[group], Direction::Down, &theme);

        let fills: Vec<_> = diagram
            .tables()
            .map(|t| t.style.fill.clone().unwrap())
            .collect();
        assert_eq!(fills, [theme.foreground(0), theme.foreground(1), theme.foreground(2)]);
        assert_eq!(diagram.groups().count(), 0);
        assert!(matches!(diagram.shapes.last(), Some(Shape::Anchor(_))));
    }

    #[test]
    fn test_grouped_mode_uses_group_foreground() {
        let theme = Theme::default();
        let groups = vec![
            Group::named("billing", vec![Table::new("invoices"), Table::new("payments")]),
            Group::named("fleet", vec![Table::new("devices")]),
        ];
        let diagram = build(&groups, Direction::Right, &theme);

        let groups: Vec<_> = diagram.groups().collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].style.fill.as_deref(), Some(theme.background(0)));
        assert_eq!(groups[1].style.font_color.as_deref(), Some(theme.foreground(1)));
        for table in &groups[0].tables {
            assert_eq!(table.style.fill.as_deref(), Some(theme.foreground(0)));
        }
        assert_eq!(groups[1].tables[0].style.fill.as_deref(), Some(theme.foreground(1)));
        assert!(!diagram.shapes.iter().any(|s| matches!(s, Shape::Anchor(_))));
    }

    #[test]
    fn test_grouped_edges_namespace_target_by_owner() {
        let theme = Theme::default();
        let groups = vec![
            Group::named("sales", vec![Table::new("orders").with_column(fk("customer_id", "customers"))]),
            Group::named("crm", vec![Table::new("customers")]),
            Group::named(
                "ops",
                vec![Table::new("shipments").with_column(fk("carrier_id", "carriers"))],
            ),
        ];
        let diagram = build(&groups, Direction::Down, &theme);

        assert_eq!(diagram.edges.len(), 2);
        assert_eq!(diagram.edges[0].source.segments(), ["sales", "orders"]);
        assert_eq!(
            diagram.edges[0].target.segments(),
            ["crm", "customers", "customer_id"]
        );
        assert_eq!(diagram.edges[0].stroke, theme.foreground(0));
        // carriers is not drawn; stays inside the owning group
        assert_eq!(
            diagram.edges[1].target.segments(),
            ["ops", "carriers", "carrier_id"]
        );
    }

    #[test]
    fn test_rows_keep_order_and_single_constraint() {
        let mut both = Column::new("id", "INT8").primary_key();
        both.is_foreign_key = true;
        let table = Table::new("t")
            .with_column(Column::new("z", "STRING").unique())
            .with_column(both)
            .with_column(Column::new("a", "BOOL"));

        let shape = table_shape(&table, "#000");
        let rows: Vec<_> = shape
            .rows
            .iter()
            .map(|r| (r.name.as_str(), r.constraint))
            .collect();
        assert_eq!(
            rows,
            [
                ("z", Some(KeyConstraint::Unique)),
                ("id", Some(KeyConstraint::PrimaryKey)),
                ("a", None),
            ]
        );
    }

    #[test]
    fn test_zero_groups_is_empty_grouped_diagram() {
        let diagram = build(&[], Direction::Down, &Theme::default());
        assert!(diagram.shapes.is_empty());
        assert!(diagram.edges.is_empty());
        assert_eq!(diagram.classes.len(), 2);
    }
}

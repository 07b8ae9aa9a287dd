//! JSON export of the annotated schema.

use crate::diagram::builder::table_edges;
use crate::schema::{Group, Table};
use schemars::JsonSchema;
use serde::Serialize;

/// JSON representation of the annotated schema
#[derive(Debug, Serialize, JsonSchema)]
pub struct SchemaJson {
    pub tables: Vec<TableJson>,
    pub relationships: Vec<RelationshipJson>,
    pub stats: SchemaStats,
}

/// JSON representation of a table with full column details
#[derive(Debug, Serialize, JsonSchema)]
pub struct TableJson {
    pub name: String,
    /// Owning group, omitted for a single-group schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub columns: Vec<ColumnJson>,
}

/// JSON representation of a column
#[derive(Debug, Serialize, JsonSchema)]
pub struct ColumnJson {
    pub name: String,
    #[serde(rename = "type")]
    pub col_type: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_unique: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

/// JSON representation of a relationship
#[derive(Debug, Serialize, JsonSchema)]
pub struct RelationshipJson {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

/// Schema statistics
#[derive(Debug, Serialize, JsonSchema)]
pub struct SchemaStats {
    pub group_count: usize,
    pub table_count: usize,
    pub column_count: usize,
    pub relationship_count: usize,
}

/// Generate pretty-printed JSON for `groups`
pub fn to_json(groups: &[Group]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&build_schema_json(groups))
}

/// Build the JSON structure
pub fn build_schema_json(groups: &[Group]) -> SchemaJson {
    let grouped = groups.len() != 1;
    let mut tables = Vec::new();
    let mut relationships = Vec::new();

    for group in groups {
        for table in &group.tables {
            tables.push(table_json(table, grouped.then(|| group.name.clone())));

            relationships.extend(table_edges(table).into_iter().map(|edge| RelationshipJson {
                from_table: table.name.clone(),
                from_column: edge.column.to_string(),
                to_table: edge.target.table.clone(),
                to_column: edge.target.column.clone(),
            }));
        }
    }

    let column_count = tables.iter().map(|t| t.columns.len()).sum();

    SchemaJson {
        stats: SchemaStats {
            group_count: groups.len(),
            table_count: tables.len(),
            column_count,
            relationship_count: relationships.len(),
        },
        tables,
        relationships,
    }
}

fn table_json(table: &Table, group: Option<String>) -> TableJson {
    TableJson {
        name: table.name.clone(),
        group,
        columns: table
            .columns
            .iter()
            .map(|col| ColumnJson {
                name: col.name.clone(),
                col_type: col.data_type.clone(),
                is_primary_key: col.is_primary_key,
                is_foreign_key: col.is_foreign_key,
                is_unique: col.is_unique,
                references: col.references.iter().map(|r| r.to_string()).collect(),
            })
            .collect(),
    }
}

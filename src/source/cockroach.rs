//! CockroachDB (and PostgreSQL wire-compatible) databases.
//!
//! Introspection uses CockroachDB's `SHOW TABLES`, `SHOW COLUMNS` and
//! `SHOW CONSTRAINTS` statements. Results are read by column name over the
//! simple query protocol, so extra columns in newer versions are ignored.

use super::{quote_ident, SchemaSource, SourceError};
use crate::schema::{ConstraintRecord, Table, TableConstraints};
use postgres::{Client, NoTls, SimpleQueryMessage, SimpleQueryRow};
use tracing::debug;

pub struct CockroachSource {
    client: Client,
}

impl CockroachSource {
    /// Connect and run a connectivity probe
    pub fn connect(url: &str) -> Result<Self, SourceError> {
        let mut client = Client::connect(url, NoTls)?;
        client.simple_query("SELECT 1")?;
        Ok(Self { client })
    }

    fn rows(&mut self, query: &str) -> Result<Vec<SimpleQueryRow>, SourceError> {
        let messages = self.client.simple_query(query)?;
        Ok(messages
            .into_iter()
            .filter_map(|m| match m {
                SimpleQueryMessage::Row(row) => Some(row),
                _ => None,
            })
            .collect())
    }
}

/// Text value of a named column; NULL becomes an empty string
fn field(row: &SimpleQueryRow, query: &str, column: &'static str) -> Result<String, SourceError> {
    match row.try_get(column) {
        Ok(value) => Ok(value.unwrap_or_default().to_string()),
        Err(_) => Err(SourceError::MissingField {
            query: query.to_string(),
            column,
        }),
    }
}

/// Boolean cell in pgwire text encoding (`t`/`f`), also accepting `true`
fn is_true(text: &str) -> bool {
    matches!(text.trim().to_ascii_lowercase().as_str(), "t" | "true")
}

/// A `SHOW COLUMNS` row as a `(name, type)` definition, or `None` for
/// hidden columns such as the implicit `rowid`
fn visible_column(name: String, data_type: String, is_hidden: &str) -> Option<(String, String)> {
    if is_true(is_hidden) {
        return None;
    }
    Some((name, data_type))
}

impl SchemaSource for CockroachSource {
    fn engine(&self) -> &'static str {
        "cockroachdb"
    }

    fn list_tables(&mut self) -> Result<Vec<String>, SourceError> {
        let query = "SHOW TABLES";
        self.rows(query)?
            .iter()
            .map(|row| field(row, query, "table_name"))
            .collect()
    }

    fn describe_table(&mut self, name: &str) -> Result<Table, SourceError> {
        let query = format!("SHOW COLUMNS FROM {}", quote_ident(name));
        let mut columns = Vec::new();
        for row in self.rows(&query)? {
            let definition = visible_column(
                field(&row, &query, "column_name")?,
                field(&row, &query, "data_type")?,
                &field(&row, &query, "is_hidden")?,
            );
            columns.extend(definition);
        }
        if columns.is_empty() {
            return Err(SourceError::TableNotFound(name.to_string()));
        }

        let query = format!("SHOW CONSTRAINTS FROM {}", quote_ident(name));
        let records = self
            .rows(&query)?
            .iter()
            .map(|row| {
                Ok(ConstraintRecord::new(
                    field(row, &query, "constraint_name")?,
                    &field(row, &query, "constraint_type")?,
                    field(row, &query, "details")?,
                ))
            })
            .collect::<Result<Vec<_>, SourceError>>()?;
        let constraints = TableConstraints::new(records);
        debug!(table = name, constraints = ?constraints.records(), "fetched constraints");

        Ok(Table::from_definitions(name, columns, &constraints))
    }

    fn close(self: Box<Self>) -> Result<(), SourceError> {
        Ok(self.client.close()?)
    }
}

//! Relationship inference from column names.
//!
//! Relationships are never read from the database. They come from an
//! override map keyed by table name (or the `*` wildcard) and then by column
//! name, giving the referenced table.

pub mod metadata;

pub use metadata::{load_metadata, MetadataError, DEFAULT_METADATA_FILE};

use crate::schema::{ColumnRef, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Table key consulted when a table has no entry for a column
pub const WILDCARD: &str = "*";

/// Column name -> referenced table name
pub type TableRelation = HashMap<String, String>;

/// Two-level override map: table (or `*`) -> column -> referenced table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relationships {
    tables: HashMap<String, TableRelation>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; use [`WILDCARD`] as `table` for a fallback rule
    pub fn with(
        mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.insert(table, column, target);
        self
    }

    pub fn insert(
        &mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        target: impl Into<String>,
    ) {
        self.tables
            .entry(table.into())
            .or_default()
            .insert(column.into(), target.into());
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(|t| t.is_empty())
    }

    /// Number of (table, column) entries, wildcard included
    pub fn len(&self) -> usize {
        self.tables.values().map(|t| t.len()).sum()
    }

    /// Decide which table `table.column` references.
    ///
    /// A table-specific entry wins over the wildcard. Whichever entry is
    /// found, a target equal to `table` is rejected and the lookup does not
    /// fall through to the wildcard.
    pub fn resolve(&self, table: &str, column: &str) -> Option<&str> {
        let candidate = self
            .tables
            .get(table)
            .and_then(|rel| rel.get(column))
            .or_else(|| {
                self.tables
                    .get(WILDCARD)
                    .and_then(|rel| rel.get(column))
            })?;

        if candidate == table {
            return None;
        }
        Some(candidate.as_str())
    }

    /// Flag every resolvable column of `table` as a foreign key referencing
    /// the same-named column of the target table.
    ///
    /// Columns already flagged are left untouched, so annotating twice is a
    /// no-op. Returns the number of columns newly flagged.
    pub fn annotate(&self, table: &mut Table) -> usize {
        let mut flagged = 0;
        for column in table.columns.iter_mut().filter(|c| !c.is_foreign_key) {
            if let Some(target) = self.resolve(&table.name, &column.name) {
                column.is_foreign_key = true;
                column
                    .references
                    .push(ColumnRef::new(target, column.name.clone()));
                flagged += 1;
            }
        }
        flagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;

    #[test]
    fn test_table_entry_beats_wildcard() {
        let rel = Relationships::new()
            .with(WILDCARD, "device_id", "devices")
            .with("fleet", "device_id", "inventory");

        assert_eq!(rel.resolve("fleet", "device_id"), Some("inventory"));
        assert_eq!(rel.resolve("orders", "device_id"), Some("devices"));
    }

    #[test]
    fn test_resolution_is_per_column() {
        let rel = Relationships::new()
            .with(WILDCARD, "user_id", "users")
            .with("fleet", "device_id", "inventory");

        // fleet has an entry, but not for user_id
        assert_eq!(rel.resolve("fleet", "user_id"), Some("users"));
    }

    #[test]
    fn test_self_reference_is_vetoed() {
        let rel = Relationships::new()
            .with(WILDCARD, "device_id", "devices")
            .with("orders", "device_id", "orders");

        assert_eq!(rel.resolve("orders", "device_id"), None);
        assert_eq!(rel.resolve("devices", "device_id"), None);
    }

    #[test]
    fn test_unknown_column_is_not_found() {
        let rel = Relationships::new().with(WILDCARD, "user_id", "users");
        assert_eq!(rel.resolve("orders", "total"), None);
        assert_eq!(Relationships::new().resolve("orders", "user_id"), None);
    }

    #[test]
    fn test_annotate_is_idempotent() {
        let rel = Relationships::new().with(WILDCARD, "customer_id", "customers");
        let mut table = Table::new("orders")
            .with_column(Column::new("id", "INT8").primary_key())
            .with_column(Column::new("customer_id", "INT8"));

        assert_eq!(rel.annotate(&mut table), 1);
        assert_eq!(rel.annotate(&mut table), 0);

        let col = table.get_column("customer_id").unwrap();
        assert!(col.is_foreign_key);
        assert_eq!(col.references, vec![ColumnRef::new("customers", "customer_id")]);
        assert!(!table.get_column("id").unwrap().is_foreign_key);
    }

    #[test]
    fn test_len_and_is_empty() {
        assert!(Relationships::new().is_empty());
        let rel = Relationships::new()
            .with(WILDCARD, "a_id", "a")
            .with(WILDCARD, "b_id", "b")
            .with("c", "a_id", "x");
        assert_eq!(rel.len(), 3);
        assert!(!rel.is_empty());
    }
}

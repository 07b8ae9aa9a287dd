//! Schema model populated by a database source.
//!
//! This module provides:
//! - Data models for tables, columns and display groups
//! - Qualified column references produced by relationship resolution
//! - Constraint records and the primary-key/unique classification heuristic

pub mod constraint;

pub use constraint::{details_mention_column, ConstraintKind, ConstraintRecord, TableConstraints};

use std::fmt;

/// A qualified reference to a column in another table (`table.column`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Referenced table name
    pub table: String,
    /// Referenced column name
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// The single key annotation a column is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyConstraint {
    PrimaryKey,
    ForeignKey,
    Unique,
}

impl KeyConstraint {
    /// Keyword used by D2's `sql_table` shape
    pub fn as_d2(self) -> &'static str {
        match self {
            KeyConstraint::PrimaryKey => "primary_key",
            KeyConstraint::ForeignKey => "foreign_key",
            KeyConstraint::Unique => "unique",
        }
    }
}

/// Column definition within a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name, unique within its table
    pub name: String,
    /// Type as reported by the engine
    pub data_type: String,
    /// Whether a primary key constraint mentions this column
    pub is_primary_key: bool,
    /// Set by relationship resolution
    pub is_foreign_key: bool,
    /// Whether a unique constraint mentions this column
    pub is_unique: bool,
    /// Qualified references, set by relationship resolution
    pub references: Vec<ColumnRef>,
}

impl Column {
    /// Create a plain column with no key flags
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: false,
            is_foreign_key: false,
            is_unique: false,
            references: Vec::new(),
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// The annotation to draw: primary key, then foreign key, then unique.
    pub fn key_constraint(&self) -> Option<KeyConstraint> {
        if self.is_primary_key {
            Some(KeyConstraint::PrimaryKey)
        } else if self.is_foreign_key {
            Some(KeyConstraint::ForeignKey)
        } else if self.is_unique {
            Some(KeyConstraint::Unique)
        } else {
            None
        }
    }
}

/// A table with its columns in engine-reported order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column, keeping declaration order
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Build a table from raw `(name, type)` column definitions and the
    /// table's constraint records, classifying key flags on the way.
    pub fn from_definitions<I, N, T>(
        name: impl Into<String>,
        definitions: I,
        constraints: &TableConstraints,
    ) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let columns = definitions
            .into_iter()
            .map(|(col_name, col_type)| {
                let mut column = Column::new(col_name, col_type);
                column.is_primary_key = constraints.is_primary_key(&column.name);
                column.is_unique = constraints.is_unique(&column.name);
                column
            })
            .collect();

        Self {
            name: name.into(),
            columns,
        }
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Every reference on every column, in column order
    pub fn references(&self) -> impl Iterator<Item = &ColumnRef> {
        self.columns.iter().flat_map(|c| c.references.iter())
    }
}

/// A named set of tables drawn inside one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Identifier used to namespace the group's tables
    pub name: String,
    /// Text shown on the container
    pub label: String,
    pub tables: Vec<Table>,
}

impl Group {
    pub fn new(name: impl Into<String>, label: impl Into<String>, tables: Vec<Table>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            tables,
        }
    }

    /// A group whose label is its name
    pub fn named(name: impl Into<String>, tables: Vec<Table>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            tables,
        }
    }
}

//! Constraint records as reported by the engine, and key classification.

use std::fmt;

/// Kind of a table constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    ForeignKey,
    Check,
    Other(String),
}

impl ConstraintKind {
    /// Parse an engine-reported constraint type (`PRIMARY KEY`, `UNIQUE`, ...)
    pub fn from_engine(kind: &str) -> Self {
        let normalized = kind.trim().to_uppercase().replace('_', " ");
        match normalized.as_str() {
            "PRIMARY KEY" => ConstraintKind::PrimaryKey,
            "UNIQUE" => ConstraintKind::Unique,
            "FOREIGN KEY" => ConstraintKind::ForeignKey,
            "CHECK" => ConstraintKind::Check,
            _ => ConstraintKind::Other(kind.trim().to_string()),
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::PrimaryKey => write!(f, "PRIMARY KEY"),
            ConstraintKind::Unique => write!(f, "UNIQUE"),
            ConstraintKind::ForeignKey => write!(f, "FOREIGN KEY"),
            ConstraintKind::Check => write!(f, "CHECK"),
            ConstraintKind::Other(s) => write!(f, "{}", s),
        }
    }
}

/// One constraint row for a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintRecord {
    pub name: String,
    pub kind: ConstraintKind,
    /// Engine-specific description, e.g. `PRIMARY KEY (id ASC)`
    pub details: String,
}

impl ConstraintRecord {
    pub fn new(name: impl Into<String>, kind: &str, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ConstraintKind::from_engine(kind),
            details: details.into(),
        }
    }
}

/// All constraints retrieved for one table
#[derive(Debug, Clone, Default)]
pub struct TableConstraints {
    records: Vec<ConstraintRecord>,
}

impl TableConstraints {
    pub fn new(records: Vec<ConstraintRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ConstraintRecord] {
        &self.records
    }

    /// Whether any primary key constraint mentions `column`.
    ///
    /// Uses [`details_mention_column`], so it inherits its false positives.
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.any_of_kind_mentions(&ConstraintKind::PrimaryKey, column)
    }

    /// Whether any unique constraint mentions `column`
    pub fn is_unique(&self, column: &str) -> bool {
        self.any_of_kind_mentions(&ConstraintKind::Unique, column)
    }

    fn any_of_kind_mentions(&self, kind: &ConstraintKind, column: &str) -> bool {
        self.records
            .iter()
            .filter(|r| &r.kind == kind)
            .any(|r| details_mention_column(&r.details, column))
    }
}

/// Approximate membership test: true when `column` occurs anywhere in the
/// constraint's details text.
///
/// This is a plain substring check, not a parse of the column list. A column
/// named `id` matches `PRIMARY KEY (order_id ASC)`.
pub fn details_mention_column(details: &str, column: &str) -> bool {
    !column.is_empty() && details.contains(column)
}

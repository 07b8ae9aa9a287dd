//! Database sources that list and describe tables.
//!
//! A source is opened from a URN:
//! - `postgres://…`, `postgresql://…`, `cockroach://…` → CockroachDB/PostgreSQL
//! - `duckdb://PATH` or a path ending in `.duckdb`, `.ddb` or `.db` → DuckDB
//!
//! Described tables carry primary-key and unique flags but no relationships.

mod cockroach;
mod duckdb;

pub use self::cockroach::CockroachSource;
pub use self::duckdb::DuckDbSource;

use crate::schema::Table;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unsupported database URN: {0} (expected postgres://, cockroach:// or duckdb://)")]
    UnsupportedUrn(String),
    #[error("no database URN provided")]
    EmptyUrn,
    #[error("database file does not exist: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("unexpected result from {query}: missing column {column}")]
    MissingField { query: String, column: &'static str },
    #[error(transparent)]
    Postgres(#[from] ::postgres::Error),
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),
}

/// Source of table listings and descriptions
pub trait SchemaSource {
    /// Short engine name for messages
    fn engine(&self) -> &'static str;

    /// Table names in discovery order
    fn list_tables(&mut self) -> Result<Vec<String>, SourceError>;

    /// Columns in engine order with key flags classified
    fn describe_table(&mut self, name: &str) -> Result<Table, SourceError>;

    /// Release the connection
    fn close(self: Box<Self>) -> Result<(), SourceError>;
}

/// Which engine a URN points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Urn {
    Postgres(String),
    DuckDb(PathBuf),
}

impl Urn {
    pub fn parse(urn: &str) -> Result<Self, SourceError> {
        let urn = urn.trim();
        if urn.is_empty() {
            return Err(SourceError::EmptyUrn);
        }

        let lower = urn.to_lowercase();
        if lower.starts_with("postgres://") || lower.starts_with("postgresql://") {
            return Ok(Urn::Postgres(urn.to_string()));
        }
        for scheme in ["cockroachdb://", "cockroach://"] {
            if lower.starts_with(scheme) {
                return Ok(Urn::Postgres(format!("postgresql://{}", &urn[scheme.len()..])));
            }
        }
        if lower.starts_with("duckdb://") {
            return Ok(Urn::DuckDb(PathBuf::from(&urn["duckdb://".len()..])));
        }

        let path = PathBuf::from(urn);
        let is_duckdb_file = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| matches!(e.to_lowercase().as_str(), "duckdb" | "ddb" | "db"))
            .unwrap_or(false);
        if is_duckdb_file && !urn.contains("://") {
            return Ok(Urn::DuckDb(path));
        }

        Err(SourceError::UnsupportedUrn(urn.to_string()))
    }
}

/// Connect to the database named by `urn`, failing if it is unreachable
pub fn open(urn: &str) -> Result<Box<dyn SchemaSource>, SourceError> {
    match Urn::parse(urn)? {
        Urn::Postgres(url) => Ok(Box::new(CockroachSource::connect(&url)?)),
        Urn::DuckDb(path) => Ok(Box::new(DuckDbSource::open(&path)?)),
    }
}

/// Double-quote an identifier for interpolation into SQL
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_postgres_urns() {
        assert_eq!(
            Urn::parse("postgres://root@localhost:26257/defaultdb").unwrap(),
            Urn::Postgres("postgres://root@localhost:26257/defaultdb".to_string())
        );
        assert_eq!(
            Urn::parse("cockroach://root@localhost:26257/db?sslmode=disable").unwrap(),
            Urn::Postgres("postgresql://root@localhost:26257/db?sslmode=disable".to_string())
        );
    }

    #[test]
    fn test_parse_duckdb_urns() {
        assert_eq!(
            Urn::parse("duckdb:///tmp/app.duckdb").unwrap(),
            Urn::DuckDb(PathBuf::from("/tmp/app.duckdb"))
        );
        assert_eq!(
            Urn::parse("data/app.db").unwrap(),
            Urn::DuckDb(PathBuf::from("data/app.db"))
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(Urn::parse(""), Err(SourceError::EmptyUrn)));
        assert!(matches!(
            Urn::parse("mysql://localhost/db"),
            Err(SourceError::UnsupportedUrn(_))
        ));
        assert!(matches!(
            Urn::parse("notes.txt"),
            Err(SourceError::UnsupportedUrn(_))
        ));
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("orders"), "\"orders\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}

//! DuckDB database files.

use super::{SchemaSource, SourceError};
use crate::schema::{ConstraintRecord, Table, TableConstraints};
use duckdb::{params, AccessMode, Config, Connection};
use std::path::Path;
use tracing::debug;

const DEFAULT_SCHEMA: &str = "main";

/// Reads the `main` schema of a DuckDB file, opened read-only
pub struct DuckDbSource {
    conn: Connection,
    schema: String,
}

impl DuckDbSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        if !path.exists() {
            return Err(SourceError::MissingFile(path.to_path_buf()));
        }

        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        let conn = Connection::open_with_flags(path, config)?;
        conn.execute_batch("SELECT 1")?;

        Ok(Self::from_connection(conn))
    }

    /// Wrap an already open connection (in-memory databases, tests)
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    fn columns(&self, table: &str) -> Result<Vec<(String, String)>, SourceError> {
        let mut stmt = self.conn.prepare(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
        )?;
        let rows = stmt.query_map(params![self.schema, table], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn constraints(&self, table: &str) -> Result<TableConstraints, SourceError> {
        let mut stmt = self.conn.prepare(
            "SELECT constraint_index, constraint_type, constraint_text FROM duckdb_constraints() \
             WHERE schema_name = ? AND table_name = ? ORDER BY constraint_index",
        )?;
        let rows = stmt.query_map(params![self.schema, table], |row| {
            Ok(ConstraintRecord::new(
                format!("{}_{}", table, row.get::<_, i64>(0)?),
                &row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            ))
        })?;
        Ok(TableConstraints::new(rows.collect::<Result<Vec<_>, _>>()?))
    }
}

impl SchemaSource for DuckDbSource {
    fn engine(&self) -> &'static str {
        "duckdb"
    }

    fn list_tables(&mut self) -> Result<Vec<String>, SourceError> {
        let mut stmt = self.conn.prepare(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = ? AND table_type = 'BASE TABLE' ORDER BY table_name",
        )?;
        let rows = stmt.query_map(params![self.schema], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn describe_table(&mut self, name: &str) -> Result<Table, SourceError> {
        let columns = self.columns(name)?;
        if columns.is_empty() {
            return Err(SourceError::TableNotFound(name.to_string()));
        }

        let constraints = self.constraints(name)?;
        debug!(table = name, constraints = ?constraints.records(), "fetched constraints");

        Ok(Table::from_definitions(name, columns, &constraints))
    }

    fn close(self: Box<Self>) -> Result<(), SourceError> {
        self.conn.close().map_err(|(_, err)| SourceError::DuckDb(err))
    }
}

//! Loading the relationship override file.
//!
//! The file is JSON, or YAML when the extension is `.yaml`/`.yml`:
//!
//! ```json
//! {"*": {"customer_id": "customers"}, "orders": {"device_id": "devices"}}
//! ```

use super::Relationships;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File looked up in the working directory when no path is given
pub const DEFAULT_METADATA_FILE: &str = "schema.json";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read metadata file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in metadata file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid YAML in metadata file {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// Load the override map.
///
/// - `None`: read [`DEFAULT_METADATA_FILE`] if it exists, else empty.
/// - `Some("")`: empty map without touching the filesystem.
/// - `Some(path)`: the file must be readable and well-formed.
///
/// A file holding only whitespace yields an empty map.
pub fn load_metadata(path: Option<&Path>) -> Result<Relationships, MetadataError> {
    match path {
        None => {
            let default = Path::new(DEFAULT_METADATA_FILE);
            if default.exists() {
                read_metadata_file(default)
            } else {
                debug!(file = DEFAULT_METADATA_FILE, "no metadata file, no relationships");
                Ok(Relationships::new())
            }
        }
        Some(p) if p.as_os_str().is_empty() => Ok(Relationships::new()),
        Some(p) => read_metadata_file(p),
    }
}

fn read_metadata_file(path: &Path) -> Result<Relationships, MetadataError> {
    let content = fs::read_to_string(path).map_err(|source| MetadataError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let relationships = parse_metadata(path, &content)?;
    debug!(
        file = %path.display(),
        entries = relationships.len(),
        "loaded relationship overrides"
    );
    Ok(relationships)
}

fn parse_metadata(path: &Path, content: &str) -> Result<Relationships, MetadataError> {
    if content.trim().is_empty() {
        return Ok(Relationships::new());
    }

    if is_yaml(path) {
        serde_yaml_ng::from_str(content).map_err(|source| MetadataError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(content).map_err(|source| MetadataError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "yaml" | "yml"))
        .unwrap_or(false)
}

//! Rendering D2 source with the external `d2` binary.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BINARY: &str = "d2";
pub const DEFAULT_LAYOUT: &str = "elk";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("'{0}' command not found. Install d2 (https://d2lang.com) or use --format d2 instead.")]
    NotFound(String),
    #[error("failed to run {binary}: {source}")]
    Io {
        binary: String,
        #[source]
        source: io::Error,
    },
    #[error("{binary} failed with status {status}: {stderr}")]
    Failed {
        binary: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Runs `d2 --layout <engine> - <output>`, feeding the source on stdin.
///
/// The output format is chosen by d2 from the output file extension.
#[derive(Debug, Clone)]
pub struct D2Renderer {
    binary: PathBuf,
    layout: String,
}

impl Default for D2Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY, DEFAULT_LAYOUT)
    }
}

impl D2Renderer {
    pub fn new(binary: impl Into<PathBuf>, layout: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            layout: layout.into(),
        }
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    fn binary_name(&self) -> String {
        self.binary.display().to_string()
    }

    /// Arguments passed to the binary for `output_path`
    pub fn args(&self, output_path: &Path) -> Vec<String> {
        vec![
            "--layout".to_string(),
            self.layout.clone(),
            "-".to_string(),
            output_path.display().to_string(),
        ]
    }

    pub fn render(&self, source: &str, output_path: &Path) -> Result<(), RenderError> {
        let io_err = |source| RenderError::Io {
            binary: self.binary_name(),
            source,
        };

        debug!(binary = %self.binary.display(), layout = %self.layout, output = %output_path.display(), "rendering diagram");
        let mut child = Command::new(&self.binary)
            .args(self.args(output_path))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    RenderError::NotFound(self.binary_name())
                } else {
                    io_err(e)
                }
            })?;

        // Dropping stdin closes the pipe so d2 sees end of input. A write
        // error usually means d2 exited early; its status and stderr say why.
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(source.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output().map_err(io_err)?;
        if !output.status.success() {
            return Err(RenderError::Failed {
                binary: self.binary_name(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        write_result.map_err(io_err)
    }
}

//! Render documents as YAML or JSON and write them out.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Output encoding for rendered documents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// YAML, the format Evergreen project files are written in.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(RenderError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Errors from rendering or writing a document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Format name not recognised.
    #[error("unknown output format: {0} (expected yaml or json)")]
    UnknownFormat(String),

    /// YAML serialization failed.
    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization failed.
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the rendered text failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination, or `<stdout>`.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Render `document` in `format`. Output always ends with a newline.
///
/// # Errors
///
/// Returns [`RenderError::Yaml`] or [`RenderError::Json`] if serialization fails.
pub fn render(document: &Document, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(document)?),
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(document)?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// Write `text` to `path`, or to stdout when `path` is `None`.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns [`RenderError::Write`] if the directory or file cannot be written.
pub fn write_output(text: &str, path: Option<&Path>) -> Result<(), RenderError> {
    match path {
        Some(path) => {
            let write_err = |source: std::io::Error| RenderError::Write {
                path: path.display().to_string(),
                source,
            };
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
            std::fs::write(path, text).map_err(write_err)?;
            tracing::info!(path = %path.display(), bytes = text.len(), "wrote document");
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| RenderError::Write {
                    path: "<stdout>".to_owned(),
                    source,
                })
        }
    }
}

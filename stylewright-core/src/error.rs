//! Error types for stylewright-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the extension manifest or assembling an
/// entry-point registry.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Underlying I/O failure (permission denied, not a file, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load; includes file path and line context from serde_yaml.
    #[error("failed to parse extension manifest at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Two entry points declared the same source stylesheet.
    #[error("duplicate entry point for source '{source_name}'")]
    DuplicateEntryPoint { source_name: String },

    /// An entry point or extension had an empty name field.
    #[error("empty {field} in {owner}")]
    EmptyName { owner: String, field: &'static str },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ManifestError {
    ManifestError::Io {
        path: path.into(),
        source,
    }
}

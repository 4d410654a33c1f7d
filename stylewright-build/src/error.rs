//! Error types for stylewright-build.

use std::path::PathBuf;

use thiserror::Error;

use stylewright_compiler::CompileError;
use stylewright_core::ManifestError;

/// All errors that can abort a styles build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The stylesheet compiler rejected a source.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// The extension manifest could not be read.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (extension map side file).
    #[error("extension map JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The bulk extension pass refused or failed its configuration.
    #[error("extension pass error: {0}")]
    ExtensionPass(String),
}

/// Convenience constructor for [`BuildError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> BuildError {
    BuildError::Io {
        path: path.into(),
        source,
    }
}

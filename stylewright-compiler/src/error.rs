//! Error types for stylewright-compiler.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while compiling a stylesheet.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Filesystem error while reading a stylesheet source.
    #[error("stylesheet io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An `@import` named a stylesheet that does not exist.
    #[error("unresolved import '{import}' in {from}")]
    UnresolvedImport { from: PathBuf, import: String },

    /// A stylesheet imports itself, directly or transitively.
    #[error("import cycle through {path}")]
    ImportCycle { path: PathBuf },

    /// Malformed stylesheet source.
    #[error("{path}:{line}: {message}")]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The compiled text could not be encoded as a module literal.
    #[error("module encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CompileError {
    CompileError::Io {
        path: path.into(),
        source,
    }
}

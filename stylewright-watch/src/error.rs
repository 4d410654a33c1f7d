use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the styles build runtime and watcher.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error("build error: {0}")]
    Build(#[from] stylewright_build::BuildError),

    #[error("channel closed: {0}")]
    ChannelClosed(&'static str),

    #[error("runtime error: {0}")]
    Runtime(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> WatchError {
    WatchError::Io {
        path: path.into(),
        source,
    }
}

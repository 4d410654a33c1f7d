pub mod build;
pub mod check;
pub mod entries;

use std::path::PathBuf;

use anyhow::{Context, Result};

/// `--root`, or the current directory.
pub(crate) fn project_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => std::env::current_dir().context("could not determine current directory"),
    }
}

//! Artifact writer.
//!
//! ## `write_artifacts` protocol
//!
//! 1. Compile (already done by caller; one text for both artifacts).
//! 2. Ensure `build/` and `build/css/` exist (idempotent).
//! 3. Encode the module artifact (`export const cssText = "…"`).
//! 4. Write the module artifact, then the stylesheet artifact.
//!
//! Each write goes to `<path>.stylewright.tmp` and is renamed into place
//! (atomic on POSIX), so a watcher never observes a half-written artifact.
//! A file that already holds the exact bytes is left untouched.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use stylewright_compiler::module;
use stylewright_core::ProjectLayout;

use crate::error::{io_err, BuildError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped: it already held exactly these bytes.
    Unchanged { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path } | WriteResult::Unchanged { path } => path,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }
}

/// The two artifacts derived from one compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactWrites {
    pub module: WriteResult,
    pub style: WriteResult,
}

// ---------------------------------------------------------------------------
// write_artifacts
// ---------------------------------------------------------------------------

/// Write the module artifact `build/<module_output>` and the raw stylesheet
/// artifact `build/css/<style_output>`, both derived from `css`.
///
/// Returns only after both files are in place.
pub fn write_artifacts(
    layout: &ProjectLayout,
    css: &str,
    module_output: &str,
    style_output: &str,
) -> Result<ArtifactWrites, BuildError> {
    ensure_output_tree(layout)?;

    let module_source = module::encode(css)?;
    let module = atomic_write(&layout.module_artifact(module_output), module_source.as_bytes())?;
    let style = atomic_write(&layout.style_artifact(style_output), css.as_bytes())?;

    Ok(ArtifactWrites { module, style })
}

/// Create `build/` and `build/css/`. Existing directories are not an error.
pub(crate) fn ensure_output_tree(layout: &ProjectLayout) -> Result<(), BuildError> {
    let dir = layout.style_output_dir();
    std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

/// Atomically write `content` to `path` unless it already holds those bytes.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> Result<WriteResult, BuildError> {
    match std::fs::read(path) {
        Ok(existing) if existing == content => {
            tracing::debug!(path = %path.display(), "unchanged");
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(io_err(path, err)),
    }

    replace_file(path, content)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote");
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// Unconditionally replace `path` with `content` via a sibling `.tmp` file.
pub(crate) fn replace_file(path: &Path, content: &[u8]) -> Result<(), BuildError> {
    let tmp = PathBuf::from(format!("{}.stylewright.tmp", path.display()));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_write_returns_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("css.js");
        let result = atomic_write(&path, b"hello").unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn second_write_same_content_returns_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("v0.css");
        atomic_write(&path, b"same content").unwrap();
        let result = atomic_write(&path, b"same content").unwrap();
        assert!(matches!(result, WriteResult::Unchanged { .. }));
    }

    #[test]
    fn changed_content_returns_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("v0.css");
        atomic_write(&path, b"v1").unwrap();
        let result = atomic_write(&path, b"v2").unwrap();
        assert!(result.is_written());
        assert_eq!(std::fs::read(&path).unwrap(), b"v2");
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean.css");
        atomic_write(&path, b"data").unwrap();
        let tmp_path = PathBuf::from(format!("{}.stylewright.tmp", path.display()));
        assert!(!tmp_path.exists(), ".stylewright.tmp must be cleaned up");
    }

    #[test]
    fn output_tree_creation_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(tmp.path());
        ensure_output_tree(&layout).unwrap();
        ensure_output_tree(&layout).unwrap();
        assert!(layout.style_output_dir().is_dir());
    }

    #[test]
    fn both_artifacts_derive_from_one_text() {
        let tmp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(tmp.path());
        let css = "a::before{content:\"\\\"\"}\nb{}";

        let writes = write_artifacts(&layout, css, "css.js", "v0.css").unwrap();
        assert_eq!(writes.module.path(), layout.module_artifact("css.js"));
        assert_eq!(writes.style.path(), layout.style_artifact("v0.css"));

        let module_source = std::fs::read_to_string(layout.module_artifact("css.js")).unwrap();
        let style = std::fs::read_to_string(layout.style_artifact("v0.css")).unwrap();
        assert_eq!(module::decode(&module_source).as_deref(), Some(style.as_str()));
        assert_eq!(style, css);
    }

    #[test]
    fn write_fails_when_output_root_is_a_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("build"), b"not a dir").unwrap();
        let layout = ProjectLayout::new(tmp.path());
        let err = write_artifacts(&layout, "a{}", "css.js", "v0.css").unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }), "got: {err}");
    }
}

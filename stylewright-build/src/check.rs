//! Artifact consistency check.
//!
//! For each entry point the module artifact's embedded literal must equal
//! the stylesheet artifact byte-for-byte. Classification precedence:
//! 1. `Missing` (either artifact absent)
//! 2. `Malformed` (module is not a `cssText` export)
//! 3. `Diverged` (literal and stylesheet differ)
//! 4. `Consistent`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use stylewright_compiler::module;
use stylewright_core::{EntryPointRegistry, ProjectLayout};

use crate::error::{io_err, BuildError};

/// Consistency classification for one entry point's artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ArtifactCheck {
    Consistent { source: String },
    Missing { source: String, path: PathBuf },
    Malformed { source: String, path: PathBuf },
    Diverged { source: String },
}

impl ArtifactCheck {
    pub fn is_consistent(&self) -> bool {
        matches!(self, ArtifactCheck::Consistent { .. })
    }

    pub fn source(&self) -> &str {
        match self {
            ArtifactCheck::Consistent { source }
            | ArtifactCheck::Missing { source, .. }
            | ArtifactCheck::Malformed { source, .. }
            | ArtifactCheck::Diverged { source } => source,
        }
    }
}

/// Check every entry point's artifacts, in registry order.
pub fn check_artifacts(
    layout: &ProjectLayout,
    entries: &EntryPointRegistry,
) -> Result<Vec<ArtifactCheck>, BuildError> {
    let mut checks = Vec::with_capacity(entries.len());
    for entry in entries {
        let source = entry.source.clone();
        let module_path = layout.module_artifact(&entry.module_output);
        let style_path = layout.style_artifact(&entry.style_output);

        let Some(module_source) = read_optional(&module_path)? else {
            checks.push(ArtifactCheck::Missing { source, path: module_path });
            continue;
        };
        let Some(style) = read_optional(&style_path)? else {
            checks.push(ArtifactCheck::Missing { source, path: style_path });
            continue;
        };

        let check = match String::from_utf8(module_source).ok().as_deref().and_then(module::decode) {
            None => ArtifactCheck::Malformed { source, path: module_path },
            Some(embedded) if embedded.as_bytes() == style.as_slice() => {
                ArtifactCheck::Consistent { source }
            }
            Some(_) => ArtifactCheck::Diverged { source },
        };
        checks.push(check);
    }
    Ok(checks)
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, BuildError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}

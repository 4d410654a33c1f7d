//! Project layout.
//!
//! ```text
//! <root>/
//!   css/                       stylesheet source tree (watched)
//!   extensions/<name>/<ver>/   extension stylesheet sources
//!   extensions.yaml            extension manifest
//!   EXTENSIONS_CSS_MAP         extension → stylesheet map (JSON, rewritten per run)
//!   build/                     module artifacts
//!     css/                     raw stylesheet artifacts
//! ```

use std::path::{Path, PathBuf};

pub const SOURCE_DIR: &str = "css";
pub const OUTPUT_DIR: &str = "build";
pub const STYLE_OUTPUT_DIR: &str = "css";
pub const EXTENSIONS_DIR: &str = "extensions";
pub const EXTENSIONS_MANIFEST: &str = "extensions.yaml";
pub const EXTENSIONS_CSS_MAP: &str = "EXTENSIONS_CSS_MAP";

/// Every path the build touches, derived from one project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join(SOURCE_DIR)
    }

    /// `<root>/css/<name>`
    pub fn source_path(&self, name: &str) -> PathBuf {
        self.source_dir().join(name)
    }

    pub fn output_root(&self) -> PathBuf {
        self.root.join(OUTPUT_DIR)
    }

    pub fn style_output_dir(&self) -> PathBuf {
        self.output_root().join(STYLE_OUTPUT_DIR)
    }

    /// `<root>/build/<name>`
    pub fn module_artifact(&self, name: &str) -> PathBuf {
        self.output_root().join(name)
    }

    /// `<root>/build/css/<name>`
    pub fn style_artifact(&self, name: &str) -> PathBuf {
        self.style_output_dir().join(name)
    }

    pub fn extensions_dir(&self) -> PathBuf {
        self.root.join(EXTENSIONS_DIR)
    }

    /// `<root>/extensions/<name>/<version>/<binary>.css`
    pub fn extension_source(&self, name: &str, version: &str, binary: &str) -> PathBuf {
        self.extensions_dir()
            .join(name)
            .join(version)
            .join(format!("{binary}.css"))
    }

    pub fn extensions_manifest(&self) -> PathBuf {
        self.root.join(EXTENSIONS_MANIFEST)
    }

    pub fn extensions_css_map(&self) -> PathBuf {
        self.root.join(EXTENSIONS_CSS_MAP)
    }
}

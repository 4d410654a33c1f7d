//! Extension map ports.
//!
//! [`ExtensionSource`] yields the current extension snapshot;
//! [`StyleMapSink`] publishes it for the test-selection tool. The default
//! sink rewrites `EXTENSIONS_CSS_MAP` in full on every run.

use std::path::{Path, PathBuf};

use stylewright_core::{manifest, ExtensionStyleMap, ProjectLayout};

use crate::error::BuildError;
use crate::writer::replace_file;

/// Supplies the extension → stylesheet snapshot for one run.
pub trait ExtensionSource: Send + Sync {
    fn snapshot(&self) -> Result<ExtensionStyleMap, BuildError>;
}

/// A fixed snapshot.
impl ExtensionSource for ExtensionStyleMap {
    fn snapshot(&self) -> Result<ExtensionStyleMap, BuildError> {
        Ok(self.clone())
    }
}

/// Reads `extensions.yaml` afresh for every snapshot.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(layout: &ProjectLayout) -> Self {
        Self::at(layout.extensions_manifest())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ExtensionSource for ManifestSource {
    fn snapshot(&self) -> Result<ExtensionStyleMap, BuildError> {
        Ok(manifest::load_at(&self.path)?)
    }
}

/// Output port for the serialized extension map.
pub trait StyleMapSink: Send + Sync {
    fn publish(&self, map: &ExtensionStyleMap) -> Result<(), BuildError>;
}

/// Writes the map as compact JSON to a fixed path, replacing prior content.
#[derive(Debug, Clone)]
pub struct FileStyleMapSink {
    path: PathBuf,
}

impl FileStyleMapSink {
    pub fn new(layout: &ProjectLayout) -> Self {
        Self::at(layout.extensions_css_map())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StyleMapSink for FileStyleMapSink {
    fn publish(&self, map: &ExtensionStyleMap) -> Result<(), BuildError> {
        let json = serde_json::to_string(map)?;
        replace_file(&self.path, json.as_bytes())?;
        tracing::debug!(path = %self.path.display(), extensions = map.len(), "published extension map");
        Ok(())
    }
}

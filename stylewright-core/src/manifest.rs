//! Extension manifest (`extensions.yaml`).
//!
//! # Format
//!
//! ```yaml
//! extensions:
//!   - name: amp-accordion
//!     version: "0.1"
//!     hasCss: true
//!   - name: amp-story
//!     version: "1.0"
//!     hasCss: true
//!     cssBinaries: [amp-story, amp-story-bookend]
//! ```
//!
//! # API pattern
//!
//! - `load_at(path)`: explicit manifest path; used in tests with `TempDir`
//! - `load(layout)`: resolves the manifest inside a [`ProjectLayout`]

use std::path::Path;

use serde::Deserialize;

use crate::error::{io_err, ManifestError};
use crate::layout::ProjectLayout;
use crate::types::{ExtensionStyle, ExtensionStyleMap};

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    extensions: Vec<ExtensionStyle>,
}

/// Load the manifest at `path` into an [`ExtensionStyleMap`].
///
/// A missing file is an empty map: a project without extensions is valid.
/// Returns `ManifestError::Parse` (with path + line context) if malformed YAML.
/// A later entry with the same `<name>-<version>` key replaces an earlier one.
pub fn load_at(path: &Path) -> Result<ExtensionStyleMap, ManifestError> {
    if !path.exists() {
        return Ok(ExtensionStyleMap::new());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let manifest: Manifest = if contents.trim().is_empty() {
        Manifest::default()
    } else {
        serde_yaml::from_str(&contents).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?
    };

    let mut map = ExtensionStyleMap::new();
    for extension in manifest.extensions {
        if extension.name.0.trim().is_empty() {
            return Err(ManifestError::EmptyName {
                owner: path.display().to_string(),
                field: "name",
            });
        }
        if extension.version.trim().is_empty() {
            return Err(ManifestError::EmptyName {
                owner: format!("extension '{}'", extension.name),
                field: "version",
            });
        }
        map.insert(extension.key(), extension);
    }
    Ok(map)
}

/// `load_at` convenience wrapper.
pub fn load(layout: &ProjectLayout) -> Result<ExtensionStyleMap, ManifestError> {
    load_at(&layout.extensions_manifest())
}

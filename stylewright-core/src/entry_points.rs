//! Ordered, immutable list of stylesheet entry points.
//!
//! Order is significant: it is the compilation order and the write order.
//! The orchestrator takes a registry by value, so tests can inject a
//! synthetic one instead of [`EntryPointRegistry::builtin`].

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::ManifestError;
use crate::types::EntryPoint;

/// The fixed entry points every build compiles, in order.
const BUILTIN: &[(&str, &str, &str)] = &[
    ("amp.css", "css.js", "v0.css"),
    (
        "video-autoplay.css",
        "video-autoplay.css.js",
        "video-autoplay.css",
    ),
];

/// Read-only ordered sequence of [`EntryPoint`]s. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointRegistry {
    entries: Arc<[EntryPoint]>,
}

impl EntryPointRegistry {
    /// Build a registry, preserving the given order.
    ///
    /// Rejects empty names and duplicate sources.
    pub fn new(entries: Vec<EntryPoint>) -> Result<Self, ManifestError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            for (field, value) in [
                ("source", &entry.source),
                ("module_output", &entry.module_output),
                ("style_output", &entry.style_output),
            ] {
                if value.trim().is_empty() {
                    return Err(ManifestError::EmptyName {
                        owner: format!("entry point '{}'", entry.source),
                        field,
                    });
                }
            }
            if !seen.insert(entry.source.as_str()) {
                return Err(ManifestError::DuplicateEntryPoint {
                    source_name: entry.source.clone(),
                });
            }
        }
        Ok(Self {
            entries: entries.into(),
        })
    }

    /// The entry points shipped with every build.
    pub fn builtin() -> Self {
        let entries: Vec<EntryPoint> = BUILTIN
            .iter()
            .map(|(source, module, style)| EntryPoint::new(*source, *module, *style))
            .collect();
        Self {
            entries: entries.into(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntryPoint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by its identity (source name).
    pub fn get(&self, source: &str) -> Option<&EntryPoint> {
        self.entries.iter().find(|e| e.source == source)
    }
}

impl Default for EntryPointRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a EntryPointRegistry {
    type Item = &'a EntryPoint;
    type IntoIter = std::slice::Iter<'a, EntryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Domain types shared by every stylewright crate.
//!
//! Names inside [`EntryPoint`] are file names relative to the directories in
//! [`crate::layout::ProjectLayout`]; they are joined onto those roots, never
//! used as paths on their own.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed extension name (`amp-accordion`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionName(pub String);

impl fmt::Display for ExtensionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ExtensionName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ExtensionName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// One declared stylesheet entry point.
///
/// Identity is [`EntryPoint::source`]: a registry never holds two entries
/// with the same source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    /// Stylesheet file under the source directory (`amp.css`).
    pub source: String,
    /// Module artifact written under the output root (`css.js`).
    pub module_output: String,
    /// Raw stylesheet artifact written under `<output>/css/` (`v0.css`).
    pub style_output: String,
}

impl EntryPoint {
    pub fn new(
        source: impl Into<String>,
        module_output: impl Into<String>,
        style_output: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            module_output: module_output.into(),
            style_output: style_output.into(),
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} / {}",
            self.source, self.module_output, self.style_output
        )
    }
}

// ---------------------------------------------------------------------------
// Extensions
// ---------------------------------------------------------------------------

/// Style metadata for a single extension version.
///
/// Serialized camelCase: the `EXTENSIONS_CSS_MAP` consumer is a JavaScript
/// test-selection tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionStyle {
    pub name: ExtensionName,
    pub version: String,
    #[serde(default)]
    pub has_css: bool,
    /// Stylesheet binaries shipped by the extension. Empty means a single
    /// stylesheet named after the extension.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub css_binaries: Vec<String>,
}

impl ExtensionStyle {
    /// Map key: `<name>-<version>`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Stylesheet binaries to compile, falling back to the extension name.
    pub fn binaries(&self) -> Vec<&str> {
        if self.css_binaries.is_empty() {
            vec![self.name.0.as_str()]
        } else {
            self.css_binaries.iter().map(String::as_str).collect()
        }
    }
}

/// Extension key (`<name>-<version>`) → style metadata.
///
/// A `BTreeMap` keeps the serialized side file deterministic across runs.
pub type ExtensionStyleMap = BTreeMap<String, ExtensionStyle>;

// ---------------------------------------------------------------------------
// Build options
// ---------------------------------------------------------------------------

/// Options for one top-level styles build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Keep watching the source tree after the initial build.
    pub watch: bool,
    /// Forwarded to the extension pass. `None` leaves the choice to the pass.
    pub compile_all: Option<bool>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn accordion() -> ExtensionStyle {
        ExtensionStyle {
            name: ExtensionName::from("amp-accordion"),
            version: "0.1".into(),
            has_css: true,
            css_binaries: vec![],
        }
    }

    #[test]
    fn newtype_display() {
        assert_eq!(ExtensionName::from("amp-fit-text").to_string(), "amp-fit-text");
    }

    #[test]
    fn extension_key_joins_name_and_version() {
        assert_eq!(accordion().key(), "amp-accordion-0.1");
    }

    #[test]
    fn binaries_default_to_extension_name() {
        assert_eq!(accordion().binaries(), vec!["amp-accordion"]);

        let story = ExtensionStyle {
            css_binaries: vec!["amp-story".into(), "amp-story-bookend".into()],
            ..accordion()
        };
        assert_eq!(story.binaries(), vec!["amp-story", "amp-story-bookend"]);
    }

    #[test]
    fn extension_style_serializes_camel_case() {
        let json = serde_json::to_value(accordion()).expect("serialize");
        assert_eq!(json["hasCss"], serde_json::Value::Bool(true));
        assert_eq!(json["name"], "amp-accordion");
        assert!(json.get("cssBinaries").is_none());
    }

    #[test]
    fn build_options_default_is_single_run() {
        let opts = BuildOptions::default();
        assert!(!opts.watch);
        assert_eq!(opts.compile_all, None);
    }

    #[test]
    fn entry_point_display() {
        let entry = EntryPoint::new("amp.css", "css.js", "v0.css");
        assert_eq!(entry.to_string(), "amp.css → css.js / v0.css");
    }
}

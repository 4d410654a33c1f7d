//! Bulk extension-compilation pass.
//!
//! The pipeline calls [`ExtensionPass::run`] once per build, after every
//! entry point has been written, with the same extension snapshot it
//! published to the map sink. [`CssExtensionPass`] compiles each
//! extension stylesheet with the same compiler and artifact writer as the
//! entry points:
//!
//! | Source                                         | Artifacts                                   |
//! |------------------------------------------------|---------------------------------------------|
//! | `extensions/<name>/<ver>/<binary>.css`         | `build/<binary>-<ver>.css.js`, `build/css/<binary>-<ver>.css` |

use std::sync::Arc;

use serde::Serialize;

use stylewright_compiler::StylesheetCompiler;
use stylewright_core::{ExtensionName, ExtensionStyle, ExtensionStyleMap, ProjectLayout};

use crate::error::BuildError;
use crate::writer::write_artifacts;

/// Configuration handed to the extension pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtensionPassConfig {
    pub bundle_only_if_listed_in_files: bool,
    pub compile_only_css: bool,
    /// `Some(true)` overrides any extension selection.
    pub compile_all: Option<bool>,
}

impl ExtensionPassConfig {
    /// The configuration a styles build always uses.
    pub fn css_only(compile_all: Option<bool>) -> Self {
        Self {
            bundle_only_if_listed_in_files: false,
            compile_only_css: true,
            compile_all,
        }
    }
}

/// Compiles styles for the extensions of one run's snapshot.
pub trait ExtensionPass: Send + Sync {
    fn run(
        &self,
        config: &ExtensionPassConfig,
        extensions: &ExtensionStyleMap,
    ) -> Result<(), BuildError>;
}

/// Default pass: compile extension stylesheets from `extensions/`.
pub struct CssExtensionPass {
    layout: ProjectLayout,
    compiler: Arc<dyn StylesheetCompiler>,
    selection: Vec<ExtensionName>,
}

impl CssExtensionPass {
    pub fn new(layout: ProjectLayout, compiler: Arc<dyn StylesheetCompiler>) -> Self {
        Self {
            layout,
            compiler,
            selection: Vec::new(),
        }
    }

    /// Restrict the pass to these extensions unless `compile_all` is set.
    pub fn with_selection(mut self, selection: Vec<ExtensionName>) -> Self {
        self.selection = selection;
        self
    }

    fn is_selected(&self, extension: &ExtensionStyle, compile_all: Option<bool>) -> bool {
        compile_all == Some(true)
            || self.selection.is_empty()
            || self.selection.contains(&extension.name)
    }

    fn compile_extension(&self, extension: &ExtensionStyle) -> Result<usize, BuildError> {
        let mut written = 0;
        for binary in extension.binaries() {
            let source =
                self.layout
                    .extension_source(&extension.name.0, &extension.version, binary);
            let css = self.compiler.compile(&source)?;
            let stem = format!("{binary}-{}", extension.version);
            let writes = write_artifacts(
                &self.layout,
                &css,
                &format!("{stem}.css.js"),
                &format!("{stem}.css"),
            )?;
            written += [&writes.module, &writes.style]
                .iter()
                .filter(|w| w.is_written())
                .count();
        }
        Ok(written)
    }
}

impl ExtensionPass for CssExtensionPass {
    fn run(
        &self,
        config: &ExtensionPassConfig,
        extensions: &ExtensionStyleMap,
    ) -> Result<(), BuildError> {
        if !config.compile_only_css {
            return Err(BuildError::ExtensionPass(
                "only stylesheet compilation is supported; compile_only_css must be set".into(),
            ));
        }

        let mut compiled = 0usize;
        let mut written = 0usize;
        for (key, extension) in extensions {
            if !extension.has_css || !self.is_selected(extension, config.compile_all) {
                continue;
            }
            written += self.compile_extension(extension)?;
            compiled += 1;
            tracing::debug!(extension = %key, "compiled extension styles");
        }

        tracing::info!(
            compiled,
            written,
            compile_all = ?config.compile_all,
            bundle_only_if_listed_in_files = config.bundle_only_if_listed_in_files,
            "extension styles pass completed",
        );
        Ok(())
    }
}

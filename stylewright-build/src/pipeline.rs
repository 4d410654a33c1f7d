//! Styles build pipeline shared by the CLI and the watch controller.
//!
//! One [`StyleBuild::run`]:
//!
//! 1. take one extension snapshot and publish it (before any styles are
//!    rebuilt)
//! 2. compile every entry point, in registry order, one at a time
//! 3. run the extension pass with `compile_only_css` over that same snapshot
//! 4. report completion with the elapsed time
//!
//! The first failure aborts the run and is returned as-is. Artifacts written
//! before the failure stay on disk.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use stylewright_compiler::{CssCompiler, StylesheetCompiler};
use stylewright_core::{layout::OUTPUT_DIR, EntryPointRegistry, ExtensionName, ProjectLayout};

use crate::entry::{compile_entry_point, EntryOutcome};
use crate::error::BuildError;
use crate::extensions::{CssExtensionPass, ExtensionPass, ExtensionPassConfig};
use crate::map::{ExtensionSource, FileStyleMapSink, ManifestSource, StyleMapSink};

pub const COMPLETION_LABEL: &str = "Recompiled all CSS files into";

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Summary of one successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub label: String,
    pub output_dir: PathBuf,
    pub entries: Vec<EntryOutcome>,
    pub extensions: usize,
    pub compile_all: Option<bool>,
    pub elapsed_ms: u128,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn written(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|e| [&e.writes.module, &e.writes.style])
            .filter(|w| w.is_written())
            .count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/ ({})",
            self.label,
            OUTPUT_DIR,
            format_elapsed(Duration::from_millis(self.elapsed_ms as u64))
        )
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    if ms < 1000 {
        format!("{ms} ms")
    } else {
        format!("{:.1} s", elapsed.as_secs_f64())
    }
}

// ---------------------------------------------------------------------------
// StyleBuild
// ---------------------------------------------------------------------------

/// The styles build orchestrator. Immutable once built; share it via `Arc`.
pub struct StyleBuild {
    layout: ProjectLayout,
    entries: EntryPointRegistry,
    compiler: Arc<dyn StylesheetCompiler>,
    extensions: Arc<dyn ExtensionSource>,
    map_sink: Box<dyn StyleMapSink>,
    extension_pass: Box<dyn ExtensionPass>,
}

impl StyleBuild {
    pub fn builder(layout: ProjectLayout) -> StyleBuildBuilder {
        StyleBuildBuilder::new(layout)
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn entries(&self) -> &EntryPointRegistry {
        &self.entries
    }

    /// Run the full styles build once.
    pub fn run(&self, compile_all: Option<bool>) -> Result<RunReport, BuildError> {
        let started = Instant::now();

        let snapshot = self.extensions.snapshot()?;
        self.map_sink.publish(&snapshot)?;

        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            entries.push(compile_entry_point(
                self.compiler.as_ref(),
                &self.layout,
                entry,
            )?);
        }

        self.extension_pass
            .run(&ExtensionPassConfig::css_only(compile_all), &snapshot)?;

        let elapsed = started.elapsed();
        let report = RunReport {
            label: COMPLETION_LABEL.to_string(),
            output_dir: self.layout.output_root(),
            entries,
            extensions: snapshot.len(),
            compile_all,
            elapsed_ms: elapsed.as_millis(),
            finished_at: Utc::now(),
        };
        tracing::info!(
            written = report.written(),
            elapsed_ms = report.elapsed_ms,
            "{report}"
        );
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Assembles a [`StyleBuild`]; every collaborator not supplied gets the
/// workspace default, wired to the final compiler and extension source.
pub struct StyleBuildBuilder {
    layout: ProjectLayout,
    entries: EntryPointRegistry,
    compiler: Option<Arc<dyn StylesheetCompiler>>,
    extensions: Option<Arc<dyn ExtensionSource>>,
    map_sink: Option<Box<dyn StyleMapSink>>,
    extension_pass: Option<Box<dyn ExtensionPass>>,
    selection: Vec<ExtensionName>,
}

impl StyleBuildBuilder {
    fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            entries: EntryPointRegistry::builtin(),
            compiler: None,
            extensions: None,
            map_sink: None,
            extension_pass: None,
            selection: Vec::new(),
        }
    }

    pub fn entries(mut self, entries: EntryPointRegistry) -> Self {
        self.entries = entries;
        self
    }

    pub fn compiler(mut self, compiler: Arc<dyn StylesheetCompiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn extension_source(mut self, source: Arc<dyn ExtensionSource>) -> Self {
        self.extensions = Some(source);
        self
    }

    pub fn map_sink(mut self, sink: Box<dyn StyleMapSink>) -> Self {
        self.map_sink = Some(sink);
        self
    }

    pub fn extension_pass(mut self, pass: Box<dyn ExtensionPass>) -> Self {
        self.extension_pass = Some(pass);
        self
    }

    /// Extensions the default pass builds when `compile_all` is not set.
    pub fn extension_selection(mut self, selection: Vec<ExtensionName>) -> Self {
        self.selection = selection;
        self
    }

    pub fn build(self) -> StyleBuild {
        let compiler: Arc<dyn StylesheetCompiler> = match self.compiler {
            Some(compiler) => compiler,
            None => Arc::new(CssCompiler::new()),
        };
        let extensions: Arc<dyn ExtensionSource> = match self.extensions {
            Some(extensions) => extensions,
            None => Arc::new(ManifestSource::new(&self.layout)),
        };
        let map_sink: Box<dyn StyleMapSink> = match self.map_sink {
            Some(sink) => sink,
            None => Box::new(FileStyleMapSink::new(&self.layout)),
        };
        let extension_pass: Box<dyn ExtensionPass> = match self.extension_pass {
            Some(pass) => pass,
            None => Box::new(
                CssExtensionPass::new(self.layout.clone(), compiler.clone())
                    .with_selection(self.selection),
            ),
        };

        StyleBuild {
            layout: self.layout,
            entries: self.entries,
            compiler,
            extensions,
            map_sink,
            extension_pass,
        }
    }
}

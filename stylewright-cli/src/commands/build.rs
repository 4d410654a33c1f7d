//! `stylewright build`: compile entry points and extension styles.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use stylewright_build::{RunReport, StyleBuild, WriteResult};
use stylewright_core::{BuildOptions, ExtensionName, ProjectLayout};

/// Arguments for `stylewright build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project root (defaults to the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Keep running and recompile whenever a stylesheet under `css/` changes.
    #[arg(long)]
    pub watch: bool,

    /// Recompile styles for every extension, ignoring `--extensions`.
    #[arg(long)]
    pub compile_all: bool,

    /// Only build styles for these extensions (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Emit the initial run report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl BuildArgs {
    pub fn options(&self) -> BuildOptions {
        BuildOptions {
            watch: self.watch,
            compile_all: self.compile_all.then_some(true),
        }
    }

    pub fn run(self) -> Result<()> {
        let root = super::project_root(self.root.clone())?;
        let options = self.options();
        let selection = self
            .extensions
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(ExtensionName::from)
            .collect();

        let build = StyleBuild::builder(ProjectLayout::new(root.clone()))
            .extension_selection(selection)
            .build();

        let report = stylewright_watch::start_blocking(Arc::new(build), options)
            .with_context(|| format!("styles build failed in '{}'", root.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize run report")?
            );
        } else {
            print_report(&report);
        }
        Ok(())
    }
}

fn print_report(report: &RunReport) {
    println!("{} {report}", "✓".green().bold());
    for entry in &report.entries {
        for write in [&entry.writes.module, &entry.writes.style] {
            match write {
                WriteResult::Written { path } => println!("  ✎  {}", path.display()),
                WriteResult::Unchanged { path } => {
                    println!("  {}  {}", "·".bright_black(), path.display())
                }
            }
        }
    }
    if report.extensions > 0 {
        println!("  {} extensions in map", report.extensions);
    }
}

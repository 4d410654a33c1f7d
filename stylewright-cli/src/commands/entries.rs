//! `stylewright entries`: list registered entry points.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use stylewright_core::{layout, EntryPointRegistry, ProjectLayout};

/// Arguments for `stylewright entries`.
#[derive(Args, Debug)]
pub struct EntriesArgs {
    /// Project root (defaults to the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    #[tabled(rename = "source")]
    source: String,
    #[tabled(rename = "module")]
    module: String,
    #[tabled(rename = "stylesheet")]
    stylesheet: String,
    #[tabled(rename = "source present")]
    present: bool,
}

impl EntriesArgs {
    pub fn run(self) -> Result<()> {
        let layout = ProjectLayout::new(super::project_root(self.root)?);
        let rows = entry_rows(&layout, &EntryPointRegistry::builtin());

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize entries")?
            );
            return Ok(());
        }

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

fn entry_rows(project: &ProjectLayout, entries: &EntryPointRegistry) -> Vec<EntryRow> {
    entries
        .iter()
        .map(|entry| EntryRow {
            source: format!("{}/{}", layout::SOURCE_DIR, entry.source),
            module: format!("{}/{}", layout::OUTPUT_DIR, entry.module_output),
            stylesheet: format!(
                "{}/{}/{}",
                layout::OUTPUT_DIR,
                layout::STYLE_OUTPUT_DIR,
                entry.style_output
            ),
            present: project.source_path(&entry.source).is_file(),
        })
        .collect()
}

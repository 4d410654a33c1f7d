//! `stylewright check`: artifact consistency.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use stylewright_build::{check_artifacts, ArtifactCheck};
use stylewright_core::{EntryPointRegistry, ProjectLayout};

/// Arguments for `stylewright check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Project root (defaults to the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "entry")]
    entry: String,
    #[tabled(rename = "state")]
    state: String,
    #[tabled(rename = "detail")]
    detail: String,
}

impl CheckArgs {
    /// Exits with failure when any entry is not consistent.
    pub fn run(self) -> Result<ExitCode> {
        let layout = ProjectLayout::new(super::project_root(self.root)?);
        let checks = check_artifacts(&layout, &EntryPointRegistry::builtin())
            .context("failed to read build artifacts")?;
        let failing = checks.iter().filter(|c| !c.is_consistent()).count();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&checks).context("failed to serialize check JSON")?
            );
        } else {
            print_table(&checks, failing);
        }

        Ok(if failing == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

fn print_table(checks: &[ArtifactCheck], failing: usize) {
    let rows: Vec<CheckRow> = checks
        .iter()
        .map(|check| CheckRow {
            entry: check.source().to_string(),
            state: state_label(check),
            detail: detail(check),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if failing > 0 {
        println!("Run 'stylewright build' to regenerate {failing} entry artifact(s).");
    }
}

fn state_label(check: &ArtifactCheck) -> String {
    match check {
        ArtifactCheck::Consistent { .. } => "CONSISTENT".green().bold().to_string(),
        ArtifactCheck::Missing { .. } => "MISSING".bright_black().bold().to_string(),
        ArtifactCheck::Malformed { .. } => "MALFORMED".red().bold().to_string(),
        ArtifactCheck::Diverged { .. } => "DIVERGED".yellow().bold().to_string(),
    }
}

fn detail(check: &ArtifactCheck) -> String {
    match check {
        ArtifactCheck::Consistent { .. } => "module matches stylesheet".to_string(),
        ArtifactCheck::Missing { path, .. } => format!("{} not found", path.display()),
        ArtifactCheck::Malformed { path, .. } => {
            format!("{} is not a cssText module", path.display())
        }
        ArtifactCheck::Diverged { .. } => "module literal differs from stylesheet".to_string(),
    }
}

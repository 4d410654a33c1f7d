//! Stylewright: compile stylesheet entry points into build artifacts.
//!
//! # Usage
//!
//! ```text
//! stylewright build [--root <dir>] [--watch] [--compile-all] [--extensions a,b] [--json]
//! stylewright entries [--root <dir>] [--json]
//! stylewright check [--root <dir>] [--json]
//! ```

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{build::BuildArgs, check::CheckArgs, entries::EntriesArgs};

#[derive(Parser, Debug)]
#[command(
    name = "stylewright",
    version,
    about = "Compile stylesheet entry points into module and stylesheet artifacts",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile every entry point, then the extension styles.
    Build(BuildArgs),

    /// List the registered entry points and their artifacts.
    Entries(EntriesArgs),

    /// Verify each module artifact embeds exactly its stylesheet artifact.
    Check(CheckArgs),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Build(args) => args.run().map(|()| ExitCode::SUCCESS),
        Commands::Entries(args) => args.run().map(|()| ExitCode::SUCCESS),
        Commands::Check(args) => args.run(),
    }
}

//! Entry-point compiler: one compilation, two artifacts.

use serde::Serialize;

use stylewright_compiler::StylesheetCompiler;
use stylewright_core::{EntryPoint, ProjectLayout};

use crate::error::BuildError;
use crate::writer::{write_artifacts, ArtifactWrites};

/// Outcome of compiling a single entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutcome {
    pub source: String,
    /// Length of the compiled stylesheet in bytes.
    pub bytes: usize,
    pub writes: ArtifactWrites,
}

/// Compile `css/<entry.source>` once and write both derived artifacts.
///
/// Compiler failures are returned unmodified (wrapped in
/// [`BuildError::Compile`]); nothing is written in that case.
pub fn compile_entry_point(
    compiler: &dyn StylesheetCompiler,
    layout: &ProjectLayout,
    entry: &EntryPoint,
) -> Result<EntryOutcome, BuildError> {
    let source = layout.source_path(&entry.source);
    let css = compiler.compile(&source)?;
    let writes = write_artifacts(layout, &css, &entry.module_output, &entry.style_output)?;

    tracing::info!(
        entry = %entry.source,
        module = %entry.module_output,
        style = %entry.style_output,
        bytes = css.len(),
        "compiled entry point",
    );
    Ok(EntryOutcome {
        source: entry.source.clone(),
        bytes: css.len(),
        writes,
    })
}

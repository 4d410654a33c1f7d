//! # stylewright-build
//!
//! Artifact writer and styles build orchestration.
//!
//! Build a [`StyleBuild`] with [`StyleBuild::builder`] and call
//! [`StyleBuild::run`] to compile every entry point into its module and
//! stylesheet artifacts, publish the extension map, and run the extension
//! pass.

pub mod check;
pub mod entry;
pub mod error;
pub mod extensions;
pub mod map;
pub mod pipeline;
pub mod writer;

pub use check::{check_artifacts, ArtifactCheck};
pub use entry::{compile_entry_point, EntryOutcome};
pub use error::BuildError;
pub use extensions::{CssExtensionPass, ExtensionPass, ExtensionPassConfig};
pub use map::{ExtensionSource, FileStyleMapSink, ManifestSource, StyleMapSink};
pub use pipeline::{RunReport, StyleBuild, StyleBuildBuilder};
pub use writer::{write_artifacts, ArtifactWrites, WriteResult};

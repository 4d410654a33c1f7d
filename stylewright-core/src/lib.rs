//! Stylewright core library: domain types, project layout, extension manifest.
//!
//! Public API surface:
//! - [`types`]: entry points, extension metadata, build options
//! - [`entry_points`]: the ordered [`EntryPointRegistry`]
//! - [`layout`]: every path the build reads or writes, derived from the project root
//! - [`manifest`]: `extensions.yaml` loading
//! - [`error`]: [`ManifestError`]

pub mod entry_points;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod types;

pub use entry_points::EntryPointRegistry;
pub use error::ManifestError;
pub use layout::ProjectLayout;
pub use types::{BuildOptions, EntryPoint, ExtensionName, ExtensionStyle, ExtensionStyleMap};

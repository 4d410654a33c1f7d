//! # stylewright-compiler
//!
//! Stylesheet compilation service and module-artifact encoding.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use stylewright_compiler::{module, CssCompiler, StylesheetCompiler};
//!
//! fn jsify(path: &Path) {
//!     if let Ok(css) = CssCompiler::new().compile(path) {
//!         if let Ok(source) = module::encode(&css) {
//!             println!("{source}");
//!         }
//!     }
//! }
//! ```

pub mod compiler;
pub mod error;
pub mod minify;
pub mod module;

pub use compiler::{CssCompiler, StylesheetCompiler};
pub use error::CompileError;

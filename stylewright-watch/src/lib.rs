//! Styles build runtime: initial build, source watcher, single-flight run queue.

mod error;
pub mod queue;
mod runtime;

pub use error::WatchError;
pub use queue::{RunQueue, Trigger};
pub use runtime::{compile_all_styles, init_tracing, run_until, start_blocking};

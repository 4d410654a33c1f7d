//! Module artifact encoding.
//!
//! A module artifact is a single export statement binding the compiled
//! stylesheet to `cssText`:
//!
//! ```text
//! export const cssText = "body{color:red}"
//! ```
//!
//! The literal is produced by `serde_json`, whose string escaping is a valid
//! JavaScript string literal for any input text.

use crate::error::CompileError;

/// Everything before the string literal.
pub const MODULE_PREFIX: &str = "export const cssText = ";

/// Encode compiled stylesheet text as module source.
pub fn encode(css: &str) -> Result<String, CompileError> {
    let literal = serde_json::to_string(css)?;
    Ok(format!("{MODULE_PREFIX}{literal}"))
}

/// Recover the stylesheet text embedded in module source produced by
/// [`encode`]. Returns `None` for anything that is not such a module.
pub fn decode(source: &str) -> Option<String> {
    let literal = source.strip_prefix(MODULE_PREFIX)?;
    let literal = literal.trim_end();
    let literal = literal.strip_suffix(';').unwrap_or(literal);
    serde_json::from_str::<String>(literal).ok()
}

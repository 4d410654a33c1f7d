//! Stylesheet compilation service.
//!
//! [`StylesheetCompiler`] is the seam the build pipeline calls; [`CssCompiler`]
//! is the implementation shipped with the workspace. It inlines local
//! `@import`s and minifies the result.
//!
//! # Import resolution
//!
//! | Statement                              | Result                         |
//! |----------------------------------------|--------------------------------|
//! | `@import "x.css";` / `@import url(x);` | inlined, relative to importer  |
//! | `@import url(https://…);`              | kept verbatim                  |
//! | `@import "x.css" screen;`              | kept verbatim (conditional)    |
//!
//! A file reached twice through different imports is inlined once.
//!
//! Statements kept verbatim (remote or conditional `@import`s and the first
//! `@charset`) are moved to the front of the output, wherever they were
//! found, since CSS ignores them after the first rule. Their URLs are not
//! rewritten, so a relative conditional import inside an inlined file still
//! resolves against the entry point's location.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{io_err, CompileError};
use crate::minify::minify;

/// Turns a stylesheet source file into final stylesheet text.
pub trait StylesheetCompiler: Send + Sync {
    fn compile(&self, source: &Path) -> Result<String, CompileError>;
}

/// Import-inlining, minifying compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssCompiler;

impl CssCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl StylesheetCompiler for CssCompiler {
    fn compile(&self, source: &Path) -> Result<String, CompileError> {
        let mut resolver = ImportResolver::default();
        let body = resolver.compile_file(source)?;
        let inlined = resolver.seen.len().saturating_sub(1);
        let css = resolver.finish(body);
        tracing::debug!(
            source = %source.display(),
            bytes = css.len(),
            inlined,
            "compiled stylesheet",
        );
        Ok(css)
    }
}

#[derive(Default)]
struct ImportResolver {
    stack: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
    charset: Option<String>,
    hoisted: Vec<String>,
}

impl ImportResolver {
    /// Prepend the hoisted statements to the inlined body.
    fn finish(self, body: String) -> String {
        let mut css = self.charset.unwrap_or_default();
        for statement in &self.hoisted {
            css.push_str(statement);
        }
        css.push_str(&body);
        css
    }

    fn compile_file(&mut self, path: &Path) -> Result<String, CompileError> {
        let canonical = std::fs::canonicalize(path).map_err(|e| io_err(path, e))?;
        if self.stack.contains(&canonical) {
            return Err(CompileError::ImportCycle {
                path: path.to_path_buf(),
            });
        }
        if !self.seen.insert(canonical.clone()) {
            return Ok(String::new());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let text = minify(&raw, path)?;

        self.stack.push(canonical);
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let mut out = String::with_capacity(text.len());
        for segment in split_imports(&text) {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Charset(raw) => {
                    if self.charset.is_none() {
                        self.charset = Some(raw.to_string());
                    }
                }
                Segment::Import { raw, target: None } => {
                    if !self.hoisted.iter().any(|kept| kept == raw) {
                        self.hoisted.push(raw.to_string());
                    }
                }
                Segment::Import {
                    target: Some(target),
                    ..
                } => {
                    let resolved = dir.join(&target);
                    if !resolved.is_file() {
                        return Err(CompileError::UnresolvedImport {
                            from: path.to_path_buf(),
                            import: target,
                        });
                    }
                    out.push_str(&self.compile_file(&resolved)?);
                }
            }
        }
        self.stack.pop();
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Import scanning (operates on minified text)
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    /// `target` is `None` for imports that must stay verbatim.
    Import { raw: &'a str, target: Option<String> },
    Charset(&'a str),
}

fn split_imports(text: &str) -> Vec<Segment<'_>> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    let mut statement_start = true;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                statement_start = false;
                continue;
            }
            b'\\' => {
                i = (i + 2).min(bytes.len());
                statement_start = false;
                continue;
            }
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }

        let rest = &bytes[i..];
        if depth == 0 && statement_start && (rest.starts_with(b"@import") || rest.starts_with(b"@charset")) {
            let end = statement_end(bytes, i);
            if start < i {
                segments.push(Segment::Text(&text[start..i]));
            }
            let raw = &text[i..end];
            segments.push(if rest.starts_with(b"@charset") {
                Segment::Charset(raw)
            } else {
                Segment::Import {
                    raw,
                    target: import_target(raw),
                }
            });
            start = end;
            i = end;
            continue;
        }

        statement_start = matches!(bytes[i], b';' | b'{' | b'}');
        i += 1;
    }

    if start < bytes.len() {
        segments.push(Segment::Text(&text[start..]));
    }
    segments
}

/// Index just past the closing quote of the string starting at `open`.
fn skip_string(bytes: &[u8], open: usize) -> usize {
    let quote = bytes[open];
    let mut j = open + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// Index just past the `;` ending the statement at `from`.
fn statement_end(bytes: &[u8], from: usize) -> usize {
    let mut j = from;
    while j < bytes.len() {
        match bytes[j] {
            b'"' | b'\'' => j = skip_string(bytes, j),
            b';' => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// Local file named by an `@import` statement, if it can be inlined.
fn import_target(raw: &str) -> Option<String> {
    let rest = raw.strip_prefix("@import")?.trim_start();
    let (target, tail) = if let Some(inner) = rest.strip_prefix("url(") {
        let close = inner.find(')')?;
        let target = inner[..close].trim();
        (unquote(target).unwrap_or(target), &inner[close + 1..])
    } else {
        let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let close = rest[1..].find(quote)? + 1;
        (&rest[1..close], &rest[close + 1..])
    };

    let tail = tail.trim().trim_end_matches(';').trim();
    if !tail.is_empty() || target.is_empty() || is_remote(target) {
        return None;
    }
    Some(target.to_string())
}

fn unquote(s: &str) -> Option<&str> {
    let first = s.chars().next()?;
    if (first == '"' || first == '\'') && s.len() >= 2 && s.ends_with(first) {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}

fn is_remote(target: &str) -> bool {
    target.starts_with("//") || target.contains("://") || target.starts_with("data:")
}

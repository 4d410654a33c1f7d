//! Whitespace and comment minifier.
//!
//! Keeps string literals byte-for-byte, drops comments, collapses runs of
//! whitespace to one space, and removes whitespace that cannot matter:
//! around `{ } ; ,`, after `:`, and the last `;` of a block. Whitespace
//! before `:` is kept because `a :hover` and `a:hover` select differently.

use std::path::Path;

use crate::error::CompileError;

/// Characters with no whitespace on either side in the output.
fn is_tight(c: char) -> bool {
    matches!(c, '{' | '}' | ';' | ',')
}

/// Characters that swallow whitespace following them.
fn swallows_following_space(c: char) -> bool {
    is_tight(c) || c == ':'
}

fn syntax(path: &Path, line: usize, message: impl Into<String>) -> CompileError {
    CompileError::Syntax {
        path: path.to_path_buf(),
        line,
        message: message.into(),
    }
}

/// Minify `source`. `path` is only used for error reporting.
pub fn minify(source: &str, path: &Path) -> Result<String, CompileError> {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut line = 1usize;
    let mut pending_space = false;
    let mut open_blocks: Vec<usize> = Vec::new();

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let start_line = line;
                let mut closed = false;
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                    }
                    if prev == '*' && c == '/' {
                        closed = true;
                        break;
                    }
                    prev = c;
                }
                if !closed {
                    return Err(syntax(path, start_line, "unterminated comment"));
                }
                pending_space = true;
            }
            c if c.is_whitespace() => {
                if c == '\n' {
                    line += 1;
                }
                pending_space = true;
            }
            '{' | '}' | ';' | ',' => {
                if c == '}' {
                    if open_blocks.pop().is_none() {
                        return Err(syntax(path, line, "unexpected '}'"));
                    }
                    if out.ends_with(';') {
                        out.pop();
                    }
                } else if c == '{' {
                    open_blocks.push(line);
                }
                out.push(c);
                pending_space = false;
            }
            '"' | '\'' => {
                push_pending_space(&mut out, pending_space);
                pending_space = false;
                let start_line = line;
                out.push(c);
                let mut closed = false;
                while let Some(s) = chars.next() {
                    out.push(s);
                    match s {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                if escaped == '\n' {
                                    line += 1;
                                }
                                out.push(escaped);
                            }
                        }
                        '\n' => {
                            return Err(syntax(path, start_line, "unterminated string"));
                        }
                        s if s == c => {
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !closed {
                    return Err(syntax(path, start_line, "unterminated string"));
                }
            }
            '\\' => {
                // An escaped character is part of the identifier, never syntax.
                push_pending_space(&mut out, pending_space);
                pending_space = false;
                out.push(c);
                if let Some(escaped) = chars.next() {
                    if escaped == '\n' {
                        line += 1;
                    }
                    out.push(escaped);
                }
            }
            _ => {
                push_pending_space(&mut out, pending_space);
                pending_space = false;
                out.push(c);
            }
        }
    }

    if let Some(line) = open_blocks.pop() {
        return Err(syntax(path, line, "unclosed '{'"));
    }
    Ok(out)
}

fn push_pending_space(out: &mut String, pending: bool) {
    if !pending {
        return;
    }
    match out.chars().last() {
        Some(last) if !swallows_following_space(last) => out.push(' '),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min(source: &str) -> String {
        minify(source, Path::new("test.css")).expect("minify")
    }

    #[test]
    fn collapses_declaration_whitespace() {
        assert_eq!(min("body {\n  color: red;\n}\n"), "body{color:red}");
    }

    #[test]
    fn already_minified_input_is_unchanged() {
        assert_eq!(min("body{color:red}"), "body{color:red}");
    }

    #[test]
    fn keeps_descendant_and_pseudo_spacing() {
        assert_eq!(min("div   :first-child , p  a { margin : 0 }"), "div :first-child,p a{margin :0}");
    }

    #[test]
    fn strips_comments() {
        assert_eq!(min("/* header */\na { /* inline */ top: 0 }"), "a{top:0}");
    }

    #[test]
    fn preserves_string_contents() {
        assert_eq!(
            min(".q::before { content: \"  /* not a comment */  \" }"),
            ".q::before{content:\"  /* not a comment */  \"}"
        );
    }

    #[test]
    fn keeps_expression_spacing() {
        assert_eq!(min("a { width: calc(100% - 2px) }"), "a{width:calc(100% - 2px)}");
    }

    #[test]
    fn escaped_brace_in_selector_is_not_a_block() {
        assert_eq!(min(".a\\{b { color: red; }"), ".a\\{b{color:red}");
        assert_eq!(min(".a\\}b{top:0}"), ".a\\}b{top:0}");
    }

    #[test]
    fn escaped_quote_in_selector_does_not_open_a_string() {
        assert_eq!(
            min(".a\\\"b { color: red }\n.c { top: 0 }"),
            ".a\\\"b{color:red}.c{top:0}"
        );
    }

    #[test]
    fn escaped_whitespace_is_kept() {
        assert_eq!(min(".a\\ b{top:0}"), ".a\\ b{top:0}");
    }

    #[test]
    fn unclosed_block_reports_opening_line() {
        let err = minify("a{}\nb {\n color: red;\n", Path::new("x.css")).unwrap_err();
        match err {
            CompileError::Syntax { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("unclosed"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stray_closing_brace_is_error() {
        assert!(matches!(
            minify("a{}}", Path::new("x.css")),
            Err(CompileError::Syntax { line: 1, .. })
        ));
    }

    #[test]
    fn unterminated_comment_and_string_are_errors() {
        assert!(minify("a{} /* open", Path::new("x.css")).is_err());
        assert!(minify("a{content:\"open\n}", Path::new("x.css")).is_err());
    }
}

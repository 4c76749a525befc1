//! Text renderers for pipelines and kernel graphs.
//!
//! All renderers are pure functions returning the rendered text; writing
//! it anywhere is the caller's business.

mod commands;
mod dot;
mod script;

pub use commands::{go_command, go_commands};
pub use dot::dot;
pub use script::agent_script;

/// Escape text for a double-quoted string literal.
///
/// Python and DOT both accept backslash escapes for `\`, `"` and newlines.
pub(crate) fn escape_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_quoted() {
        assert_eq!(escape_quoted(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_quoted("a\\b"), "a\\\\b");
        assert_eq!(escape_quoted("one\r\ntwo"), "one\\ntwo");
    }
}

//! Dynamic strings
//!
//! Attribute text with `#{expr}` or `{{expr}}` interpolations. Only the
//! interpolated expressions are compiled; the literal text around them and
//! the spacing inside the delimiters are kept.

use crate::error::Result;
use crate::expression_parser::delimiters::{find_closing_brace, find_closing_double_brace};
use crate::expression_parser::{compile_expr, BoundVariables};

const HASH_OPEN: &str = "#{";
const HASH_CLOSE: &str = "}";
const MUSTACHE_OPEN: &str = "{{";
const MUSTACHE_CLOSE: &str = "}}";

/// Compile every interpolation of a dynamic string.
///
/// An opening delimiter without its closing one is kept as literal text.
pub fn process_dynamic_string(text: &str, bound_variables: &BoundVariables) -> Result<String> {
    let mut result = String::with_capacity(text.len() + 16);
    let mut copied = 0;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        let span = if rest.starts_with(HASH_OPEN) {
            find_closing_brace(text, i + HASH_OPEN.len()).map(|close| (HASH_OPEN, close, HASH_CLOSE))
        } else if rest.starts_with(MUSTACHE_OPEN) {
            find_closing_double_brace(text, i + MUSTACHE_OPEN.len())
                .map(|close| (MUSTACHE_OPEN, close, MUSTACHE_CLOSE))
        } else {
            None
        };

        match span {
            Some((open, close, end)) => {
                let inner = &text[i + open.len()..close];
                result.push_str(&text[copied..i]);
                result.push_str(open);
                result.push_str(&compile_expr(inner, bound_variables)?);
                result.push_str(end);
                i = close + end.len();
                copied = i;
            }
            None => {
                // delimiters are ASCII, step over whole chars only
                i += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    result.push_str(&text[copied..]);
    Ok(result)
}

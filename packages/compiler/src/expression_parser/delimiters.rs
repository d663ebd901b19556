//! Balanced delimiter scanning
//!
//! Interpolation spans (`${...}`, `#{...}`, `{{...}}`) may contain object
//! literals and quoted strings holding braces, so their end is found by
//! counting braces outside of string literals rather than by the first `}`.
//! All delimiters are ASCII, so scanning works on bytes and every returned
//! index is a char boundary.

use crate::chars;

/// Index just past the string literal opening at `start`, or the input
/// length if the literal is never closed. Interpolations of a template
/// literal are skipped whole, so a backtick nested in `${...}` does not end it.
pub fn skip_string_literal(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b if b == chars::BACKSLASH as u8 => i += 2,
            b if b == quote => return i + 1,
            _ if quote == chars::BT as u8 && starts_interpolation(bytes, i) => {
                match find_closing_brace(text, i + 2) {
                    Some(close) => i = close + 1,
                    None => return bytes.len(),
                }
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Whether a `${` opens at `i`
pub fn starts_interpolation(bytes: &[u8], i: usize) -> bool {
    bytes[i] == chars::DOLLAR as u8 && bytes.get(i + 1) == Some(&(chars::LBRACE as u8))
}

fn is_quote_byte(b: u8) -> bool {
    b < 0x80 && chars::is_quote(b as char)
}

/// Index of the `}` closing a brace group whose content starts at `from`.
pub fn find_closing_brace(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        if is_quote_byte(b) {
            i = skip_string_literal(text, i);
            continue;
        }
        if b == chars::LBRACE as u8 {
            depth += 1;
        } else if b == chars::RBRACE as u8 {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
        i += 1;
    }
    None
}

/// Index of the `}}` closing a `{{` span whose content starts at `from`.
pub fn find_closing_double_brace(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        if is_quote_byte(b) {
            i = skip_string_literal(text, i);
            continue;
        }
        if b == chars::LBRACE as u8 {
            depth += 1;
        } else if b == chars::RBRACE as u8 {
            if depth == 0 && bytes.get(i + 1) == Some(&(chars::RBRACE as u8)) {
                return Some(i);
            }
            depth = depth.saturating_sub(1);
        }
        i += 1;
    }
    None
}

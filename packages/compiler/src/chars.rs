//! Character codes
//!
//! Shared by the expression lexer and the markup lexer.

pub const EOF: char = '\0';
pub const NEWLINE: char = '\n';

pub const DQ: char = '"';
pub const SQ: char = '\'';
pub const BT: char = '`';
pub const BACKSLASH: char = '\\';

pub const DOLLAR: char = '$';
pub const AMPERSAND: char = '&';
pub const UNDERSCORE: char = '_';
pub const MINUS: char = '-';
pub const PERIOD: char = '.';
pub const COMMA: char = ',';
pub const COLON: char = ':';
pub const SEMICOLON: char = ';';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';

pub const LPAREN: char = '(';
pub const RPAREN: char = ')';
pub const LBRACKET: char = '[';
pub const RBRACKET: char = ']';
pub const LBRACE: char = '{';
pub const RBRACE: char = '}';

/// Unicode whitespace, including no-break and figure spaces
pub fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace()
}

pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_ascii_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

pub fn is_quote(ch: char) -> bool {
    ch == SQ || ch == DQ || ch == BT
}

/// `[A-Za-z_$]`
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == UNDERSCORE || ch == DOLLAR
}

/// `[\w$]`, unicode aware
pub fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == UNDERSCORE || ch == DOLLAR
}

/// First character of a tag or attribute name
pub fn is_name_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == UNDERSCORE || ch == COLON
}

/// Attribute names carry modifiers such as `t-on-click.prevent` or
/// `onPostCallback.bind`, so `.` is a name character.
pub fn is_name_part(ch: char) -> bool {
    is_name_start(ch) || ch.is_alphanumeric() || ch == MINUS || ch == PERIOD
}

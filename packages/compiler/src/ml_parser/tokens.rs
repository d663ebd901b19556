//! ML Parser Tokens

use serde::{Deserialize, Serialize};

use super::entities::EncodedText;
use crate::parse_util::ParseSourceSpan;

/// Token types for XML parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TokenType {
    TagOpenStart,
    AttrName,
    AttrValue,
    TagOpenEnd,
    TagOpenEndVoid,
    TagClose,
    Text,
    Cdata,
    Comment,
    ProcessingInstruction,
    DocType,
    Eof,
}

/// Markup token
///
/// `parts` holds the names and raw contents (`[tag name]`, `[quote]`,
/// `[comment body]`). Text-like tokens also carry their `encoded` form, and
/// their `source_span` covers exactly the characters a rewrite replaces:
/// the inside of the quotes for `AttrValue`, the inside of the markers for
/// `Cdata`.
#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub parts: Vec<String>,
    pub encoded: Option<EncodedText>,
    pub source_span: ParseSourceSpan,
}

impl Token {
    pub fn new(token_type: TokenType, parts: Vec<String>, source_span: ParseSourceSpan) -> Self {
        Token {
            token_type,
            parts,
            encoded: None,
            source_span,
        }
    }

    pub fn part(&self, index: usize) -> &str {
        self.parts.get(index).map_or("", String::as_str)
    }
}

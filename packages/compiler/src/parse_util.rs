//! Parse Utilities
//!
//! Source files, locations, spans and markup parse errors.

use std::fmt;
use std::sync::Arc;

use crate::chars;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseSourceFile {
    pub content: Arc<str>,
    pub url: Arc<str>,
}

impl ParseSourceFile {
    pub fn new(content: &str, url: &str) -> Self {
        ParseSourceFile {
            content: Arc::from(content),
            url: Arc::from(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseLocation {
    pub file: ParseSourceFile,
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl ParseLocation {
    pub fn new(file: ParseSourceFile, offset: usize, line: usize, col: usize) -> Self {
        ParseLocation { file, offset, line, col }
    }

    /// Return the source around the location
    /// Up to `max_chars` or `max_lines` on each side of the location
    pub fn get_context(&self, max_chars: usize, max_lines: usize) -> (String, String) {
        let content: &str = &self.file.content;
        let offset = self.offset.min(content.len());

        let mut before_start = offset;
        let mut lines = 0;
        for (count, (idx, ch)) in content[..offset].char_indices().rev().enumerate() {
            if count >= max_chars {
                break;
            }
            before_start = idx;
            if ch == chars::NEWLINE {
                lines += 1;
                if lines >= max_lines {
                    break;
                }
            }
        }

        let mut after_end = offset;
        lines = 0;
        for (count, (idx, ch)) in content[offset..].char_indices().enumerate() {
            if count >= max_chars {
                break;
            }
            after_end = offset + idx + ch.len_utf8();
            if ch == chars::NEWLINE {
                lines += 1;
                if lines >= max_lines {
                    break;
                }
            }
        }

        (
            content[before_start..offset].to_string(),
            content[offset..after_end].to_string(),
        )
    }
}

impl fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.file.url, self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseSourceSpan {
    pub start: ParseLocation,
    pub end: ParseLocation,
}

impl ParseSourceSpan {
    pub fn new(start: ParseLocation, end: ParseLocation) -> Self {
        ParseSourceSpan { start, end }
    }

    /// Raw source text covered by the span
    pub fn text(&self) -> &str {
        &self.start.file.content[self.start.offset..self.end.offset]
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start.offset..self.end.offset
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub span: ParseSourceSpan,
    pub msg: String,
}

impl ParseError {
    pub fn new(span: ParseSourceSpan, msg: String) -> Self {
        ParseError { span, msg }
    }

    pub fn contextual_message(&self) -> String {
        let (before, after) = self.span.start.get_context(100, 3);
        format!("{} (\"{}[ERROR ->]{}\")", self.msg, before, after)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.contextual_message(), self.span.start)
    }
}

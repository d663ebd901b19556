//! Compiler errors

use thiserror::Error;

use crate::parse_util::ParseError;

/// Errors raised while rewriting expressions or templates.
///
/// None of them is recovered from: a malformed expression aborts the whole
/// template pass so that no partially rewritten code is ever emitted.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Tokenizer error near: {remainder}")]
    Lex { remainder: String },

    #[error("Invalid string literal: {literal}")]
    UnterminatedString { literal: String },

    #[error("Unbalanced '{found}' in expression [{expression}]")]
    UnbalancedGroup { found: char, expression: String },

    #[error("Arrow function parameters without a matching '(' in expression [{expression}]")]
    UnmatchedArrowParameters { expression: String },

    #[error("Template parse errors:\n{}", format_parse_errors(.errors))]
    Markup { errors: Vec<ParseError> },

    #[error("<{element} {attribute}>: {source}")]
    Attribute {
        element: String,
        attribute: String,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    pub(crate) fn in_attribute(self, element: &str, attribute: &str) -> Self {
        CompileError::Attribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            source: Box::new(self),
        }
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, CompileError>;

//! ML (Markup Language) Parser Module
//!
//! Span-preserving XML parsing and serialization for template files

pub mod ast;
pub mod entities;
pub mod lexer;
pub mod parser;
pub mod serializer;
pub mod tokens;

pub use ast::*;
pub use entities::EncodedText;
pub use lexer::{tokenize, TokenizeResult};
pub use parser::{ParseTreeResult, Parser};
pub use serializer::serialize;
pub use tokens::{Token, TokenType};

/**
 * Expression Parser Module
 *
 * Tokenizer and scope-aware rewriter for embedded template expressions
 */
pub mod compiler;
pub mod delimiters;
pub mod lexer;

pub use compiler::{compile_expr, BoundVariables, ExpressionCompiler, RECEIVER, RESERVED_WORDS};
pub use lexer::{tokenize, Lexer, Token, TokenType};

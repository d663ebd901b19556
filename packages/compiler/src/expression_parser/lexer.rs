/**
 * Template Expression Lexer
 *
 * Splits an embedded template expression into a flat token stream. The
 * stream keeps every input character (whitespace included), so joining the
 * token values reproduces the expression exactly.
 */

use serde::{Deserialize, Serialize};

use crate::chars;
use crate::error::{CompileError, Result};

use super::delimiters::{find_closing_brace, starts_interpolation};

/// Token types in template expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    Whitespace,
    Value,
    TemplateString,
    Symbol,
    Operator,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    Comma,
    Colon,
}

impl TokenType {
    pub fn is_group_open(self) -> bool {
        matches!(
            self,
            TokenType::LeftBrace | TokenType::LeftBracket | TokenType::LeftParen
        )
    }

    pub fn is_group_close(self) -> bool {
        matches!(
            self,
            TokenType::RightBrace | TokenType::RightBracket | TokenType::RightParen
        )
    }
}

/// Token representation
///
/// `value` starts equal to `original_value` and is the only field the
/// compiler rewrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub index: usize,
    pub end: usize,
    pub token_type: TokenType,
    pub original_value: String,
    pub value: String,
}

impl Token {
    pub fn new(index: usize, token_type: TokenType, text: &str) -> Self {
        Token {
            index,
            end: index + text.len(),
            token_type,
            original_value: text.to_string(),
            value: text.to_string(),
        }
    }

    /// Consumed input length in bytes
    pub fn size(&self) -> usize {
        self.end - self.index
    }

    pub fn is_whitespace(&self) -> bool {
        self.token_type == TokenType::Whitespace
    }

    pub fn is_symbol(&self) -> bool {
        self.token_type == TokenType::Symbol
    }

    pub fn is_template_string(&self) -> bool {
        self.token_type == TokenType::TemplateString
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.token_type == TokenType::Operator && self.original_value == operator
    }

    pub fn is_arrow(&self) -> bool {
        self.is_operator(ARROW) || self.is_operator(FIGURE_SPACE_ARROW)
    }

    /// Symbolic meaning of an operator token: word operators map to the
    /// operator they spell (`gt` is `>`), keyword operators lose their
    /// trailing space.
    pub fn operator_meaning(&self) -> Option<&str> {
        if self.token_type != TokenType::Operator {
            return None;
        }
        if let Some((_, symbol)) = WORD_OPERATORS
            .iter()
            .find(|(word, _)| *word == self.original_value)
        {
            return Some(*symbol);
        }
        if self.is_arrow() {
            return Some(ARROW);
        }
        Some(self.original_value.trim_end())
    }
}

pub const ARROW: &str = "=>";
pub const FIGURE_SPACE_ARROW: &str = "=\u{2007}>";

/// Operators, tried in order; the first literal prefix match wins.
const OPERATORS: &[&str] = &[
    "...",
    ".",
    "===",
    "==",
    "+",
    "!==",
    "!=",
    "!",
    "||",
    "&&",
    ">=",
    ">",
    "<=",
    FIGURE_SPACE_ARROW,
    "<",
    "?",
    "-",
    "*",
    "/",
    "%",
    "typeof ",
    ARROW,
    "=",
    ";",
    "in ",
    "new ",
    "|",
    "&",
    "^",
    "~",
];

/// Identifiers that are lexed as operators, with their symbolic meaning
const WORD_OPERATORS: &[(&str, &str)] = &[
    ("and", "&&"),
    ("or", "||"),
    ("gt", ">"),
    ("gte", ">="),
    ("lt", "<"),
    ("lte", "<="),
];

/// Expression lexer
#[derive(Debug, Default)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Lexer
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        Scanner::new(text).scan()
    }
}

/// Tokenize an expression with the default lexer
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    Lexer::new().tokenize(text)
}

/// Scanner for tokenizing input
struct Scanner<'a> {
    input: &'a str,
    index: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Scanner {
            input,
            index: 0,
            tokens: Vec::new(),
        }
    }

    fn scan(mut self) -> Result<Vec<Token>> {
        while self.index < self.input.len() {
            let token = self.scan_token()?;
            self.index = token.end;
            self.tokens.push(token);
        }
        Ok(self.tokens)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.index..]
    }

    fn scan_token(&self) -> Result<Token> {
        let rest = self.rest();
        // rest is never empty here
        let ch = rest.chars().next().unwrap_or(chars::EOF);

        if chars::is_whitespace(ch) {
            return Ok(self.scan_whitespace(rest));
        }
        if chars::is_quote(ch) {
            return self.scan_string(rest, ch);
        }
        if chars::is_digit(ch) {
            return Ok(self.scan_number(rest));
        }
        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            return Ok(Token::new(self.index, TokenType::Operator, op));
        }
        if chars::is_identifier_start(ch) {
            return Ok(self.scan_identifier(rest));
        }
        if let Some(token_type) = static_token_type(ch) {
            return Ok(Token::new(self.index, token_type, &rest[..ch.len_utf8()]));
        }

        Err(CompileError::Lex {
            remainder: rest.to_string(),
        })
    }

    fn scan_whitespace(&self, rest: &str) -> Token {
        let len = rest
            .char_indices()
            .find(|(_, c)| !chars::is_whitespace(*c))
            .map_or(rest.len(), |(i, _)| i);
        Token::new(self.index, TokenType::Whitespace, &rest[..len])
    }

    fn scan_string(&self, rest: &str, quote: char) -> Result<Token> {
        let bytes = rest.as_bytes();
        // quotes and backslash are ASCII, so byte stepping is safe here
        let mut i = 1;
        while i < bytes.len() {
            let b = bytes[i];
            if b == chars::BACKSLASH as u8 {
                i += 2;
                continue;
            }
            if quote == chars::BT && starts_interpolation(bytes, i) {
                match find_closing_brace(rest, i + 2) {
                    Some(close) => {
                        i = close + 1;
                        continue;
                    }
                    None => break,
                }
            }
            if b == quote as u8 {
                let token_type = if quote == chars::BT {
                    TokenType::TemplateString
                } else {
                    TokenType::Value
                };
                return Ok(Token::new(self.index, token_type, &rest[..=i]));
            }
            i += 1;
        }
        Err(CompileError::UnterminatedString {
            literal: rest.to_string(),
        })
    }

    fn scan_number(&self, rest: &str) -> Token {
        let bytes = rest.as_bytes();
        let digits = |from: usize| {
            bytes[from..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
        };

        let mut len = digits(0);
        if bytes.get(len) == Some(&(chars::PERIOD as u8)) {
            let fraction = digits(len + 1);
            if fraction > 0 {
                len += 1 + fraction;
            }
        }
        Token::new(self.index, TokenType::Value, &rest[..len])
    }

    fn scan_identifier(&self, rest: &str) -> Token {
        let len = rest
            .char_indices()
            .skip(1)
            .find(|(_, c)| !chars::is_identifier_part(*c))
            .map_or(rest.len(), |(i, _)| i);
        let text = &rest[..len];

        let token_type = if WORD_OPERATORS.iter().any(|(word, _)| *word == text) {
            TokenType::Operator
        } else {
            TokenType::Symbol
        };
        Token::new(self.index, token_type, text)
    }
}

fn static_token_type(ch: char) -> Option<TokenType> {
    match ch {
        chars::LBRACE => Some(TokenType::LeftBrace),
        chars::RBRACE => Some(TokenType::RightBrace),
        chars::LBRACKET => Some(TokenType::LeftBracket),
        chars::RBRACKET => Some(TokenType::RightBracket),
        chars::LPAREN => Some(TokenType::LeftParen),
        chars::RPAREN => Some(TokenType::RightParen),
        chars::COMMA => Some(TokenType::Comma),
        chars::COLON => Some(TokenType::Colon),
        _ => None,
    }
}

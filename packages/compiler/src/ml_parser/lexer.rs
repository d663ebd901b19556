//! ML Parser Lexer
//!
//! XML tokenizer - converts source text into tokens. Every token keeps the
//! span of the characters it was read from, so the serializer can rebuild
//! the document byte for byte.

use super::entities::{decode_reference, EncodedText};
use super::tokens::{Token, TokenType};
use crate::chars;
use crate::parse_util::{ParseError, ParseLocation, ParseSourceFile, ParseSourceSpan};

/// Tokenization result
#[derive(Debug, Clone)]
pub struct TokenizeResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<ParseError>,
}

/// Tokenize a markup document.
///
/// Tokenization stops at the first error; the tokens read so far are
/// returned, followed by an `Eof` token.
pub fn tokenize(source: &str, url: &str) -> TokenizeResult {
    let mut tokenizer = Tokenizer::new(ParseSourceFile::new(source, url));
    let mut errors = Vec::new();
    if let Err(error) = tokenizer.tokenize() {
        errors.push(error);
    }
    let start = tokenizer.state;
    tokenizer.push_token(TokenType::Eof, vec![], None, start);

    TokenizeResult {
        tokens: tokenizer.tokens,
        errors,
    }
}

type LexResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, Copy)]
struct CursorState {
    offset: usize,
    line: usize,
    column: usize,
}

struct Tokenizer {
    file: ParseSourceFile,
    state: CursorState,
    tokens: Vec<Token>,
}

impl Tokenizer {
    fn new(file: ParseSourceFile) -> Self {
        Tokenizer {
            file,
            state: CursorState {
                offset: 0,
                line: 0,
                column: 0,
            },
            tokens: Vec::new(),
        }
    }

    fn tokenize(&mut self) -> LexResult<()> {
        while !self.at_end() {
            let start = self.state;
            if self.attempt_str("<!--") {
                self.consume_comment(start)?;
            } else if self.attempt_str("<![CDATA[") {
                self.consume_cdata()?;
            } else if self.attempt_str("<!") {
                self.consume_doc_type(start)?;
            } else if self.attempt_str("<?") {
                self.consume_processing_instruction(start)?;
            } else if self.attempt_str("</") {
                self.consume_tag_close(start)?;
            } else if self.attempt_char_code(chars::LT) {
                self.consume_tag_open(start)?;
            } else {
                self.consume_text()?;
            }
        }
        Ok(())
    }

    // Cursor

    fn rest(&self) -> &str {
        &self.file.content[self.state.offset..]
    }

    fn at_end(&self) -> bool {
        self.state.offset >= self.file.content.len()
    }

    fn peek(&self) -> char {
        self.rest().chars().next().unwrap_or(chars::EOF)
    }

    fn advance(&mut self) {
        let Some(ch) = self.rest().chars().next() else {
            return;
        };
        self.state.offset += ch.len_utf8();
        if ch == chars::NEWLINE {
            self.state.line += 1;
            self.state.column = 0;
        } else {
            self.state.column += 1;
        }
    }

    fn attempt_str(&mut self, s: &str) -> bool {
        if !self.rest().starts_with(s) {
            return false;
        }
        for _ in s.chars() {
            self.advance();
        }
        true
    }

    fn attempt_char_code(&mut self, char_code: char) -> bool {
        if !self.at_end() && self.peek() == char_code {
            self.advance();
            true
        } else {
            false
        }
    }

    fn require_char_code(&mut self, char_code: char) -> LexResult<()> {
        if self.attempt_char_code(char_code) {
            Ok(())
        } else {
            Err(self.unexpected_character(&format!("expected '{}'", char_code)))
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.at_end() && chars::is_whitespace(self.peek()) {
            self.advance();
        }
    }

    // Spans and tokens

    fn location(&self, state: CursorState) -> ParseLocation {
        ParseLocation::new(self.file.clone(), state.offset, state.line, state.column)
    }

    fn span_from(&self, start: CursorState) -> ParseSourceSpan {
        ParseSourceSpan::new(self.location(start), self.location(self.state))
    }

    fn chars_from(&self, start: CursorState) -> String {
        self.file.content[start.offset..self.state.offset].to_string()
    }

    fn push_token(
        &mut self,
        token_type: TokenType,
        parts: Vec<String>,
        encoded: Option<EncodedText>,
        start: CursorState,
    ) {
        let source_span = self.span_from(start);
        self.tokens.push(Token {
            token_type,
            parts,
            encoded,
            source_span,
        });
    }

    fn error_at(&self, start: CursorState, msg: String) -> ParseError {
        ParseError::new(self.span_from(start), msg)
    }

    fn unexpected_character(&self, expectation: &str) -> ParseError {
        let msg = if self.at_end() {
            format!("Unexpected end of input, {}", expectation)
        } else {
            format!("Unexpected character \"{}\", {}", self.peek(), expectation)
        };
        self.error_at(self.state, msg)
    }

    // Markup constructs

    /// Read raw characters up to `end` and consume `end`
    fn consume_until(&mut self, end: &str, construct: &str, start: CursorState) -> LexResult<String> {
        let content_start = self.state;
        loop {
            if self.at_end() {
                return Err(self.error_at(start, format!("Unterminated {}", construct)));
            }
            if self.rest().starts_with(end) {
                let content = self.chars_from(content_start);
                self.attempt_str(end);
                return Ok(content);
            }
            self.advance();
        }
    }

    fn consume_comment(&mut self, start: CursorState) -> LexResult<()> {
        let content = self.consume_until("-->", "comment", start)?;
        self.push_token(TokenType::Comment, vec![content], None, start);
        Ok(())
    }

    fn consume_cdata(&mut self) -> LexResult<()> {
        let content_start = self.state;
        loop {
            if self.at_end() {
                return Err(self.error_at(content_start, "Unterminated CDATA section".to_string()));
            }
            if self.rest().starts_with("]]>") {
                break;
            }
            self.advance();
        }
        let content = self.chars_from(content_start);
        let encoded = EncodedText::literal(&content);
        self.push_token(TokenType::Cdata, vec![content], Some(encoded), content_start);
        self.attempt_str("]]>");
        Ok(())
    }

    fn consume_processing_instruction(&mut self, start: CursorState) -> LexResult<()> {
        let content = self.consume_until("?>", "processing instruction", start)?;
        self.push_token(TokenType::ProcessingInstruction, vec![content], None, start);
        Ok(())
    }

    fn consume_doc_type(&mut self, start: CursorState) -> LexResult<()> {
        let content_start = self.state;
        let mut depth = 0usize;
        loop {
            if self.at_end() {
                return Err(self.error_at(start, "Unterminated doctype".to_string()));
            }
            match self.peek() {
                chars::LBRACKET => depth += 1,
                chars::RBRACKET => depth = depth.saturating_sub(1),
                chars::GT if depth == 0 => break,
                _ => {}
            }
            self.advance();
        }
        let content = self.chars_from(content_start);
        self.advance();
        self.push_token(TokenType::DocType, vec![content], None, start);
        Ok(())
    }

    fn consume_name(&mut self) -> LexResult<String> {
        let start = self.state;
        if self.at_end() || !chars::is_name_start(self.peek()) {
            return Err(self.unexpected_character("expected a name"));
        }
        while !self.at_end() && chars::is_name_part(self.peek()) {
            self.advance();
        }
        Ok(self.chars_from(start))
    }

    fn consume_tag_open(&mut self, start: CursorState) -> LexResult<()> {
        let name = self.consume_name()?;
        self.push_token(TokenType::TagOpenStart, vec![name], None, start);

        loop {
            self.skip_whitespace();
            let end_start = self.state;
            if self.attempt_str("/>") {
                self.push_token(TokenType::TagOpenEndVoid, vec![], None, end_start);
                return Ok(());
            }
            if self.attempt_char_code(chars::GT) {
                self.push_token(TokenType::TagOpenEnd, vec![], None, end_start);
                return Ok(());
            }
            if self.at_end() || !chars::is_name_start(self.peek()) {
                return Err(self.unexpected_character("expected an attribute or the end of the tag"));
            }
            self.consume_attribute()?;
        }
    }

    fn consume_attribute(&mut self) -> LexResult<()> {
        let name_start = self.state;
        let name = self.consume_name()?;
        self.push_token(TokenType::AttrName, vec![name], None, name_start);

        self.skip_whitespace();
        self.require_char_code(chars::EQ)?;
        self.skip_whitespace();

        let quote = self.peek();
        if self.at_end() || (quote != chars::DQ && quote != chars::SQ) {
            return Err(self.unexpected_character("expected a quoted attribute value"));
        }
        self.advance();

        let value_start = self.state;
        let mut encoded = EncodedText::default();
        let mut literal_start = self.state;
        loop {
            if self.at_end() {
                return Err(self.error_at(value_start, "Unterminated attribute value".to_string()));
            }
            match self.peek() {
                ch if ch == quote => break,
                chars::LT => {
                    return Err(self.unexpected_character("'<' is not allowed in attribute values"));
                }
                chars::AMPERSAND => {
                    encoded.push_literal(&self.chars_from(literal_start));
                    self.consume_entity(&mut encoded)?;
                    literal_start = self.state;
                }
                _ => self.advance(),
            }
        }
        encoded.push_literal(&self.chars_from(literal_start));

        let mut token = Token::new(TokenType::AttrValue, vec![quote.to_string()], self.span_from(value_start));
        token.encoded = Some(encoded);
        self.tokens.push(token);
        self.advance();
        Ok(())
    }

    fn consume_tag_close(&mut self, start: CursorState) -> LexResult<()> {
        let name = self.consume_name()?;
        self.skip_whitespace();
        self.require_char_code(chars::GT)?;
        self.push_token(TokenType::TagClose, vec![name], None, start);
        Ok(())
    }

    fn consume_text(&mut self) -> LexResult<()> {
        let start = self.state;
        let mut encoded = EncodedText::default();
        let mut literal_start = self.state;
        while !self.at_end() && self.peek() != chars::LT {
            if self.peek() == chars::AMPERSAND {
                encoded.push_literal(&self.chars_from(literal_start));
                self.consume_entity(&mut encoded)?;
                literal_start = self.state;
            } else {
                self.advance();
            }
        }
        encoded.push_literal(&self.chars_from(literal_start));

        let raw = self.chars_from(start);
        self.push_token(TokenType::Text, vec![raw], Some(encoded), start);
        Ok(())
    }

    /// Consume a character reference starting at `&`
    fn consume_entity(&mut self, encoded: &mut EncodedText) -> LexResult<()> {
        let start = self.state;
        self.advance();
        let body_start = self.state;
        while !self.at_end() && self.peek() != chars::SEMICOLON {
            let ch = self.peek();
            if chars::is_whitespace(ch) || ch == chars::LT || ch == chars::AMPERSAND || chars::is_quote(ch) {
                break;
            }
            self.advance();
        }
        let body = self.chars_from(body_start);
        if !self.attempt_char_code(chars::SEMICOLON) {
            return Err(self.error_at(start, format!("Unterminated character reference \"&{}\"", body)));
        }
        match decode_reference(&body) {
            Some(decoded) => {
                encoded.push_reference(&self.chars_from(start), decoded);
                Ok(())
            }
            None => Err(self.error_at(start, format!("Unknown entity \"&{};\"", body))),
        }
    }
}

//! ML Parser
//!
//! Builds the node tree from the token stream.

use std::iter::Peekable;
use std::vec::IntoIter;

use super::ast::{Attribute, Comment, DocType, Document, Element, Node, ProcessingInstruction, Text};
use super::entities::EncodedText;
use super::lexer::tokenize;
use super::tokens::{Token, TokenType};
use crate::error::{CompileError, Result};
use crate::parse_util::{ParseError, ParseSourceFile, ParseSourceSpan};

/// Parse tree result
#[derive(Debug, Clone)]
pub struct ParseTreeResult {
    pub root_nodes: Vec<Node>,
    pub errors: Vec<ParseError>,
}

impl ParseTreeResult {
    pub fn new(root_nodes: Vec<Node>, errors: Vec<ParseError>) -> Self {
        ParseTreeResult { root_nodes, errors }
    }
}

#[derive(Debug, Default)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    pub fn parse(&self, source: &str, url: &str) -> ParseTreeResult {
        let tokenize_result = tokenize(source, url);
        let mut builder = TreeBuilder::new(tokenize_result.tokens);
        builder.build();

        let mut errors = tokenize_result.errors;
        errors.extend(builder.errors);
        ParseTreeResult::new(builder.root_nodes, errors)
    }
}

impl Document {
    /// Parse a markup document, failing on the first malformed construct
    pub fn parse(source: &str, url: &str) -> Result<Document> {
        let result = Parser::new().parse(source, url);
        if !result.errors.is_empty() {
            return Err(CompileError::Markup {
                errors: result.errors,
            });
        }
        Ok(Document {
            file: ParseSourceFile::new(source, url),
            root_nodes: result.root_nodes,
        })
    }
}

struct TreeBuilder {
    tokens: Peekable<IntoIter<Token>>,
    root_nodes: Vec<Node>,
    container_stack: Vec<Element>,
    errors: Vec<ParseError>,
}

impl TreeBuilder {
    fn new(tokens: Vec<Token>) -> Self {
        TreeBuilder {
            tokens: tokens.into_iter().peekable(),
            root_nodes: Vec::new(),
            container_stack: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn build(&mut self) {
        while let Some(token) = self.tokens.next() {
            match token.token_type {
                TokenType::TagOpenStart => self.consume_element_start_tag(token),
                TokenType::TagClose => self.consume_element_end_tag(token),
                TokenType::Text | TokenType::Cdata => self.consume_text(token),
                TokenType::Comment => {
                    let value = token.part(0).to_string();
                    self.add_to_parent(Node::Comment(Comment {
                        value,
                        source_span: token.source_span,
                    }));
                }
                TokenType::ProcessingInstruction => {
                    let value = token.part(0).to_string();
                    self.add_to_parent(Node::ProcessingInstruction(ProcessingInstruction {
                        value,
                        source_span: token.source_span,
                    }));
                }
                TokenType::DocType => {
                    let value = token.part(0).to_string();
                    self.add_to_parent(Node::DocType(DocType {
                        value,
                        source_span: token.source_span,
                    }));
                }
                TokenType::Eof => break,
                _ => self.add_error(
                    format!("Unexpected token {:?}", token.token_type),
                    token.source_span,
                ),
            }
        }

        while let Some(element) = self.container_stack.pop() {
            self.add_error(
                format!("Unclosed element \"{}\"", element.name),
                element.start_source_span.clone(),
            );
            self.add_to_parent(Node::Element(element));
        }
    }

    fn advance_if(&mut self, token_type: TokenType) -> Option<Token> {
        self.tokens.next_if(|token| token.token_type == token_type)
    }

    fn consume_text(&mut self, token: Token) {
        let cdata = token.token_type == TokenType::Cdata;
        let encoded = match token.encoded {
            Some(encoded) => encoded,
            None => EncodedText::literal(token.parts.first().map_or("", String::as_str)),
        };
        self.add_to_parent(Node::Text(Text {
            value: encoded.decoded(),
            encoded,
            cdata,
            source_span: token.source_span,
        }));
    }

    fn consume_element_start_tag(&mut self, start_token: Token) {
        let name = start_token.part(0).to_string();
        let mut attrs = Vec::new();
        while let Some(name_token) = self.advance_if(TokenType::AttrName) {
            let Some(attr) = self.consume_attr(name_token) else {
                continue;
            };
            if attrs.iter().any(|other: &Attribute| other.name == attr.name) {
                self.add_error(format!("Duplicate attribute \"{}\"", attr.name), attr.key_span);
                continue;
            }
            attrs.push(attr);
        }

        let (end_token, self_closing) = if let Some(token) = self.advance_if(TokenType::TagOpenEndVoid) {
            (token, true)
        } else if let Some(token) = self.advance_if(TokenType::TagOpenEnd) {
            (token, false)
        } else {
            // the lexer already reported why the tag is incomplete
            return;
        };

        let start_source_span = ParseSourceSpan::new(
            start_token.source_span.start.clone(),
            end_token.source_span.end.clone(),
        );
        let element = Element {
            name,
            attrs,
            children: Vec::new(),
            source_span: start_source_span.clone(),
            start_source_span,
            end_source_span: None,
        };

        if self_closing {
            self.add_to_parent(Node::Element(element));
        } else {
            self.container_stack.push(element);
        }
    }

    fn consume_attr(&mut self, name_token: Token) -> Option<Attribute> {
        let value_token = self.advance_if(TokenType::AttrValue)?;
        let quote = value_token.part(0).chars().next().unwrap_or('"');
        let encoded = value_token.encoded.unwrap_or_default();

        // closing quote is one byte past the value
        let mut attr_end = value_token.source_span.end.clone();
        attr_end.offset += 1;
        attr_end.col += 1;

        Some(Attribute {
            name: name_token.part(0).to_string(),
            value: encoded.decoded(),
            quote,
            encoded,
            source_span: ParseSourceSpan::new(name_token.source_span.start.clone(), attr_end),
            key_span: name_token.source_span,
            value_span: value_token.source_span,
        })
    }

    fn consume_element_end_tag(&mut self, token: Token) {
        let name = token.part(0);
        match self.container_stack.last() {
            Some(element) if element.name == name => {}
            _ => {
                self.add_error(format!("Unexpected closing tag \"{}\"", name), token.source_span);
                return;
            }
        }
        if let Some(mut element) = self.container_stack.pop() {
            element.source_span = ParseSourceSpan::new(
                element.start_source_span.start.clone(),
                token.source_span.end.clone(),
            );
            element.end_source_span = Some(token.source_span);
            self.add_to_parent(Node::Element(element));
        }
    }

    fn add_error(&mut self, msg: String, span: ParseSourceSpan) {
        self.errors.push(ParseError::new(span, msg));
    }

    fn add_to_parent(&mut self, node: Node) {
        match self.container_stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root_nodes.push(node),
        }
    }
}

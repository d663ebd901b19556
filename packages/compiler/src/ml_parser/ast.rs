//! ML Parser AST
//!
//! XML syntax tree. Attribute values and text hold their decoded content in
//! `value`; rewriting a template means assigning new values there and
//! serializing the document again.

use super::entities::EncodedText;
use crate::parse_util::{ParseSourceFile, ParseSourceSpan};

/// Node type union
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Comment),
    ProcessingInstruction(ProcessingInstruction),
    DocType(DocType),
}

impl Node {
    pub fn source_span(&self) -> &ParseSourceSpan {
        match self {
            Node::Element(n) => &n.source_span,
            Node::Text(n) => &n.source_span,
            Node::Comment(n) => &n.source_span,
            Node::ProcessingInstruction(n) => &n.source_span,
            Node::DocType(n) => &n.source_span,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub quote: char,
    pub encoded: EncodedText,
    pub source_span: ParseSourceSpan,
    pub key_span: ParseSourceSpan,
    /// Inside of the quotes
    pub value_span: ParseSourceSpan,
}

impl Attribute {
    pub fn is_modified(&self) -> bool {
        self.value != self.encoded.decoded()
    }
}

/// Character data, either plain text or a CDATA section
#[derive(Debug, Clone)]
pub struct Text {
    pub value: String,
    pub encoded: EncodedText,
    pub cdata: bool,
    /// Raw text, or the inside of the CDATA markers
    pub source_span: ParseSourceSpan,
}

impl Text {
    pub fn is_modified(&self) -> bool {
        self.value != self.encoded.decoded()
    }
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone)]
pub struct ProcessingInstruction {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone)]
pub struct DocType {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub source_span: ParseSourceSpan,
    pub start_source_span: ParseSourceSpan,
    /// `None` for `<tag/>`
    pub end_source_span: Option<ParseSourceSpan>,
}

impl Element {
    pub fn is_self_closing(&self) -> bool {
        self.end_source_span.is_none()
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|attr| attr.name == name)
    }

    /// Replace the value of an existing attribute. Returns false when the
    /// element has no such attribute.
    pub fn set_attr(&mut self, name: &str, value: String) -> bool {
        match self.attrs.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => {
                attr.value = value;
                true
            }
            None => false,
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// The element itself followed by all its descendants, in document order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Leading text of the element, before any other child node
    pub fn text(&self) -> Option<&str> {
        match self.children.first() {
            Some(Node::Text(text)) => Some(text.value.as_str()),
            _ => None,
        }
    }

    pub fn set_text(&mut self, value: String) -> bool {
        match self.children.first_mut() {
            Some(Node::Text(text)) => {
                text.value = value;
                true
            }
            _ => false,
        }
    }
}

/// Depth-first iterator over an element subtree
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.child_elements().collect::<Vec<_>>().into_iter().rev());
        Some(element)
    }
}

/// Parsed markup document
#[derive(Debug, Clone)]
pub struct Document {
    pub file: ParseSourceFile,
    pub root_nodes: Vec<Node>,
}

impl Document {
    pub fn source(&self) -> &str {
        &self.file.content
    }

    pub fn root_elements(&self) -> impl Iterator<Item = &Element> {
        self.root_nodes.iter().filter_map(Node::as_element)
    }

    pub fn root_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.root_nodes.iter_mut().filter_map(Node::as_element_mut)
    }

    /// Every element of the document, in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.root_elements().flat_map(Element::descendants)
    }
}

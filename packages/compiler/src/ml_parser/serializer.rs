//! ML Serializer
//!
//! Writes a document back out. Only attribute values and text that were
//! modified since parsing are re-encoded; every other byte is copied from
//! the source, so formatting, comments and attribute order are preserved.

use std::ops::Range;

use super::ast::{Document, Element, Node};

/// Serialize a document, splicing modified values into its source
pub fn serialize(document: &Document) -> String {
    let mut edits = Vec::new();
    for node in &document.root_nodes {
        collect_edits(node, &mut edits);
    }
    edits.sort_by_key(|(range, _)| range.start);

    let source = document.source();
    let mut result = String::with_capacity(source.len() + 64 * edits.len());
    let mut copied = 0;
    for (range, replacement) in edits {
        result.push_str(&source[copied..range.start]);
        result.push_str(&replacement);
        copied = range.end;
    }
    result.push_str(&source[copied..]);
    result
}

fn collect_edits(node: &Node, edits: &mut Vec<(Range<usize>, String)>) {
    match node {
        Node::Element(element) => collect_element_edits(element, edits),
        Node::Text(text) if text.is_modified() => {
            let replacement = if text.cdata {
                text.value.clone()
            } else {
                text.encoded.encode(&text.value, None)
            };
            edits.push((text.source_span.range(), replacement));
        }
        _ => {}
    }
}

fn collect_element_edits(element: &Element, edits: &mut Vec<(Range<usize>, String)>) {
    for attr in element.attrs.iter().filter(|attr| attr.is_modified()) {
        edits.push((
            attr.value_span.range(),
            attr.encoded.encode(&attr.value, Some(attr.quote)),
        ));
    }
    for child in &element.children {
        collect_edits(child, edits);
    }
}

impl Document {
    pub fn serialize(&self) -> String {
        serialize(self)
    }
}

//! Character references
//!
//! Attribute values and text are handed to the rewriter decoded, but the
//! output must keep every reference the author wrote (`&amp;&amp;`,
//! `&#8203;`, ...). `EncodedText` remembers the raw form of each reference
//! so that a rewritten value can be encoded back with the same spelling.

use crate::chars;

/// Predefined XML entities
pub const XML_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
];

/// Decode the body of a character reference (the text between `&` and `;`)
pub fn decode_reference(body: &str) -> Option<char> {
    if let Some(number) = body.strip_prefix('#') {
        let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) if !hex.is_empty() && hex.chars().all(chars::is_ascii_hex_digit) => {
                u32::from_str_radix(hex, 16).ok()?
            }
            Some(_) => return None,
            None if !number.is_empty() && number.chars().all(chars::is_digit) => {
                number.parse::<u32>().ok()?
            }
            None => return None,
        };
        return char::from_u32(code);
    }
    XML_ENTITIES
        .iter()
        .find(|(name, _)| *name == body)
        .map(|(_, ch)| *ch)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextPart {
    Literal(String),
    Reference { raw: String, decoded: char },
}

/// Source text split into literal runs and character references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedText {
    pub parts: Vec<TextPart>,
}

impl EncodedText {
    pub fn literal(text: &str) -> Self {
        let mut encoded = EncodedText::default();
        encoded.push_literal(text);
        encoded
    }

    pub fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.parts.last_mut() {
            Some(TextPart::Literal(last)) => last.push_str(text),
            _ => self.parts.push(TextPart::Literal(text.to_string())),
        }
    }

    pub fn push_reference(&mut self, raw: &str, decoded: char) {
        self.parts.push(TextPart::Reference {
            raw: raw.to_string(),
            decoded,
        });
    }

    pub fn decoded(&self) -> String {
        let mut result = String::new();
        for part in &self.parts {
            match part {
                TextPart::Literal(text) => result.push_str(text),
                TextPart::Reference { decoded, .. } => result.push(*decoded),
            }
        }
        result
    }

    /// Encode `value` for output in place of this text.
    ///
    /// `value` is aligned against the decoded text: characters found in
    /// order keep their original spelling, every other character is
    /// escaped. `quote` is the delimiter of the enclosing attribute, if any.
    pub fn encode(&self, value: &str, quote: Option<char>) -> String {
        let original: Vec<(char, Option<&str>)> = self
            .parts
            .iter()
            .flat_map(|part| -> Vec<(char, Option<&str>)> {
                match part {
                    TextPart::Literal(text) => text.chars().map(|c| (c, None)).collect(),
                    TextPart::Reference { raw, decoded } => vec![(*decoded, Some(raw.as_str()))],
                }
            })
            .collect();

        let mut result = String::with_capacity(value.len() + 8);
        let mut j = 0;
        for ch in value.chars() {
            match original.get(j) {
                Some((orig, raw)) if *orig == ch => {
                    match raw {
                        Some(raw) => result.push_str(raw),
                        None => result.push(ch),
                    }
                    j += 1;
                }
                _ => push_escaped(&mut result, ch, quote),
            }
        }

        if j < original.len() {
            // not an insertion-only edit, no alignment to rely on
            let mut escaped = String::with_capacity(value.len() + 8);
            for ch in value.chars() {
                push_escaped(&mut escaped, ch, quote);
            }
            return escaped;
        }
        result
    }
}

fn push_escaped(out: &mut String, ch: char, quote: Option<char>) {
    match ch {
        chars::AMPERSAND => out.push_str("&amp;"),
        chars::LT => out.push_str("&lt;"),
        chars::DQ if quote == Some(chars::DQ) => out.push_str("&quot;"),
        chars::SQ if quote == Some(chars::SQ) => out.push_str("&apos;"),
        _ => out.push(ch),
    }
}

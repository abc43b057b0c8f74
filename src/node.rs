//! Attribute/child document tree used as the textual form of descriptors.
//!
//! This is the document abstraction consumed by the descriptor codecs: a
//! named node carrying string attributes, child nodes and optional text.
//! Numeric attributes are written in hexadecimal or decimal and read back
//! with explicit required/default/range contracts. Binary blobs travel as
//! hex-encoded text children.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DescriptorError;

/// A document node: name, attributes, children, optional text content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    name: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Node>,
    text: Option<String>,
}

impl Node {
    /// Create an empty node with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            ..Node::default()
        }
    }

    /// Node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw attribute value, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set an attribute to an already-formatted value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Set a numeric attribute in hexadecimal, zero-padded to `width` digits.
    pub fn set_hex_attr(&mut self, name: &str, value: u64, width: usize) {
        self.set_attr(name, format!("0x{value:0width$X}"));
    }

    /// Set a numeric attribute in decimal.
    pub fn set_dec_attr(&mut self, name: &str, value: u64) {
        self.set_attr(name, value.to_string());
    }

    /// Read a numeric attribute with an explicit presence/range contract.
    ///
    /// Absent and `required`: [`DescriptorError::MissingAttribute`].
    /// Absent and optional: `default`. Present but not a number:
    /// [`DescriptorError::MalformedAttribute`]. Present but outside
    /// `min..=max`: [`DescriptorError::AttributeOutOfRange`].
    ///
    /// Values are accepted in decimal or with a `0x`/`0X` prefix.
    pub fn int_attr_in_range(
        &self,
        name: &'static str,
        required: bool,
        default: u64,
        min: u64,
        max: u64,
    ) -> Result<u64, DescriptorError> {
        let raw = match self.attr(name) {
            Some(raw) => raw,
            None if required => return Err(DescriptorError::MissingAttribute(name)),
            None => return Ok(default),
        };
        let value = parse_int(raw).ok_or_else(|| DescriptorError::MalformedAttribute {
            name,
            value: raw.to_string(),
        })?;
        if value < min || value > max {
            return Err(DescriptorError::AttributeOutOfRange {
                name,
                value,
                min,
                max,
            });
        }
        Ok(value)
    }

    /// Append a child node.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// First child with the given name, if any.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Set the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Text content, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Append a child holding `data` as hex text. Empty data adds no child.
    pub fn add_hex_text_child(&mut self, name: &str, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let mut child = Node::new(name);
        child.set_text(to_hex(data));
        self.add_child(child);
    }

    /// Decode the hex text child with the given name.
    ///
    /// Returns `Ok(None)` when the child is absent, the decoded bytes when
    /// present, or [`DescriptorError::MalformedHex`] when its text is not
    /// valid hexadecimal. ASCII whitespace between digits is tolerated.
    pub fn hex_text_child(&self, name: &str) -> Result<Option<Vec<u8>>, DescriptorError> {
        match self.child(name) {
            None => Ok(None),
            Some(child) => from_hex(child.text().unwrap_or("")).map(Some),
        }
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer.
fn parse_int(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

/// Encode bytes as continuous uppercase hex pairs.
fn to_hex(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        out.push_str(&format!("{byte:02X}"));
    }
    out
}

/// Decode hex text, ignoring ASCII whitespace.
fn from_hex(text: &str) -> Result<Vec<u8>, DescriptorError> {
    let mut out = Vec::new();
    let mut pending: Option<u8> = None;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            continue;
        }
        let digit = c
            .to_digit(16)
            .ok_or_else(|| DescriptorError::MalformedHex(text.to_string()))? as u8;
        match pending.take() {
            Some(high) => out.push((high << 4) | digit),
            None => pending = Some(digit),
        }
    }
    if pending.is_some() {
        // Odd number of digits
        return Err(DescriptorError::MalformedHex(text.to_string()));
    }
    Ok(out)
}

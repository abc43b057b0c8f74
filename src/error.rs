//! Error types for descriptor encoding, parsing and document mapping.

use thiserror::Error;

/// Errors that can occur while decoding a descriptor from its binary form
/// or mapping it to/from its document form.
///
/// All of these are non-fatal: a failed decode means "no usable descriptor
/// here", and the caller decides whether to skip, log or surface it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// Binary payload is too short to contain the fixed header.
    #[error("Descriptor payload too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    /// A required document attribute is absent.
    #[error("Missing required attribute '{0}'")]
    MissingAttribute(&'static str),

    /// A document attribute is outside its declared bit width.
    #[error("Attribute '{name}' out of range: {value} (allowed: {min}..={max})")]
    AttributeOutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// A document attribute is not parseable as a number.
    #[error("Malformed attribute '{name}': {value:?}")]
    MalformedAttribute { name: &'static str, value: String },

    /// A hex-encoded text child does not decode as hexadecimal.
    #[error("Malformed hexadecimal text: {0}")]
    MalformedHex(String),

    /// Private data exceeds the maximum encodable descriptor size.
    #[error("Private data too large: {len} bytes (max: {max})")]
    PrivateDataTooLarge { len: usize, max: usize },

    /// Document node has the wrong name for this descriptor.
    #[error("Wrong node name: expected '{expected}', got '{actual}'")]
    WrongNodeName {
        expected: &'static str,
        actual: String,
    },

    /// No codec is registered for the given descriptor tag.
    #[error("Unknown descriptor tag: 0x{0:02X}")]
    UnknownDescriptorTag(u8),
}

//! Descriptor codec registry.
//!
//! Tables carry many descriptor kinds, distinguished by an 8-bit tag whose
//! meaning can depend on the signaling standard in force. The registry maps
//! `(tag, standard)` to a codec exposing a uniform capability set, so a
//! table walker can dispatch decode/display without knowing the concrete
//! descriptor types.
//!
//! The table is populated explicitly inside a [`Lazy`], built on first use:
//! initialization order is deterministic and concurrent reads afterwards
//! need no locking.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::access_control::AccessControlCodec;
use crate::display::TableContext;
use crate::error::DescriptorError;
use crate::node::Node;

/// Signaling standard a descriptor tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Standard {
    /// ISDB (ARIB).
    Isdb,
    /// DVB (ETSI).
    Dvb,
    /// ATSC.
    Atsc,
}

/// Uniform capability set every registered descriptor codec exposes.
///
/// Codecs are stateless: each method is a pure transformation over the
/// caller-supplied payload or document node.
pub trait DescriptorCodec: Send + Sync {
    /// Descriptor tag this codec handles.
    fn tag(&self) -> u8;

    /// Standard under which the tag is defined.
    fn standard(&self) -> Standard;

    /// Name of the descriptor's document node.
    fn node_name(&self) -> &'static str;

    /// Decode a binary payload and build its document form.
    fn to_node(&self, payload: &[u8]) -> Result<Node, DescriptorError>;

    /// Parse a document node and encode its binary form.
    fn from_node(&self, node: &Node) -> Result<Bytes, DescriptorError>;

    /// Render a raw payload as a human-readable report.
    fn display(
        &self,
        out: &mut dyn fmt::Write,
        payload: &[u8],
        context: TableContext,
        indent: usize,
    ) -> fmt::Result;
}

/// Process-wide codec lookup table.
pub struct Registry {
    by_tag: HashMap<(u8, Standard), &'static dyn DescriptorCodec>,
    by_node_name: HashMap<&'static str, &'static dyn DescriptorCodec>,
}

static ACCESS_CONTROL: AccessControlCodec = AccessControlCodec;

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry {
        by_tag: HashMap::new(),
        by_node_name: HashMap::new(),
    };
    registry.register(&ACCESS_CONTROL);
    registry
});

/// The process-wide registry, built on first access.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

impl Registry {
    fn register(&mut self, codec: &'static dyn DescriptorCodec) {
        debug!(
            "registering descriptor codec '{}' (tag 0x{:02X}, {:?})",
            codec.node_name(),
            codec.tag(),
            codec.standard()
        );
        self.by_tag.insert((codec.tag(), codec.standard()), codec);
        self.by_node_name.insert(codec.node_name(), codec);
    }

    /// Look up a codec by descriptor tag and standard.
    pub fn lookup(&self, tag: u8, standard: Standard) -> Option<&'static dyn DescriptorCodec> {
        self.by_tag.get(&(tag, standard)).copied()
    }

    /// Look up a codec by document node name.
    pub fn lookup_node_name(&self, name: &str) -> Option<&'static dyn DescriptorCodec> {
        self.by_node_name.get(name).copied()
    }

    /// Look up by tag, as an error when no codec is registered.
    pub fn require(
        &self,
        tag: u8,
        standard: Standard,
    ) -> Result<&'static dyn DescriptorCodec, DescriptorError> {
        self.lookup(tag, standard)
            .ok_or(DescriptorError::UnknownDescriptorTag(tag))
    }
}

//! ISDB access-control descriptor (ARIB STD-B10, tag 0xF6).
//!
//! Carries the CA_system_id, the transmission route and the PID of the
//! conditional-access stream, plus free-form private CA data. The same
//! descriptor signals EMM delivery when it appears in a CAT and ECM
//! delivery when it appears in a PMT.
//!
//! Payload layout (big-endian):
//!
//! ```text
//! +----------------+-----+---------------+------------------+
//! | CA_system_id   | TT  |     PID       |   private_data   |
//! +----------------+-----+---------------+------------------+
//! |    16 bits     |3bits|    13 bits    |  to end of span  |
//! ```
//!
//! The private-data tail has no length prefix of its own; its boundary is
//! the descriptor boundary supplied by the enclosing section framework.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::display::{self, TableContext};
use crate::error::DescriptorError;
use crate::names::{self, NameCategory};
use crate::node::Node;
use crate::registry::{DescriptorCodec, Standard};

/// Descriptor tag of the ISDB access-control descriptor.
pub const TAG: u8 = 0xF6;

/// Document node name for this descriptor.
pub const NODE_NAME: &str = "ISDB_access_control_descriptor";

/// Maximum descriptor payload size (8-bit length field).
pub const MAX_DESCRIPTOR_SIZE: usize = 255;

/// Maximum private-data length: payload minus the 4-byte fixed header.
pub const MAX_PRIVATE_DATA: usize = MAX_DESCRIPTOR_SIZE - 4;

/// Transmission type for the broadcast route (the ARIB default).
pub const TRANSMISSION_BROADCAST: u8 = 7;

/// The null PID (0x1FFF).
pub const PID_NULL: u16 = 0x1FFF;

/// ISDB access-control descriptor.
///
/// A plain value type: constructing or parsing one always yields a fully
/// populated descriptor, and `transmission_type`/`pid` coming out of
/// [`parse`](Self::parse) or [`from_node`](Self::from_node) are already
/// masked to their 3-bit/13-bit widths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlDescriptor {
    /// CA system id.
    pub ca_system_id: u16,
    /// Transmission type (3 bits, 7 = broadcast route).
    pub transmission_type: u8,
    /// PID of the conditional-access stream (13 bits).
    pub pid: u16,
    /// Private CA data, carried verbatim.
    pub private_data: Vec<u8>,
}

impl AccessControlDescriptor {
    /// Create a descriptor for the broadcast route with no private data.
    pub fn new(ca_system_id: u16, pid: u16) -> Self {
        AccessControlDescriptor {
            ca_system_id,
            transmission_type: TRANSMISSION_BROADCAST,
            pid: pid & 0x1FFF,
            private_data: Vec::new(),
        }
    }

    /// Encode the descriptor payload (without tag/length header).
    ///
    /// `transmission_type` and `pid` are masked to their bit widths on the
    /// way out. Fails with [`DescriptorError::PrivateDataTooLarge`] when the
    /// private data would not fit an encodable descriptor.
    pub fn encode(&self) -> Result<Bytes, DescriptorError> {
        if self.private_data.len() > MAX_PRIVATE_DATA {
            return Err(DescriptorError::PrivateDataTooLarge {
                len: self.private_data.len(),
                max: MAX_PRIVATE_DATA,
            });
        }

        let mut buf = BytesMut::with_capacity(4 + self.private_data.len());
        buf.put_u16(self.ca_system_id);
        buf.put_u16((((self.transmission_type & 0x07) as u16) << 13) | (self.pid & 0x1FFF));
        buf.put_slice(&self.private_data);
        Ok(buf.freeze())
    }

    /// Encode the full descriptor: tag byte, length byte, payload.
    pub fn encode_with_header(&self) -> Result<Bytes, DescriptorError> {
        let payload = self.encode()?;
        let mut buf = BytesMut::with_capacity(2 + payload.len());
        buf.put_u8(TAG);
        buf.put_u8(payload.len() as u8);
        buf.put_slice(&payload);
        Ok(buf.freeze())
    }

    /// Parse a descriptor from its payload (after tag and length).
    ///
    /// The caller delimits the span: everything past the 4-byte fixed
    /// header is taken as private data, whatever its length.
    pub fn parse(payload: &[u8]) -> Result<Self, DescriptorError> {
        if payload.len() < 4 {
            return Err(DescriptorError::TooShort {
                expected: 4,
                actual: payload.len(),
            });
        }

        let ca_system_id = u16::from_be_bytes([payload[0], payload[1]]);
        let transmission_type = (payload[2] >> 5) & 0x07;
        let pid = u16::from_be_bytes([payload[2], payload[3]]) & 0x1FFF;

        Ok(AccessControlDescriptor {
            ca_system_id,
            transmission_type,
            pid,
            private_data: payload[4..].to_vec(),
        })
    }

    /// Build the document form of the descriptor.
    pub fn to_node(&self) -> Node {
        let mut node = Node::new(NODE_NAME);
        node.set_hex_attr("CA_system_id", self.ca_system_id as u64, 4);
        node.set_dec_attr("transmission_type", self.transmission_type as u64);
        node.set_hex_attr("PID", self.pid as u64, 4);
        node.add_hex_text_child("private_data", &self.private_data);
        node
    }

    /// Parse the document form of the descriptor.
    ///
    /// `CA_system_id` and `PID` are required; `transmission_type` defaults
    /// to the broadcast route; `private_data` is an optional hex child.
    /// Any failure yields an error, never a partially populated value.
    pub fn from_node(node: &Node) -> Result<Self, DescriptorError> {
        if node.name() != NODE_NAME {
            return Err(DescriptorError::WrongNodeName {
                expected: NODE_NAME,
                actual: node.name().to_string(),
            });
        }

        let ca_system_id = node.int_attr_in_range("CA_system_id", true, 0, 0, 0xFFFF)? as u16;
        let transmission_type =
            node.int_attr_in_range("transmission_type", false, TRANSMISSION_BROADCAST as u64, 0, 7)?
                as u8;
        let pid = node.int_attr_in_range("PID", true, 0, 0, 0x1FFF)? as u16;
        let private_data = node.hex_text_child("private_data")?.unwrap_or_default();

        if private_data.len() > MAX_PRIVATE_DATA {
            return Err(DescriptorError::PrivateDataTooLarge {
                len: private_data.len(),
                max: MAX_PRIVATE_DATA,
            });
        }

        Ok(AccessControlDescriptor {
            ca_system_id,
            transmission_type,
            pid,
            private_data,
        })
    }

    /// Render raw descriptor bytes as a human-readable report.
    ///
    /// Works on the raw payload rather than a parsed value so that even
    /// truncated descriptors produce output: anything shorter than the
    /// fixed header degrades to a plain hex dump. The enclosing table kind
    /// picks the PID label (EMM in a CAT, ECM in a PMT, CA elsewhere).
    pub fn display(
        out: &mut dyn fmt::Write,
        payload: &[u8],
        context: TableContext,
        indent: usize,
    ) -> fmt::Result {
        if payload.len() < 4 {
            return display::display_extra_data(out, payload, indent);
        }

        let margin = " ".repeat(indent);
        let ca_system_id = u16::from_be_bytes([payload[0], payload[1]]);
        let transmission_type = (payload[2] >> 5) & 0x07;
        let pid = u16::from_be_bytes([payload[2], payload[3]]) & 0x1FFF;
        let pid_label = match context {
            TableContext::ConditionalAccessTable => "EMM",
            TableContext::ProgramMapTable => "ECM",
            TableContext::Other(_) => "CA",
        };

        writeln!(
            out,
            "{margin}CA System Id: {}",
            names::lookup(NameCategory::CaSystemId, ca_system_id as u32)
        )?;
        writeln!(
            out,
            "{margin}Transmission type: {}",
            names::lookup(NameCategory::CaTransmissionType, transmission_type as u32)
        )?;
        writeln!(out, "{margin}{pid_label} PID: 0x{pid:04X} ({pid})")?;

        display::display_private_data(out, "Private CA data", &payload[4..], indent)
    }
}

impl Default for AccessControlDescriptor {
    fn default() -> Self {
        AccessControlDescriptor::new(0, PID_NULL)
    }
}

/// Registry-facing codec for the access-control descriptor.
pub struct AccessControlCodec;

impl DescriptorCodec for AccessControlCodec {
    fn tag(&self) -> u8 {
        TAG
    }

    fn standard(&self) -> Standard {
        Standard::Isdb
    }

    fn node_name(&self) -> &'static str {
        NODE_NAME
    }

    fn to_node(&self, payload: &[u8]) -> Result<Node, DescriptorError> {
        Ok(AccessControlDescriptor::parse(payload)?.to_node())
    }

    fn from_node(&self, node: &Node) -> Result<Bytes, DescriptorError> {
        AccessControlDescriptor::from_node(node)?.encode()
    }

    fn display(
        &self,
        out: &mut dyn fmt::Write,
        payload: &[u8],
        context: TableContext,
        indent: usize,
    ) -> fmt::Result {
        AccessControlDescriptor::display(out, payload, context, indent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_reference_vector() {
        let desc = AccessControlDescriptor::new(0x0001, 0x0100);
        let encoded = desc.encode().unwrap();
        // Header word 2 = (7 << 13) | 0x0100 = 0xE100
        assert_eq!(&encoded[..], &[0x00, 0x01, 0xE1, 0x00]);

        let framed = desc.encode_with_header().unwrap();
        assert_eq!(&framed[..], &[TAG, 0x04, 0x00, 0x01, 0xE1, 0x00]);
    }

    #[test]
    fn test_parse_reference_vector() {
        let desc = AccessControlDescriptor::parse(&[0x00, 0x01, 0xE1, 0x00]).unwrap();
        assert_eq!(desc.ca_system_id, 0x0001);
        assert_eq!(desc.transmission_type, 7);
        assert_eq!(desc.pid, 0x0100);
        assert!(desc.private_data.is_empty());
    }

    #[test]
    fn test_parse_too_short() {
        let data = [0x00, 0x01, 0xE1];
        for len in 0..=data.len() {
            let err = AccessControlDescriptor::parse(&data[..len]);
            assert!(matches!(err, Err(DescriptorError::TooShort { .. })));
        }
        assert!(matches!(
            AccessControlDescriptor::parse(&[0x00, 0x01, 0xE1]),
            Err(DescriptorError::TooShort {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_binary_round_trip() {
        let desc = AccessControlDescriptor {
            ca_system_id: 0x0005,
            transmission_type: 3,
            pid: 0x1ABC,
            private_data: vec![0xDE, 0xAD, 0xBE, 0xEF],
        };
        let encoded = desc.encode().unwrap();
        assert_eq!(AccessControlDescriptor::parse(&encoded).unwrap(), desc);
    }

    #[test]
    fn test_parse_masks_fields() {
        // All bits set in word 2: top 3 are the transmission type, the
        // rest must never leak past the 13-bit PID mask.
        let desc = AccessControlDescriptor::parse(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(desc.transmission_type, 7);
        assert_eq!(desc.pid, 0x1FFF);

        for word in [0x0000u16, 0x2345, 0x8123, 0xE1FF, 0x5FFF] {
            let bytes = [0x00, 0x00, (word >> 8) as u8, word as u8];
            let desc = AccessControlDescriptor::parse(&bytes).unwrap();
            assert!(desc.pid <= 0x1FFF);
            assert!(desc.transmission_type <= 7);
            assert_eq!(desc.pid, word & 0x1FFF);
            assert_eq!(desc.transmission_type, (word >> 13) as u8);
        }
    }

    #[test]
    fn test_parse_keeps_tail_verbatim() {
        let payload = [0x00, 0x05, 0xE1, 0x00, 0x01, 0x02, 0x03];
        let desc = AccessControlDescriptor::parse(&payload).unwrap();
        assert_eq!(desc.private_data, vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_encode_rejects_oversized_private_data() {
        let mut desc = AccessControlDescriptor::new(0x0005, 0x0100);
        desc.private_data = vec![0xAA; MAX_PRIVATE_DATA];
        assert!(desc.encode().is_ok());

        desc.private_data.push(0xAA);
        assert!(matches!(
            desc.encode(),
            Err(DescriptorError::PrivateDataTooLarge {
                len,
                max: MAX_PRIVATE_DATA
            }) if len == MAX_PRIVATE_DATA + 1
        ));
    }

    #[test]
    fn test_document_round_trip() {
        let desc = AccessControlDescriptor {
            ca_system_id: 0x0005,
            transmission_type: 2,
            pid: 0x0911,
            private_data: vec![0xCA, 0xFE],
        };
        let node = desc.to_node();
        assert_eq!(node.name(), NODE_NAME);
        assert_eq!(node.attr("CA_system_id"), Some("0x0005"));
        assert_eq!(node.attr("transmission_type"), Some("2"));
        assert_eq!(node.attr("PID"), Some("0x0911"));
        assert_eq!(AccessControlDescriptor::from_node(&node).unwrap(), desc);
    }

    #[test]
    fn test_from_node_default_transmission_type() {
        let mut node = Node::new(NODE_NAME);
        node.set_hex_attr("CA_system_id", 0x0005, 4);
        node.set_hex_attr("PID", 0x0100, 4);
        let desc = AccessControlDescriptor::from_node(&node).unwrap();
        assert_eq!(desc.transmission_type, TRANSMISSION_BROADCAST);
        assert!(desc.private_data.is_empty());
    }

    #[test]
    fn test_from_node_rejects_out_of_range_pid() {
        let mut node = Node::new(NODE_NAME);
        node.set_hex_attr("CA_system_id", 0x0005, 4);
        node.set_hex_attr("PID", 0x2000, 4);
        assert!(matches!(
            AccessControlDescriptor::from_node(&node),
            Err(DescriptorError::AttributeOutOfRange {
                name: "PID",
                value: 0x2000,
                ..
            })
        ));
    }

    #[test]
    fn test_from_node_rejects_out_of_range_transmission_type() {
        let mut node = Node::new(NODE_NAME);
        node.set_hex_attr("CA_system_id", 0x0005, 4);
        node.set_hex_attr("PID", 0x0100, 4);
        node.set_dec_attr("transmission_type", 8);
        assert!(matches!(
            AccessControlDescriptor::from_node(&node),
            Err(DescriptorError::AttributeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_from_node_missing_required_attribute() {
        let mut node = Node::new(NODE_NAME);
        node.set_hex_attr("PID", 0x0100, 4);
        assert!(matches!(
            AccessControlDescriptor::from_node(&node),
            Err(DescriptorError::MissingAttribute("CA_system_id"))
        ));
    }

    #[test]
    fn test_from_node_wrong_name() {
        let node = Node::new("CA_descriptor");
        assert!(matches!(
            AccessControlDescriptor::from_node(&node),
            Err(DescriptorError::WrongNodeName { .. })
        ));
    }

    #[test]
    fn test_from_node_malformed_hex_child() {
        let mut node = Node::new(NODE_NAME);
        node.set_hex_attr("CA_system_id", 0x0005, 4);
        node.set_hex_attr("PID", 0x0100, 4);
        let mut child = Node::new("private_data");
        child.set_text("not hex");
        node.add_child(child);
        assert!(matches!(
            AccessControlDescriptor::from_node(&node),
            Err(DescriptorError::MalformedHex(_))
        ));
    }

    #[test]
    fn test_from_node_oversized_private_data() {
        let mut node = Node::new(NODE_NAME);
        node.set_hex_attr("CA_system_id", 0x0005, 4);
        node.set_hex_attr("PID", 0x0100, 4);
        node.add_hex_text_child("private_data", &vec![0xAA; MAX_PRIVATE_DATA + 1]);
        assert!(matches!(
            AccessControlDescriptor::from_node(&node),
            Err(DescriptorError::PrivateDataTooLarge { .. })
        ));
    }

    #[test]
    fn test_display_pid_label_by_context() {
        let payload = [0x00, 0x01, 0xE1, 0x00];

        let mut cat = String::new();
        AccessControlDescriptor::display(
            &mut cat,
            &payload,
            TableContext::ConditionalAccessTable,
            0,
        )
        .unwrap();
        assert!(cat.contains("EMM PID: 0x0100 (256)"));

        let mut pmt = String::new();
        AccessControlDescriptor::display(&mut pmt, &payload, TableContext::ProgramMapTable, 0)
            .unwrap();
        assert!(pmt.contains("ECM PID: 0x0100 (256)"));

        let mut other = String::new();
        AccessControlDescriptor::display(&mut other, &payload, TableContext::Other(0x40), 0)
            .unwrap();
        assert!(other.contains("CA PID: 0x0100 (256)"));
    }

    #[test]
    fn test_display_full_report() {
        let payload = [0x00, 0x05, 0xE1, 0x00, 0xDE, 0xAD];
        let mut out = String::new();
        AccessControlDescriptor::display(
            &mut out,
            &payload,
            TableContext::ConditionalAccessTable,
            2,
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  CA System Id: ARIB (B-CAS) (0x0005)");
        assert_eq!(lines[1], "  Transmission type: 7 (broadcast route)");
        assert_eq!(lines[2], "  EMM PID: 0x0100 (256)");
        assert_eq!(lines[3], "  Private CA data (2 bytes):");
        assert_eq!(lines[4], "    DE AD");
    }

    #[test]
    fn test_display_short_payload_degrades_to_dump() {
        let mut out = String::new();
        AccessControlDescriptor::display(
            &mut out,
            &[0x00, 0x01, 0xE1],
            TableContext::ProgramMapTable,
            0,
        )
        .unwrap();
        assert!(out.starts_with("Extra data (3 bytes):"));
        assert!(out.contains("00 01 E1"));

        // Zero bytes still succeed, producing no output at all.
        let mut empty = String::new();
        AccessControlDescriptor::display(&mut empty, &[], TableContext::Other(0), 4).unwrap();
        assert!(empty.is_empty());
    }
}

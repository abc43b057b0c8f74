//! Codecs for ISDB signaling descriptors.
//!
//! This crate implements the ISDB access-control descriptor (ARIB STD-B10,
//! tag 0xF6) in its three forms: the binary wire layout, a structured
//! attribute/child document, and a human-readable report. A small registry
//! dispatches descriptor tags to their codecs.
//!
//! # Wire Format
//!
//! ```text
//! +----------------+-----+---------------+------------------+
//! | CA_system_id   | TT  |     PID       |   private_data   |
//! +----------------+-----+---------------+------------------+
//! |  u16 BE        |3bits|    13 bits    |  to end of span  |
//! ```
//!
//! # Example
//!
//! ```rust
//! use isdb_descriptors::{AccessControlDescriptor, TableContext};
//!
//! // Binary round trip
//! let desc = AccessControlDescriptor::new(0x0005, 0x0100);
//! let encoded = desc.encode().unwrap();
//! assert_eq!(&encoded[..], &[0x00, 0x05, 0xE1, 0x00]);
//! assert_eq!(AccessControlDescriptor::parse(&encoded).unwrap(), desc);
//!
//! // Document round trip
//! let node = desc.to_node();
//! assert_eq!(AccessControlDescriptor::from_node(&node).unwrap(), desc);
//!
//! // Human-readable report
//! let mut report = String::new();
//! AccessControlDescriptor::display(
//!     &mut report,
//!     &encoded,
//!     TableContext::ConditionalAccessTable,
//!     2,
//! )
//! .unwrap();
//! assert!(report.contains("EMM PID: 0x0100 (256)"));
//! ```

pub mod access_control;
pub mod display;
pub mod error;
pub mod names;
pub mod node;
pub mod registry;

pub use access_control::{
    AccessControlCodec, AccessControlDescriptor, MAX_DESCRIPTOR_SIZE, MAX_PRIVATE_DATA, PID_NULL,
    TRANSMISSION_BROADCAST,
};
pub use display::{TableContext, TID_CAT, TID_PMT};
pub use error::DescriptorError;
pub use names::{lookup, NameCategory};
pub use node::Node;
pub use registry::{registry, DescriptorCodec, Registry, Standard};

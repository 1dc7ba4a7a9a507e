//! Reliability framing for a RakNet-style reliable UDP transport.
//!
//! An [`EncapsulatedPacket`] wraps one logical message with its reliability
//! mode, ordering and split metadata. It has two encodings: the wire format
//! sent inside datagrams, and a fixed-shape internal format used to hand a
//! packet to another thread or process.
//!
//! ```
//! use rak_encap::{EncapsulatedPacket, Reliability};
//!
//! let pkt = EncapsulatedPacket::new(Reliability::ReliableOrdered, vec![0x86, 0x01])
//!     .with_message_index(7)
//!     .with_ordering(3, 0);
//!
//! let wire = pkt.to_wire_bytes();
//! assert_eq!(wire.len(), pkt.get_total_length());
//!
//! let (decoded, used) = EncapsulatedPacket::decode_wire(&wire).unwrap();
//! assert_eq!(used, wire.len());
//! assert_eq!(decoded, pkt);
//! ```

pub mod protocol;
pub mod transport;

pub use protocol::encapsulated_packet::{EncapsulatedPacket, OrderInfo, SplitInfo};
pub use protocol::packet::DecodeError;
pub use protocol::reliability::Reliability;
pub use protocol::types::Sequence24;

//! Reliability modes and the predicates that decide field presence.
//!
//! Every codec in this crate asks these predicates which metadata to read or
//! write; nothing else encodes that rule.

use bytes::{Buf, BufMut};

use crate::protocol::packet::{DecodeError, RaknetEncodable};

/// Delivery guarantee of an encapsulated packet.
///
/// Discriminants are the ordinals used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Reliability {
    #[default]
    Unreliable = 0,
    UnreliableSequenced = 1,
    Reliable = 2,
    ReliableOrdered = 3,
    ReliableSequenced = 4,
    UnreliableWithAckReceipt = 5,
    ReliableWithAckReceipt = 6,
    ReliableOrderedWithAckReceipt = 7,
}

impl Reliability {
    pub const ALL: [Reliability; 8] = [
        Reliability::Unreliable,
        Reliability::UnreliableSequenced,
        Reliability::Reliable,
        Reliability::ReliableOrdered,
        Reliability::ReliableSequenced,
        Reliability::UnreliableWithAckReceipt,
        Reliability::ReliableWithAckReceipt,
        Reliability::ReliableOrderedWithAckReceipt,
    ];

    /// Carries a `message_index` used for duplicate and loss detection.
    pub fn is_reliable(self) -> bool {
        match self {
            Reliability::Reliable
            | Reliability::ReliableOrdered
            | Reliability::ReliableSequenced
            | Reliability::ReliableWithAckReceipt
            | Reliability::ReliableOrderedWithAckReceipt => true,
            Reliability::Unreliable
            | Reliability::UnreliableSequenced
            | Reliability::UnreliableWithAckReceipt => false,
        }
    }

    /// Carries an ordering index and channel.
    pub fn is_sequenced(self) -> bool {
        match self {
            Reliability::UnreliableSequenced
            | Reliability::ReliableOrdered
            | Reliability::ReliableSequenced
            | Reliability::ReliableOrderedWithAckReceipt => true,
            Reliability::Unreliable
            | Reliability::Reliable
            | Reliability::UnreliableWithAckReceipt
            | Reliability::ReliableWithAckReceipt => false,
        }
    }

    /// Strictly ordered delivery within the order channel.
    pub fn is_ordered(self) -> bool {
        matches!(
            self,
            Reliability::ReliableOrdered | Reliability::ReliableOrderedWithAckReceipt
        )
    }

    /// The sender wants to be told when the packet was delivered.
    pub fn has_ack_receipt(self) -> bool {
        matches!(
            self,
            Reliability::UnreliableWithAckReceipt
                | Reliability::ReliableWithAckReceipt
                | Reliability::ReliableOrderedWithAckReceipt
        )
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Reliability {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Reliability::ALL
            .get(value as usize)
            .copied()
            .ok_or(DecodeError::InvalidReliability(value))
    }
}

impl RaknetEncodable for Reliability {
    fn encode_raknet(&self, dst: &mut impl BufMut) {
        self.ordinal().encode_raknet(dst);
    }

    fn decode_raknet(src: &mut impl Buf) -> Result<Self, DecodeError> {
        Reliability::try_from(u8::decode_raknet(src)?)
    }
}

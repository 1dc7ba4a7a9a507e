//! A single framed message and its network encoding.
//!
//! Wire layout (big-endian unless noted):
//!
//! ```text
//! flags (1) | payload length in bits (2) | message index (3, LE)?
//!   | order index (3, LE) + order channel (1)? | split count (4) + id (2) + index (4)?
//!   | payload
//! ```
//!
//! The optional fields are present exactly when [`Reliability::is_reliable`],
//! [`Reliability::is_sequenced`] and the split bit say so.

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::protocol::{
    constants::{
        ENCAPSULATED_BASE_HEADER_SIZE, MAXIMUM_PAYLOAD_SIZE, MESSAGE_INDEX_SIZE, ORDERING_SIZE,
        SPLIT_INFO_SIZE,
    },
    header::EncapsulatedPacketHeader,
    packet::{DecodeError, RaknetEncodable},
    reliability::Reliability,
    types::Sequence24,
};

/// Fragment metadata of a split message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitInfo {
    /// Number of fragments in the group.
    pub count: u32,
    /// Group id shared by all fragments.
    pub id: u16,
    /// Position of this fragment.
    pub index: u32,
}

/// Ordering stream position of a sequenced or ordered packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderInfo {
    pub index: Sequence24,
    pub channel: u8,
}

/// One framed logical message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncapsulatedPacket {
    pub reliability: Reliability,
    /// Set by the sender when `reliability.is_reliable()`.
    pub message_index: Option<Sequence24>,
    /// Set by the sender when `reliability.is_sequenced()`.
    pub ordering: Option<OrderInfo>,
    pub split: Option<SplitInfo>,
    pub payload: Bytes,
    /// Only travels in the internal format.
    pub need_ack: bool,
    /// Only travels in the internal format.
    pub identifier_ack: Option<u32>,
}

impl EncapsulatedPacket {
    pub fn new(reliability: Reliability, payload: impl Into<Bytes>) -> Self {
        Self {
            reliability,
            message_index: None,
            ordering: None,
            split: None,
            payload: payload.into(),
            need_ack: false,
            identifier_ack: None,
        }
    }

    pub fn with_message_index(mut self, index: u32) -> Self {
        self.message_index = Some(Sequence24::new(index));
        self
    }

    pub fn with_ordering(mut self, index: u32, channel: u8) -> Self {
        self.ordering = Some(OrderInfo {
            index: Sequence24::new(index),
            channel,
        });
        self
    }

    pub fn with_split(mut self, count: u32, id: u16, index: u32) -> Self {
        self.split = Some(SplitInfo { count, id, index });
        self
    }

    pub fn with_ack_receipt(mut self, identifier: u32) -> Self {
        self.need_ack = true;
        self.identifier_ack = Some(identifier);
        self
    }

    pub fn has_split(&self) -> bool {
        self.split.is_some()
    }

    pub fn order_index(&self) -> Option<Sequence24> {
        self.ordering.map(|o| o.index)
    }

    pub fn order_channel(&self) -> Option<u8> {
        self.ordering.map(|o| o.channel)
    }

    pub fn header(&self) -> EncapsulatedPacketHeader {
        EncapsulatedPacketHeader {
            reliability: self.reliability,
            is_split: self.has_split(),
        }
    }

    /// Payload length as written in the header, in bits.
    pub fn bit_length(&self) -> u16 {
        debug_assert!(
            self.payload.len() <= MAXIMUM_PAYLOAD_SIZE,
            "payload too large for a single encapsulated packet"
        );
        (self.payload.len() << 3) as u16
    }

    /// Exact size of [`encode_wire`](Self::encode_wire) output, without encoding.
    pub fn get_total_length(&self) -> usize {
        let mut len = ENCAPSULATED_BASE_HEADER_SIZE + self.payload.len();
        if self.reliability.is_reliable() {
            len += MESSAGE_INDEX_SIZE;
        }
        if self.reliability.is_sequenced() {
            len += ORDERING_SIZE;
        }
        if self.has_split() {
            len += SPLIT_INFO_SIZE;
        }
        len
    }

    pub fn encode_wire(&self, dst: &mut impl BufMut) {
        self.encode_raknet(dst);
    }

    pub fn to_wire_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.get_total_length());
        self.encode_wire(&mut buf);
        buf.freeze()
    }

    /// Decodes one packet from the front of `src` and returns it together with
    /// the number of bytes it occupied. `src` itself is never partially consumed.
    pub fn decode_wire(src: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut cursor = src;
        let packet = Self::decode_raknet(&mut cursor)?;
        Ok((packet, src.len() - cursor.len()))
    }
}

impl RaknetEncodable for EncapsulatedPacket {
    fn encode_raknet(&self, dst: &mut impl BufMut) {
        self.header().encode_raknet(dst);
        self.bit_length().encode_raknet(dst);

        let rel = self.reliability;

        // A required index the sender never assigned goes out as zero.
        if rel.is_reliable() {
            self.message_index.unwrap_or_default().encode_raknet(dst);
        }

        if rel.is_sequenced() {
            let ordering = self.ordering.unwrap_or_default();
            ordering.index.encode_raknet(dst);
            ordering.channel.encode_raknet(dst);
        }

        if let Some(split) = &self.split {
            split.count.encode_raknet(dst);
            split.id.encode_raknet(dst);
            split.index.encode_raknet(dst);
        }

        dst.put_slice(&self.payload);
    }

    fn decode_raknet(src: &mut impl Buf) -> Result<Self, DecodeError> {
        if src.remaining() < ENCAPSULATED_BASE_HEADER_SIZE {
            return Err(DecodeError::TruncatedInput);
        }
        let header = EncapsulatedPacketHeader::decode_raknet(src)?;

        let bit_length = u16::decode_raknet(src)?;
        let payload_len = (bit_length as usize).div_ceil(8);

        let rel = header.reliability;

        let message_index = if rel.is_reliable() {
            Some(Sequence24::decode_raknet(src)?)
        } else {
            None
        };

        let ordering = if rel.is_sequenced() {
            let index = Sequence24::decode_raknet(src)?;
            let channel = u8::decode_raknet(src)?;
            Some(OrderInfo { index, channel })
        } else {
            None
        };

        let split = if header.is_split {
            let count = u32::decode_raknet(src)?;
            let id = u16::decode_raknet(src)?;
            let index = u32::decode_raknet(src)?;
            Some(SplitInfo { count, id, index })
        } else {
            None
        };

        if src.remaining() < payload_len {
            return Err(DecodeError::InvalidLength {
                declared: payload_len,
                remaining: src.remaining(),
            });
        }
        let payload = src.copy_to_bytes(payload_len);

        Ok(EncapsulatedPacket {
            reliability: rel,
            message_index,
            ordering,
            split,
            payload,
            need_ack: false,
            identifier_ack: None,
        })
    }
}

/// Hex dump of the wire encoding.
impl fmt::Display for EncapsulatedPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_wire_bytes().iter() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<&EncapsulatedPacket> for Bytes {
    fn from(packet: &EncapsulatedPacket) -> Self {
        packet.to_wire_bytes()
    }
}

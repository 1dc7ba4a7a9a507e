//! Fixed-shape encoding used to hand an [`EncapsulatedPacket`] across a
//! thread or process boundary. Never sent over the network.
//!
//! ```text
//! reliability (1) | payload length (4) | identifier_ack or -1 (4)
//!   | order channel (1, sequenced only) | payload
//! ```
//!
//! Neither the message index, the order index nor split metadata travel in
//! this format; a sequenced packet comes back with order index zero.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::protocol::{
    constants::{IDENTIFIER_ACK_NONE, INTERNAL_HEADER_SIZE},
    encapsulated_packet::{EncapsulatedPacket, OrderInfo},
    packet::{DecodeError, RaknetEncodable},
    reliability::Reliability,
};

impl EncapsulatedPacket {
    /// Exact size of [`encode_internal`](Self::encode_internal) output.
    pub fn internal_length(&self) -> usize {
        INTERNAL_HEADER_SIZE + usize::from(self.reliability.is_sequenced()) + self.payload.len()
    }

    pub fn encode_internal(&self, dst: &mut impl BufMut) {
        self.reliability.encode_raknet(dst);
        (self.payload.len() as u32).encode_raknet(dst);
        // Written for every reliability so the far side can always correlate.
        self.identifier_ack
            .unwrap_or(IDENTIFIER_ACK_NONE)
            .encode_raknet(dst);
        if self.reliability.is_sequenced() {
            self.order_channel().unwrap_or_default().encode_raknet(dst);
        }
        dst.put_slice(&self.payload);
    }

    pub fn to_internal_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.internal_length());
        self.encode_internal(&mut buf);
        buf.freeze()
    }

    /// Inverse of [`encode_internal`](Self::encode_internal); returns the packet
    /// and the number of bytes it occupied.
    pub fn decode_internal(src: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut cursor = src;
        let packet = Self::decode_internal_buf(&mut cursor)?;
        Ok((packet, src.len() - cursor.len()))
    }

    pub fn decode_internal_buf(src: &mut impl Buf) -> Result<Self, DecodeError> {
        if src.remaining() < INTERNAL_HEADER_SIZE {
            return Err(DecodeError::TruncatedInput);
        }
        let reliability = Reliability::decode_raknet(src)?;
        let length = u32::decode_raknet(src)? as usize;
        let identifier_ack = match u32::decode_raknet(src)? {
            IDENTIFIER_ACK_NONE => None,
            id => Some(id),
        };

        let ordering = if reliability.is_sequenced() {
            Some(OrderInfo {
                channel: u8::decode_raknet(src)?,
                ..OrderInfo::default()
            })
        } else {
            None
        };

        if src.remaining() < length {
            return Err(DecodeError::TruncatedInput);
        }
        let payload = src.copy_to_bytes(length);

        Ok(EncapsulatedPacket {
            reliability,
            message_index: None,
            ordering,
            split: None,
            payload,
            need_ack: identifier_ack.is_some(),
            identifier_ack,
        })
    }
}

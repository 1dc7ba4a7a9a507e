use bytes::{Buf, BufMut};

use crate::protocol::packet::{DecodeError, RaknetEncodable};

impl RaknetEncodable for u8 {
    fn encode_raknet(&self, dst: &mut impl BufMut) {
        dst.put_u8(*self);
    }
    fn decode_raknet(src: &mut impl Buf) -> Result<Self, DecodeError> {
        if !src.has_remaining() {
            return Err(DecodeError::TruncatedInput);
        }
        Ok(src.get_u8())
    }
}

mod primitives;
mod sequence;

pub use sequence::Sequence24;

use crate::protocol::packet::{DecodeError, RaknetEncodable};
use bytes::{Buf, BufMut};
use std::mem;

macro_rules! impl_raknet_int {
    ($ty:ty, $put:ident, $get:ident) => {
        impl RaknetEncodable for $ty {
            fn encode_raknet(&self, dst: &mut impl BufMut) {
                dst.$put(*self as _);
            }

            fn decode_raknet(src: &mut impl Buf) -> Result<Self, DecodeError> {
                let size = mem::size_of::<$ty>();
                if src.remaining() < size {
                    return Err(DecodeError::TruncatedInput);
                }
                Ok(src.$get() as $ty)
            }
        }
    };
}

// Unsigned big-endian ints:
impl_raknet_int!(u16, put_u16, get_u16);
impl_raknet_int!(u32, put_u32, get_u32);

/// 3-byte little-endian unsigned integer ("triad").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U24LE(pub u32);

impl RaknetEncodable for U24LE {
    fn encode_raknet(&self, dst: &mut impl BufMut) {
        let v = self.0;
        dst.put_u8((v & 0xFF) as u8);
        dst.put_u8(((v >> 8) & 0xFF) as u8);
        dst.put_u8(((v >> 16) & 0xFF) as u8);
    }

    fn decode_raknet(src: &mut impl Buf) -> Result<Self, DecodeError> {
        if src.remaining() < 3 {
            return Err(DecodeError::TruncatedInput);
        }
        let b0 = src.get_u8() as u32;
        let b1 = src.get_u8() as u32;
        let b2 = src.get_u8() as u32;
        Ok(U24LE(b0 | (b1 << 8) | (b2 << 16)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn triad_is_little_endian() {
        let mut buf = BytesMut::new();
        U24LE(0x0A0B0C).encode_raknet(&mut buf);
        assert_eq!(&buf[..], &[0x0C, 0x0B, 0x0A]);

        let mut slice = &buf[..];
        assert_eq!(U24LE::decode_raknet(&mut slice).unwrap(), U24LE(0x0A0B0C));
        assert!(slice.is_empty());
    }

    #[test]
    fn triad_drops_high_byte() {
        let mut buf = BytesMut::new();
        U24LE(0xFF12_3456).encode_raknet(&mut buf);
        assert_eq!(&buf[..], &[0x56, 0x34, 0x12]);
    }

    #[test]
    fn short_reads_are_truncated_input() {
        let mut two: &[u8] = &[0x01, 0x02];
        assert_eq!(
            U24LE::decode_raknet(&mut two).unwrap_err(),
            DecodeError::TruncatedInput
        );

        let mut three: &[u8] = &[0x01, 0x02, 0x03];
        assert_eq!(
            u32::decode_raknet(&mut three).unwrap_err(),
            DecodeError::TruncatedInput
        );
    }

    #[test]
    fn ints_are_big_endian() {
        let mut buf = BytesMut::new();
        0x0102u16.encode_raknet(&mut buf);
        0x0304_0506u32.encode_raknet(&mut buf);
        assert_eq!(&buf[..], &[1, 2, 3, 4, 5, 6]);

        let mut slice = &buf[..];
        assert_eq!(u16::decode_raknet(&mut slice).unwrap(), 0x0102);
        assert_eq!(u32::decode_raknet(&mut slice).unwrap(), 0x0304_0506);
    }
}

mod error;

pub use error::DecodeError;

use bytes::{Buf, BufMut};

/// Trait for types that know how to encode/decode themselves using
/// the RakNet wire format.
///
/// Decoders must check `remaining()` before every read so that a short
/// buffer surfaces as [`DecodeError::TruncatedInput`] instead of a panic.
pub trait RaknetEncodable: Sized {
    /// Encode this value into the destination buffer.
    fn encode_raknet(&self, dst: &mut impl BufMut);

    /// Decode a value of this type from the source buffer.
    fn decode_raknet(src: &mut impl Buf) -> Result<Self, DecodeError>;
}

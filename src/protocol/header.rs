use bitflags::bitflags;
use bytes::{Buf, BufMut};

use crate::protocol::{
    constants::RELIABILITY_SHIFT,
    packet::{DecodeError, RaknetEncodable},
    reliability::Reliability,
};

bitflags! {
    /// Layout of the first byte of an encapsulated packet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct EncapsulationFlags: u8 {
        const RELIABILITY = 0b1110_0000;
        const SPLIT       = 0b0001_0000;
    }
}

/// Decoded flags byte: reliability ordinal in the top 3 bits, then the split bit.
/// The low nibble is ignored on read and written as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncapsulatedPacketHeader {
    pub reliability: Reliability,
    pub is_split: bool,
}

impl EncapsulatedPacketHeader {
    pub fn flags(&self) -> EncapsulationFlags {
        let mut flags = EncapsulationFlags::from_bits_retain(
            self.reliability.ordinal() << RELIABILITY_SHIFT,
        );
        flags.set(EncapsulationFlags::SPLIT, self.is_split);
        flags
    }
}

impl RaknetEncodable for EncapsulatedPacketHeader {
    fn encode_raknet(&self, dst: &mut impl BufMut) {
        dst.put_u8(self.flags().bits());
    }

    fn decode_raknet(src: &mut impl Buf) -> Result<Self, DecodeError> {
        let flags = EncapsulationFlags::from_bits_truncate(u8::decode_raknet(src)?);
        // Three bits can only hold defined ordinals.
        let reliability = Reliability::try_from(
            (flags & EncapsulationFlags::RELIABILITY).bits() >> RELIABILITY_SHIFT,
        )?;
        Ok(Self {
            reliability,
            is_split: flags.contains(EncapsulationFlags::SPLIT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn packs_reliability_and_split() {
        let header = EncapsulatedPacketHeader {
            reliability: Reliability::ReliableOrdered,
            is_split: true,
        };
        let mut buf = BytesMut::new();
        header.encode_raknet(&mut buf);
        assert_eq!(&buf[..], &[0b0111_0000]);
    }

    #[test]
    fn low_bits_are_ignored() {
        let mut src: &[u8] = &[0b0100_0111];
        let header = EncapsulatedPacketHeader::decode_raknet(&mut src).unwrap();
        assert_eq!(header.reliability, Reliability::Reliable);
        assert!(!header.is_split);
    }

    #[test]
    fn every_ordinal_survives_the_shift() {
        for rel in Reliability::ALL {
            let header = EncapsulatedPacketHeader {
                reliability: rel,
                is_split: false,
            };
            let mut buf = BytesMut::new();
            header.encode_raknet(&mut buf);
            let mut src = &buf[..];
            assert_eq!(
                EncapsulatedPacketHeader::decode_raknet(&mut src).unwrap(),
                header
            );
        }
    }
}

use std::cmp::Ordering;

use crate::protocol::{packet::RaknetEncodable, types::U24LE};

const MODULO: u32 = 1 << 24;
const MASK: u32 = MODULO - 1;
const HALF: u32 = MODULO / 2;

/// Wrapping 24-bit counter carried as a little-endian triad.
///
/// Used for `message_index` and the ordering index. The codec only carries
/// these values; allocating them is up to the session layer.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Sequence24(u32);

impl Sequence24 {
    pub const fn new(v: u32) -> Sequence24 {
        Sequence24(v & MASK)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> Sequence24 {
        Sequence24::new(self.0 + 1)
    }
}

impl From<u32> for Sequence24 {
    fn from(v: u32) -> Self {
        Sequence24::new(v)
    }
}

// Serial-number ordering: `b > a` when `b` is less than half the ring ahead.
impl Ord for Sequence24 {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.0 == other.0 {
            return Ordering::Equal;
        }
        let ahead = other.0.wrapping_sub(self.0) & MASK;
        if ahead < HALF {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

impl PartialOrd for Sequence24 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Sequence24> for U24LE {
    fn from(seq: Sequence24) -> Self {
        U24LE(seq.value())
    }
}

impl From<U24LE> for Sequence24 {
    fn from(raw: U24LE) -> Self {
        Sequence24::new(raw.0)
    }
}

impl RaknetEncodable for Sequence24 {
    fn encode_raknet(&self, dst: &mut impl bytes::BufMut) {
        U24LE::from(*self).encode_raknet(dst);
    }

    fn decode_raknet(
        src: &mut impl bytes::Buf,
    ) -> Result<Self, crate::protocol::packet::DecodeError> {
        Ok(U24LE::decode_raknet(src)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_next() {
        let max = Sequence24::new(MASK);
        assert_eq!(max.next().value(), 0);
    }

    #[test]
    fn new_masks_to_24_bits() {
        assert_eq!(Sequence24::new(0x0100_0005).value(), 5);
    }

    #[test]
    fn ordering_handles_wrap() {
        let a = Sequence24::new(MASK);
        let b = a.next();
        assert!(b > a);
        assert!(a < b);
        assert!(Sequence24::new(10) > Sequence24::new(3));
        assert_eq!(Sequence24::new(7).cmp(&Sequence24::new(7)), Ordering::Equal);
    }
}

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::protocol::{
    constants::{IP_HEADER_SIZE, MAXIMUM_PAYLOAD_SIZE, RAKNET_DATAGRAM_HEADER_SIZE, UDP_HEADER_SIZE},
    encapsulated_packet::EncapsulatedPacket,
    packet::DecodeError,
};

/// Why a packet was not added to a [`FrameBatch`]. The packet is handed back.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PackError {
    #[error("packet of {} bytes does not fit the remaining datagram budget", .0.get_total_length())]
    BatchFull(EncapsulatedPacket),
    #[error(
        "payload of {} bytes exceeds the {}-byte encapsulation limit",
        .0.payload.len(),
        MAXIMUM_PAYLOAD_SIZE
    )]
    PayloadTooLarge(EncapsulatedPacket),
}

/// Lazily decodes the encapsulated packets concatenated in a datagram payload.
///
/// Yields `Some(Err(_))` once on the first malformed packet and then stops,
/// since the offset of anything after it is unknown.
pub struct Frames<'a> {
    src: &'a [u8],
    failed: bool,
}

impl<'a> Frames<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, failed: false }
    }

    /// Bytes not consumed yet.
    pub fn remainder(&self) -> &'a [u8] {
        self.src
    }
}

impl Iterator for Frames<'_> {
    type Item = Result<EncapsulatedPacket, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.src.is_empty() {
            return None;
        }
        match EncapsulatedPacket::decode_wire(self.src) {
            Ok((pkt, used)) => {
                self.src = &self.src[used..];
                Some(Ok(pkt))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Decodes every encapsulated packet of a datagram payload, all or nothing.
pub fn decode_frames(src: &[u8]) -> Result<Vec<EncapsulatedPacket>, DecodeError> {
    Frames::new(src).collect()
}

/// Packs encapsulated packets into one datagram payload under a byte budget.
#[derive(Debug, Clone)]
pub struct FrameBatch {
    budget: usize,
    len: usize,
    packets: Vec<EncapsulatedPacket>,
}

impl FrameBatch {
    pub fn with_budget(budget: usize) -> Self {
        Self {
            budget,
            len: 0,
            packets: Vec::new(),
        }
    }

    /// Budget left for encapsulated packets once IP, UDP and datagram headers
    /// are taken out of `mtu`.
    pub fn for_mtu(mtu: usize) -> Self {
        Self::with_budget(
            mtu.saturating_sub(IP_HEADER_SIZE + UDP_HEADER_SIZE + RAKNET_DATAGRAM_HEADER_SIZE),
        )
    }

    /// Adds `packet` if it fits, otherwise hands it back untouched.
    ///
    /// Payloads whose bit length cannot be expressed in the header are
    /// rejected regardless of the budget.
    pub fn try_push(&mut self, packet: EncapsulatedPacket) -> Result<(), PackError> {
        if packet.payload.len() > MAXIMUM_PAYLOAD_SIZE {
            return Err(PackError::PayloadTooLarge(packet));
        }
        let size = packet.get_total_length();
        if self.len + size > self.budget {
            return Err(PackError::BatchFull(packet));
        }
        self.len += size;
        self.packets.push(packet);
        Ok(())
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn encoded_len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        for pkt in &self.packets {
            pkt.encode_wire(dst);
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len);
        self.encode(&mut buf);
        buf.freeze()
    }

    pub fn into_packets(self) -> Vec<EncapsulatedPacket> {
        self.packets
    }
}

/// Packs packets, already indexed by the session layer, into wire datagram
/// payloads that fit `mtu`.
///
/// A packet too large for an empty datagram still gets one of its own;
/// splitting it is the session layer's job. Fails on the first payload that
/// cannot be encapsulated at all.
pub fn pack_datagrams(
    packets: impl IntoIterator<Item = EncapsulatedPacket>,
    mtu: usize,
) -> Result<Vec<Bytes>, PackError> {
    let mut out = Vec::new();
    let mut batch = FrameBatch::for_mtu(mtu);

    for pkt in packets {
        let pkt = match batch.try_push(pkt) {
            Ok(()) => continue,
            Err(PackError::BatchFull(pkt)) => pkt,
            Err(e) => return Err(e),
        };
        if !batch.is_empty() {
            out.push(batch.to_bytes());
            batch = FrameBatch::for_mtu(mtu);
        }
        if let Err(PackError::BatchFull(pkt)) = batch.try_push(pkt) {
            tracing::debug!(
                len = pkt.get_total_length(),
                budget = batch.budget(),
                "packet exceeds datagram budget"
            );
            out.push(pkt.to_wire_bytes());
        }
    }

    if !batch.is_empty() {
        out.push(batch.to_bytes());
    }
    Ok(out)
}

pub const MAXIMUM_MTU_SIZE: u16 = 1400;

/// Bit offset of the reliability ordinal inside the encapsulation flags byte.
pub const RELIABILITY_SHIFT: u8 = 5;

/// Flags byte + 16-bit payload length (in bits).
pub const ENCAPSULATED_BASE_HEADER_SIZE: usize = 3;

/// Triad message index.
pub const MESSAGE_INDEX_SIZE: usize = 3;

/// Triad order index + order channel byte.
pub const ORDERING_SIZE: usize = 4;

/// Split count (u32) + split id (u16) + split index (u32).
pub const SPLIT_INFO_SIZE: usize = 10;

/// Maximum size of an [EncapsulatedPacket] header.
///
/// [EncapsulatedPacket]: crate::protocol::encapsulated_packet::EncapsulatedPacket
pub const MAXIMUM_ENCAPSULATED_HEADER_SIZE: usize =
    ENCAPSULATED_BASE_HEADER_SIZE + MESSAGE_INDEX_SIZE + ORDERING_SIZE + SPLIT_INFO_SIZE;

/// Largest payload whose length in bits still fits the 16-bit header field.
pub const MAXIMUM_PAYLOAD_SIZE: usize = (u16::MAX >> 3) as usize;

/// Reliability byte + payload length + ACK identifier.
pub const INTERNAL_HEADER_SIZE: usize = 9;

/// Written in place of an absent `identifier_ack` in the internal format (-1).
pub const IDENTIFIER_ACK_NONE: u32 = u32::MAX;

pub const UDP_HEADER_SIZE: usize = 8;

pub const IP_HEADER_SIZE: usize = 20;

pub const RAKNET_DATAGRAM_HEADER_SIZE: usize = 4;

/// Backend-server id prepended to every datagram on the internal link.
pub const LINK_PREFIX_SIZE: usize = 1;

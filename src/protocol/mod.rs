//! RakNet encapsulated-packet primitives.
//!
//! This module houses the reliability classification, the encapsulated
//! packet entity with its wire and internal encodings, and the encoding
//! helpers they are built from.

pub mod constants;
pub mod encapsulated_packet;
pub mod header;
pub mod internal;
pub mod packet;
pub mod reliability;
pub mod types;

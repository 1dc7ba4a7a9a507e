//! Collaborator-facing helpers built on the codecs.
//!
//! - `frames`: iterate and pack encapsulated packets inside a datagram payload.
//! - `link`: backend-server prefix used on the internal link and the
//!   registry that routes by it.
//! - `relay`: tokio worker handing decoded packets to an application consumer
//!   in the internal format, and split fragments to a reassembly consumer.
//!
//! Socket ownership, reassembly and session state stay with the caller.

pub mod frames;
pub mod link;
pub mod relay;

pub use frames::{FrameBatch, Frames, PackError, decode_frames, pack_datagrams};
pub use link::{Backend, BackendRegistry, LinkError, LinkFrame};
pub use relay::{
    DatagramSender, FragmentReceiver, PacketReceiver, RelayConfig, RelayError, RelayHandle,
    spawn_relay,
};

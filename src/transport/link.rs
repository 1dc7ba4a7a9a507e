//! Internal link between the public-facing socket and backend servers.
//!
//! Every datagram on the link starts with a one-byte backend-server id,
//! followed by an internal-format encapsulated packet.

use std::net::SocketAddr;

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;
use tokio::net::UdpSocket;

use crate::protocol::{
    constants::LINK_PREFIX_SIZE, encapsulated_packet::EncapsulatedPacket, packet::DecodeError,
};

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("failed to decode link frame: {0}")]
    Decode(#[from] DecodeError),
    #[error("no backend registered with id {0}")]
    UnknownBackend(u8),
    #[error("link socket error: {0}")]
    Io(#[from] std::io::Error),
}

/// One datagram on the internal link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFrame {
    pub server_id: u8,
    pub payload: Bytes,
}

impl LinkFrame {
    pub fn for_packet(server_id: u8, packet: &EncapsulatedPacket) -> Self {
        Self {
            server_id,
            payload: packet.to_internal_bytes(),
        }
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u8(self.server_id);
        dst.put_slice(&self.payload);
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(LINK_PREFIX_SIZE + self.payload.len());
        self.encode(&mut buf);
        buf.freeze()
    }

    pub fn decode(mut src: Bytes) -> Result<Self, DecodeError> {
        if src.len() < LINK_PREFIX_SIZE {
            return Err(DecodeError::TruncatedInput);
        }
        let payload = src.split_off(LINK_PREFIX_SIZE);
        Ok(Self {
            server_id: src[0],
            payload,
        })
    }

    /// Decodes the internal-format packet carried after the prefix.
    pub fn packet(&self) -> Result<EncapsulatedPacket, DecodeError> {
        EncapsulatedPacket::decode_internal(&self.payload).map(|(pkt, _)| pkt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    pub id: u8,
    pub addr: SocketAddr,
    pub main: bool,
}

/// Backends known to the router, in registration order.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    servers: Vec<Backend>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a backend, replacing any previous one with the same id.
    pub fn register(&mut self, id: u8, addr: SocketAddr, main: bool) {
        let backend = Backend { id, addr, main };
        match self.servers.iter_mut().find(|b| b.id == id) {
            Some(existing) => *existing = backend,
            None => self.servers.push(backend),
        }
        tracing::debug!(id, addr = %addr, main, "backend registered");
    }

    pub fn remove(&mut self, id: u8) -> Option<Backend> {
        let pos = self.servers.iter().position(|b| b.id == id)?;
        Some(self.servers.remove(pos))
    }

    pub fn get(&self, id: u8) -> Option<&Backend> {
        self.servers.iter().find(|b| b.id == id)
    }

    /// Backend new players are sent to: the first main one, or failing that
    /// the most recently registered.
    pub fn main_server(&self) -> Option<&Backend> {
        self.servers
            .iter()
            .find(|b| b.main)
            .or_else(|| self.servers.last())
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Strips the backend prefix and resolves the backend it names.
    pub fn route(&self, datagram: Bytes) -> Result<(&Backend, LinkFrame), LinkError> {
        let frame = LinkFrame::decode(datagram)?;
        let backend = self
            .get(frame.server_id)
            .ok_or(LinkError::UnknownBackend(frame.server_id))?;
        Ok((backend, frame))
    }

    /// Reads one datagram from the internal socket and routes it.
    pub async fn recv_from(
        &self,
        socket: &UdpSocket,
        buf: &mut [u8],
    ) -> Result<(&Backend, LinkFrame), LinkError> {
        let (len, from) = socket.recv_from(buf).await?;
        let datagram = Bytes::copy_from_slice(&buf[..len]);
        match self.route(datagram) {
            Ok((backend, frame)) => {
                tracing::trace!(
                    from = %from,
                    backend = backend.id,
                    len = frame.payload.len(),
                    "link frame"
                );
                Ok((backend, frame))
            }
            Err(e) => {
                tracing::debug!(from = %from, error = %e, "dropping link datagram");
                Err(e)
            }
        }
    }
}

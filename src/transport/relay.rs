//! Moves encapsulated packets from the network-facing side to an
//! application-facing consumer.
//!
//! Raw datagram payloads go in. Each complete encapsulated packet found in
//! them comes out re-encoded in the internal format. Split fragments keep
//! their wire shape and go to a separate channel for the reassembly layer,
//! since the internal format cannot describe them.

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::protocol::{
    constants::MAXIMUM_MTU_SIZE, encapsulated_packet::EncapsulatedPacket, packet::DecodeError,
};
use crate::transport::frames::Frames;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("relay closed")]
    Closed,
    #[error("failed to decode relayed packet: {0}")]
    Decode(#[from] DecodeError),
}

/// Relay tuning.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub mtu: usize,
    pub channel_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            mtu: MAXIMUM_MTU_SIZE as usize,
            channel_capacity: 128,
        }
    }
}

impl RelayConfig {
    pub fn mtu(mut self, mtu: usize) -> Self {
        self.mtu = mtu;
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

/// Network side of the relay. Cloneable; the worker stops once every clone is dropped.
#[derive(Debug, Clone)]
pub struct DatagramSender {
    tx: mpsc::Sender<Bytes>,
}

impl DatagramSender {
    /// Queues one datagram payload (everything after the datagram header).
    pub async fn send(&self, payload: impl Into<Bytes>) -> Result<(), RelayError> {
        self.tx
            .send(payload.into())
            .await
            .map_err(|_| RelayError::Closed)
    }
}

/// Application side of the relay: complete, unsplit messages only.
#[derive(Debug)]
pub struct PacketReceiver {
    rx: mpsc::Receiver<Bytes>,
}

impl PacketReceiver {
    /// Next internal-format frame, undecoded.
    pub async fn recv_raw(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }

    pub async fn recv(&mut self) -> Option<Result<EncapsulatedPacket, RelayError>> {
        let frame = self.rx.recv().await?;
        Some(
            EncapsulatedPacket::decode_internal(&frame)
                .map(|(pkt, _)| pkt)
                .map_err(RelayError::from),
        )
    }
}

/// Split fragments as decoded from the wire, with all of their metadata.
///
/// Dropping this receiver makes the relay discard fragments. While it is
/// alive, a full fragment channel holds up the relay.
#[derive(Debug)]
pub struct FragmentReceiver {
    rx: mpsc::Receiver<EncapsulatedPacket>,
}

impl FragmentReceiver {
    pub async fn recv(&mut self) -> Option<EncapsulatedPacket> {
        self.rx.recv().await
    }
}

/// Channels of a running relay worker.
#[derive(Debug)]
pub struct RelayHandle {
    pub datagrams: DatagramSender,
    pub packets: PacketReceiver,
    pub fragments: FragmentReceiver,
}

/// Spawns the relay worker on the current tokio runtime.
pub fn spawn_relay(config: RelayConfig) -> RelayHandle {
    let capacity = config.channel_capacity.max(1);
    let (in_tx, in_rx) = mpsc::channel(capacity);
    let (out_tx, out_rx) = mpsc::channel(capacity);
    let (frag_tx, frag_rx) = mpsc::channel(capacity);

    tokio::spawn(run_relay(in_rx, out_tx, frag_tx, config.mtu));

    RelayHandle {
        datagrams: DatagramSender { tx: in_tx },
        packets: PacketReceiver { rx: out_rx },
        fragments: FragmentReceiver { rx: frag_rx },
    }
}

async fn run_relay(
    mut inbound: mpsc::Receiver<Bytes>,
    outbound: mpsc::Sender<Bytes>,
    fragments: mpsc::Sender<EncapsulatedPacket>,
    mtu: usize,
) {
    tracing::info!(mtu, "relay started");

    while let Some(datagram) = inbound.recv().await {
        if datagram.len() > mtu {
            tracing::debug!(len = datagram.len(), mtu, "dropping oversized datagram");
            continue;
        }

        for frame in Frames::new(&datagram) {
            let pkt = match frame {
                Ok(pkt) => pkt,
                Err(e) => {
                    tracing::debug!(error = ?e, "failed to decode encapsulated packet");
                    break;
                }
            };

            if tracing::enabled!(tracing::Level::TRACE) {
                tracing::trace!(
                    reliability = ?pkt.reliability,
                    split = pkt.has_split(),
                    len = pkt.payload.len(),
                    "relay packet"
                );
            }

            if let Some(split) = pkt.split {
                if fragments.send(pkt).await.is_err() {
                    tracing::debug!(
                        split_id = split.id,
                        split_index = split.index,
                        "no fragment consumer, dropping split fragment"
                    );
                }
                continue;
            }

            if outbound.send(pkt.to_internal_bytes()).await.is_err() {
                tracing::info!("relay consumer gone, stopping");
                return;
            }
        }
    }

    tracing::info!("relay stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::reliability::Reliability;
    use bytes::BytesMut;

    #[tokio::test]
    async fn relays_every_packet_of_a_datagram() {
        let mut relay = spawn_relay(RelayConfig::default());

        let a = EncapsulatedPacket::new(Reliability::ReliableOrdered, vec![0x86, 1])
            .with_message_index(0)
            .with_ordering(0, 1);
        let b = EncapsulatedPacket::new(Reliability::Unreliable, vec![0x87]);
        let mut buf = BytesMut::new();
        a.encode_wire(&mut buf);
        b.encode_wire(&mut buf);
        relay.datagrams.send(buf.freeze()).await.unwrap();

        let first = relay.packets.recv().await.unwrap().unwrap();
        assert_eq!(first.reliability, Reliability::ReliableOrdered);
        assert_eq!(first.order_channel(), Some(1));
        assert_eq!(first.payload, a.payload);

        let second = relay.packets.recv().await.unwrap().unwrap();
        assert_eq!(second, b);
    }

    #[tokio::test]
    async fn split_fragments_bypass_the_application_channel() {
        let mut relay = spawn_relay(RelayConfig::default());

        let fragment = EncapsulatedPacket::new(Reliability::Reliable, vec![1, 2, 3])
            .with_message_index(5)
            .with_split(4, 100, 2);
        let whole = EncapsulatedPacket::new(Reliability::Unreliable, vec![9]);
        let mut buf = BytesMut::new();
        fragment.encode_wire(&mut buf);
        whole.encode_wire(&mut buf);
        relay.datagrams.send(buf.freeze()).await.unwrap();

        assert_eq!(relay.fragments.recv().await.unwrap(), fragment);
        // The next application packet is the unsplit one, not the fragment.
        assert_eq!(relay.packets.recv().await.unwrap().unwrap(), whole);
    }

    #[tokio::test]
    async fn fragments_are_dropped_without_a_consumer() {
        let RelayHandle {
            datagrams,
            mut packets,
            fragments,
        } = spawn_relay(RelayConfig::default());
        drop(fragments);

        let fragment =
            EncapsulatedPacket::new(Reliability::Unreliable, vec![7]).with_split(2, 1, 0);
        datagrams.send(fragment.to_wire_bytes()).await.unwrap();
        let whole = EncapsulatedPacket::new(Reliability::Unreliable, vec![8]);
        datagrams.send(whole.to_wire_bytes()).await.unwrap();
        drop(datagrams);

        assert_eq!(packets.recv().await.unwrap().unwrap(), whole);
        assert!(packets.recv().await.is_none());
    }

    #[tokio::test]
    async fn malformed_datagram_is_dropped() {
        let mut relay = spawn_relay(RelayConfig::default().channel_capacity(4));

        relay.datagrams.send(vec![0x00, 0x00, 0xFF, 0x01]).await.unwrap();
        let good = EncapsulatedPacket::new(Reliability::Unreliable, vec![9]);
        relay.datagrams.send(good.to_wire_bytes()).await.unwrap();

        assert_eq!(relay.packets.recv().await.unwrap().unwrap(), good);
    }

    #[tokio::test]
    async fn oversized_datagram_is_dropped() {
        let mut relay = spawn_relay(RelayConfig::default().mtu(8));

        let big = EncapsulatedPacket::new(Reliability::Unreliable, vec![0; 16]);
        relay.datagrams.send(big.to_wire_bytes()).await.unwrap();
        let small = EncapsulatedPacket::new(Reliability::Unreliable, vec![1]);
        relay.datagrams.send(small.to_wire_bytes()).await.unwrap();

        assert_eq!(relay.packets.recv().await.unwrap().unwrap(), small);
    }

    #[tokio::test]
    async fn closes_when_senders_drop() {
        let mut relay = spawn_relay(RelayConfig::default());
        let other = relay.datagrams.clone();
        drop(relay.datagrams);
        other
            .send(EncapsulatedPacket::new(Reliability::Unreliable, vec![1]).to_wire_bytes())
            .await
            .unwrap();
        drop(other);

        assert!(relay.packets.recv_raw().await.is_some());
        assert!(relay.packets.recv_raw().await.is_none());
    }
}

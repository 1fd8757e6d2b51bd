use crate::error::{RelayError, RelayResult};
use axum::extract::ws::{Message, Utf8Bytes};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicUsize, Ordering};
use switchboard_core::{OutboundEnvelope, PeerId};
use tokio::sync::mpsc;
use tracing::debug;

/// Outbound half of a peer's socket, drained by that peer's writer task.
pub type PeerSink = mpsc::UnboundedSender<Message>;

const MAX_ALLOCATION_ATTEMPTS: usize = 16;

/// Owns the live outbound sink of every connected peer.
pub struct ConnectionRegistry {
    peers: DashMap<PeerId, PeerSink>,
    /// Admission slots; always `>= peers.len()` and `<= capacity`.
    slots: AtomicUsize,
    capacity: usize,
}

impl ConnectionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            peers: DashMap::new(),
            slots: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Allocates a fresh identity for `sink` and stores it.
    pub fn register(&self, sink: PeerSink) -> RelayResult<PeerId> {
        let exhausted = || RelayError::ResourceExhausted {
            capacity: self.capacity,
        };

        self.slots
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                (used < self.capacity).then_some(used + 1)
            })
            .map_err(|_| exhausted())?;

        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            match self.peers.entry(PeerId::generate()) {
                Entry::Vacant(slot) => {
                    let peer_id = slot.key().clone();
                    slot.insert(sink);
                    return Ok(peer_id);
                }
                Entry::Occupied(taken) => {
                    debug!(peer_id = %taken.key(), "peer id collision, re-allocating");
                }
            }
        }

        self.slots.fetch_sub(1, Ordering::AcqRel);
        Err(exhausted())
    }

    /// Removes the peer's sink. Returns `false` if it was already gone.
    pub fn unregister(&self, peer_id: &PeerId) -> bool {
        let removed = self.peers.remove(peer_id).is_some();
        if removed {
            self.slots.fetch_sub(1, Ordering::AcqRel);
        }
        removed
    }

    pub fn send(&self, peer_id: &PeerId, envelope: &OutboundEnvelope) -> RelayResult<()> {
        let text = Utf8Bytes::from(envelope.to_json()?);
        self.send_text(peer_id, text)
    }

    /// Delivers an already encoded envelope.
    pub fn send_text(&self, peer_id: &PeerId, text: Utf8Bytes) -> RelayResult<()> {
        let sink = self
            .peers
            .get(peer_id)
            .ok_or_else(|| RelayError::PeerNotFound(peer_id.clone()))?;

        sink.send(Message::Text(text))
            .map_err(|_| RelayError::DeliveryFailed(peer_id.clone()))
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.peers.contains_key(peer_id)
    }

    pub fn count(&self) -> usize {
        self.peers.len()
    }
}

use crate::error::{RelayError, RelayResult};
use crate::room::RoomDirectory;
use crate::signaling::{ConnectionRegistry, PeerSink};
use axum::extract::ws::Utf8Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use switchboard_core::{OutboundEnvelope, PeerId, ServerMessage};
use tracing::{debug, error, info, warn};

struct SignalingInner {
    connections: ConnectionRegistry,
    rooms: RoomDirectory,
}

/// Snapshot served on the diagnostics endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayStats {
    pub active_connections: usize,
    pub active_rooms: usize,
}

/// Shared relay state handed to every session. Cloning is cheap.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new(max_connections: usize) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                connections: ConnectionRegistry::new(max_connections),
                rooms: RoomDirectory::new(),
            }),
        }
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.inner.connections
    }

    pub fn rooms(&self) -> &RoomDirectory {
        &self.inner.rooms
    }

    /// Registers a new peer and announces its identity to it.
    pub fn connect(&self, sink: PeerSink) -> RelayResult<PeerId> {
        let peer_id = self.inner.connections.register(sink)?;
        info!(peer_id = %peer_id, "Peer connected");

        let hello = OutboundEnvelope::from(ServerMessage::Connected {
            peer_id: peer_id.clone(),
        });
        if let Err(e) = self.inner.connections.send(&peer_id, &hello) {
            self.disconnect(&peer_id);
            return Err(e);
        }

        Ok(peer_id)
    }

    /// Forgets the peer everywhere. Safe to call more than once.
    pub fn disconnect(&self, peer_id: &PeerId) {
        let was_connected = self.inner.connections.unregister(peer_id);
        let left = self.inner.rooms.leave(peer_id);

        if was_connected {
            info!(peer_id = %peer_id, room_id = ?left, "Peer disconnected");
        }
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            active_connections: self.inner.connections.count(),
            active_rooms: self.inner.rooms.room_count(),
        }
    }

    /// Best-effort delivery: a missing peer is dropped, a dead sink tears the
    /// receiving peer down.
    pub(crate) fn deliver(&self, peer_id: &PeerId, envelope: &OutboundEnvelope) {
        match envelope.to_json() {
            Ok(json) => self.deliver_text(peer_id, Utf8Bytes::from(json)),
            Err(e) => error!(peer_id = %peer_id, "Failed to serialize envelope: {}", e),
        }
    }

    pub(crate) fn deliver_text(&self, peer_id: &PeerId, text: Utf8Bytes) {
        match self.inner.connections.send_text(peer_id, text) {
            Ok(()) => {}
            Err(RelayError::PeerNotFound(_)) => {
                debug!(peer_id = %peer_id, "Dropping envelope for disconnected peer");
            }
            Err(e @ RelayError::DeliveryFailed(_)) => {
                warn!(peer_id = %peer_id, "{}, tearing peer down", e);
                self.disconnect(peer_id);
            }
            Err(e) => error!(peer_id = %peer_id, "Unexpected delivery error: {}", e),
        }
    }
}

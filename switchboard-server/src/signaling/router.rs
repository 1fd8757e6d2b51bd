use crate::error::RelayResult;
use crate::signaling::SignalingService;
use axum::extract::ws::Utf8Bytes;
use switchboard_core::{
    InboundEnvelope, OutboundEnvelope, PeerId, RoomId, ServerMessage, SignalEnvelope,
};
use tracing::{debug, error, info};

impl SignalingService {
    /// Decodes one text frame from `sender` and routes it.
    ///
    /// A malformed frame is returned as an error and has no side effects; the
    /// session keeps reading.
    pub fn handle_text(&self, sender: &PeerId, text: &str) -> RelayResult<()> {
        let envelope = InboundEnvelope::parse(text)?;
        self.dispatch(sender, envelope);
        Ok(())
    }

    pub fn dispatch(&self, sender: &PeerId, envelope: InboundEnvelope) {
        debug!(peer_id = %sender, kind = envelope.kind(), "Routing envelope");

        match envelope {
            InboundEnvelope::JoinRoom { room_id } => self.join_room(sender, room_id),
            InboundEnvelope::Signal(signal) => self.relay_signal(sender, signal),
            InboundEnvelope::Unrecognized { kind } => {
                debug!(peer_id = %sender, kind = %kind, "Ignoring unrecognized envelope");
            }
        }
    }

    fn join_room(&self, sender: &PeerId, room_id: RoomId) {
        if !self.connections().contains(sender) {
            debug!(peer_id = %sender, room_id = %room_id, "Ignoring join-room from disconnected peer");
            return;
        }

        let joined = self.rooms().join(sender, room_id.clone());

        // `disconnect` unregisters before it leaves, so a teardown that raced
        // the join above is either visible here or still to run its leave.
        if !self.connections().contains(sender) {
            self.rooms().leave(sender);
            debug!(peer_id = %sender, room_id = %room_id, "Peer disconnected while joining");
            return;
        }

        info!(
            peer_id = %sender,
            room_id = %room_id,
            previous_room = ?joined.left,
            members = joined.members.len(),
            "Peer joined room"
        );

        let reply = OutboundEnvelope::from(ServerMessage::JoinedRoom {
            room_id,
            peers: joined.members.clone(),
        });
        self.deliver(sender, &reply);

        let announcement = OutboundEnvelope::from(ServerMessage::PeerJoined {
            peer_id: sender.clone(),
            peers: joined.members.clone(),
        });
        let text = match announcement.to_json() {
            Ok(json) => Utf8Bytes::from(json),
            Err(e) => {
                error!(peer_id = %sender, "Failed to serialize peer-joined: {}", e);
                return;
            }
        };

        // `members` is a snapshot; concurrent joins and leaves do not affect it.
        for member in joined.members.iter().filter(|member| *member != sender) {
            self.deliver_text(member, text.clone());
        }
    }

    fn relay_signal(&self, sender: &PeerId, signal: SignalEnvelope) {
        let Some(target) = signal.target().cloned() else {
            debug!(
                peer_id = %sender,
                kind = signal.kind().as_str(),
                "Dropping directed envelope without targetPeerId"
            );
            return;
        };

        debug!(
            peer_id = %sender,
            target = %target,
            kind = signal.kind().as_str(),
            "Relaying signal"
        );
        self.deliver(&target, &signal.relay_from(sender));
    }
}

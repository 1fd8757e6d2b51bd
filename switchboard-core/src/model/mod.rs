mod envelope;
mod peer;
mod room;

pub use envelope::{
    EnvelopeError, InboundEnvelope, OutboundEnvelope, ServerMessage, SignalEnvelope, SignalKind,
};
pub use peer::{PEER_ID_LEN, PeerId};
pub use room::RoomId;

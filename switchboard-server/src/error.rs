use switchboard_core::{EnvelopeError, PeerId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Inbound frame could not be decoded into an envelope.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[from] EnvelopeError),

    #[error("peer {0} is not connected")]
    PeerNotFound(PeerId),

    /// The peer's writer is gone; its connection is closing.
    #[error("delivery to peer {0} failed")]
    DeliveryFailed(PeerId),

    #[error("connection table is full ({capacity} peers)")]
    ResourceExhausted { capacity: usize },

    #[error("failed to encode envelope: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RelayResult<T> = Result<T, RelayError>;

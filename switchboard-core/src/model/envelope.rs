use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const TYPE_FIELD: &str = "type";
const ROOM_ID_FIELD: &str = "roomId";
const TARGET_PEER_ID_FIELD: &str = "targetPeerId";
const SOURCE_PEER_ID_FIELD: &str = "sourcePeerId";

const JOIN_ROOM_TYPE: &str = "join-room";

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("envelope is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("envelope is not a JSON object")]
    NotAnObject,

    #[error("envelope has no string `type` field")]
    MissingType,

    #[error("`{kind}` envelope is missing required field `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}

/// Directed signaling envelopes relayed peer to peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "ice-candidate",
        }
    }

    fn from_type(kind: &str) -> Option<Self> {
        match kind {
            "offer" => Some(SignalKind::Offer),
            "answer" => Some(SignalKind::Answer),
            "ice-candidate" => Some(SignalKind::IceCandidate),
            _ => None,
        }
    }
}

/// An `offer`, `answer` or `ice-candidate` envelope.
///
/// All fields are kept verbatim, including `type` and `targetPeerId`, so the
/// receiving browser sees exactly what the sender wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEnvelope {
    kind: SignalKind,
    target: Option<PeerId>,
    fields: Map<String, Value>,
}

impl SignalEnvelope {
    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    /// `None` when `targetPeerId` is absent, empty or not a string.
    pub fn target(&self) -> Option<&PeerId> {
        self.target.as_ref()
    }

    /// Stamps the sender identity, overwriting any client-supplied
    /// `sourcePeerId`.
    pub fn relay_from(mut self, source: &PeerId) -> OutboundEnvelope {
        self.fields.insert(
            SOURCE_PEER_ID_FIELD.to_owned(),
            Value::String(source.to_string()),
        );
        OutboundEnvelope::Relayed(self.fields)
    }
}

/// Client-to-server envelope after the discriminating parse step.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEnvelope {
    JoinRoom { room_id: RoomId },
    Signal(SignalEnvelope),
    /// Any `type` the relay does not route. Never an error.
    Unrecognized { kind: String },
}

impl InboundEnvelope {
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(fields) => Self::from_fields(fields),
            _ => Err(EnvelopeError::NotAnObject),
        }
    }

    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, EnvelopeError> {
        let kind = match fields.get(TYPE_FIELD) {
            Some(Value::String(kind)) => kind.as_str(),
            _ => return Err(EnvelopeError::MissingType),
        };

        if kind == JOIN_ROOM_TYPE {
            let room_id = fields
                .get(ROOM_ID_FIELD)
                .and_then(Value::as_str)
                .ok_or(EnvelopeError::MissingField {
                    kind: JOIN_ROOM_TYPE,
                    field: ROOM_ID_FIELD,
                })?;
            return Ok(InboundEnvelope::JoinRoom {
                room_id: RoomId::from(room_id),
            });
        }

        let Some(signal_kind) = SignalKind::from_type(kind) else {
            return Ok(InboundEnvelope::Unrecognized {
                kind: kind.to_owned(),
            });
        };

        let target = fields
            .get(TARGET_PEER_ID_FIELD)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(PeerId::from);

        Ok(InboundEnvelope::Signal(SignalEnvelope {
            kind: signal_kind,
            target,
            fields,
        }))
    }

    /// The envelope's `type` tag, for logging.
    pub fn kind(&self) -> &str {
        match self {
            InboundEnvelope::JoinRoom { .. } => JOIN_ROOM_TYPE,
            InboundEnvelope::Signal(signal) => signal.kind.as_str(),
            InboundEnvelope::Unrecognized { kind } => kind,
        }
    }
}

/// Envelopes originated by the relay itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Sent once, right after the connection is accepted.
    Connected { peer_id: PeerId },
    /// Reply to `join-room`; `peers` includes the joiner.
    JoinedRoom { room_id: RoomId, peers: Vec<PeerId> },
    /// Broadcast to the other members when a peer joins.
    PeerJoined { peer_id: PeerId, peers: Vec<PeerId> },
}

/// Anything written to a peer's socket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundEnvelope {
    Server(ServerMessage),
    Relayed(Map<String, Value>),
}

impl OutboundEnvelope {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<ServerMessage> for OutboundEnvelope {
    fn from(msg: ServerMessage) -> Self {
        OutboundEnvelope::Server(msg)
    }
}

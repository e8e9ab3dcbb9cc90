use crate::model::client::ClientId;
use crate::model::room::RoomId;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Anything the server writes to a socket as a JSON text frame.
pub trait WireMessage: Serialize {
    fn to_text(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Raw inbound frame as sent by clients: `{type, to?, payload?}`.
///
/// Any other top-level field (legacy clients send `from`) is ignored; the
/// sender is always the connection the frame arrived on.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub payload: Option<Value>,
}

/// Directed WebRTC negotiation messages relayed between two peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub fn from_type(kind: &str) -> Option<Self> {
        match kind {
            "offer" => Some(Self::Offer),
            "answer" => Some(Self::Answer),
            "ice-candidate" => Some(Self::IceCandidate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
        }
    }
}

/// Server → client messages carried as `{type, payload}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ServerMessage {
    ClientId {
        id: ClientId,
    },
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: RoomId,
    },
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_id: RoomId,
        peer_id: ClientId,
        /// First other member in join order, empty when the joiner is alone.
        connected_peer: String,
        peer_count: usize,
    },
    #[serde(rename_all = "camelCase")]
    PeerJoined {
        peer_id: ClientId,
        peer_count: usize,
    },
    #[serde(rename_all = "camelCase")]
    PeerLeft {
        peer_id: ClientId,
        peer_count: usize,
    },
    RoomError {
        error: String,
    },
    PeerList {
        peers: Vec<ClientId>,
    },
}

impl ServerMessage {
    pub fn room_error(error: impl ToString) -> Self {
        Self::RoomError {
            error: error.to_string(),
        }
    }
}

impl WireMessage for ServerMessage {}

/// Relayed negotiation message: `{type, from, ...payload}`.
///
/// Payload fields are lifted to the top level. `type` and `from` always come
/// from the server, a payload cannot override them.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayedSignal {
    pub kind: SignalKind,
    pub from: ClientId,
    pub payload: Map<String, Value>,
}

impl Serialize for RelayedSignal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.kind)?;
        map.serialize_entry("from", &self.from)?;
        for (key, value) in &self.payload {
            if key == "type" || key == "from" {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl WireMessage for RelayedSignal {}

/// Legacy room chat line: `{type: "chat", from, payload}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "chat")]
pub struct ChatMessage {
    pub from: ClientId,
    pub payload: Value,
}

impl WireMessage for ChatMessage {}

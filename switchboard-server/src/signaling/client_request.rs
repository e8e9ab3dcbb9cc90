use crate::error::SignalingError;
use serde_json::{Map, Value};
use switchboard_core::{Envelope, RoomId, SignalKind};

/// A validated client command.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientRequest {
    CreateRoom,
    JoinRoom { room_id: RoomId },
    LeaveRoom,
    Relay {
        kind: SignalKind,
        to: String,
        payload: Map<String, Value>,
    },
    ListPeers,
    Chat { payload: Value },
}

impl ClientRequest {
    /// Parse and validate one text frame.
    pub fn parse(text: &str) -> Result<Self, SignalingError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        Self::try_from(envelope)
    }
}

impl TryFrom<Envelope> for ClientRequest {
    type Error = SignalingError;

    fn try_from(envelope: Envelope) -> Result<Self, Self::Error> {
        let Envelope { kind, to, payload } = envelope;

        if let Some(signal) = SignalKind::from_type(&kind) {
            let to = to
                .filter(|to| !to.is_empty())
                .ok_or_else(|| SignalingError::MalformedMessage(format!("{kind} requires 'to'")))?;
            let Some(Value::Object(payload)) = payload else {
                return Err(SignalingError::MalformedMessage(format!(
                    "{kind} requires an object payload"
                )));
            };
            return Ok(Self::Relay {
                kind: signal,
                to,
                payload,
            });
        }

        match kind.as_str() {
            "create-room" => Ok(Self::CreateRoom),
            "join-room" => {
                let room_id = payload
                    .as_ref()
                    .and_then(|p| p.get("roomId"))
                    .and_then(Value::as_str)
                    .ok_or(SignalingError::InvalidPayload)?;
                Ok(Self::JoinRoom {
                    room_id: RoomId::from(room_id),
                })
            }
            "leave-room" => Ok(Self::LeaveRoom),
            "list-peers" => Ok(Self::ListPeers),
            "chat" => match payload {
                Some(payload) if !payload.is_null() => Ok(Self::Chat { payload }),
                _ => Err(SignalingError::MalformedMessage(
                    "chat requires payload".to_string(),
                )),
            },
            "" => Err(SignalingError::MalformedMessage(
                "message type is required".to_string(),
            )),
            _ => Err(SignalingError::UnknownMessageType(kind)),
        }
    }
}

use std::net::SocketAddr;
use thiserror::Error;

/// Recoverable protocol errors caused by client input.
///
/// The `Display` text is what clients see in `room-error` payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalingError {
    #[error("room not found")]
    RoomNotFound,

    #[error("already in a room")]
    AlreadyInRoom,

    #[error("room is full")]
    RoomFull,

    #[error("peer not found")]
    PeerNotFound,

    #[error("not in a room")]
    NotInRoom,

    #[error("invalid payload")]
    InvalidPayload,

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("unknown message type: {0}")]
    UnknownMessageType(String),
}

impl SignalingError {
    /// Whether the client gets a `room-error` for this, as opposed to the
    /// frame being logged and dropped.
    pub fn is_reportable(&self) -> bool {
        !matches!(
            self,
            Self::MalformedMessage(_) | Self::UnknownMessageType(_)
        )
    }
}

impl From<serde_json::Error> for SignalingError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedMessage(e.to_string())
    }
}

/// Fatal errors while starting or running the server.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

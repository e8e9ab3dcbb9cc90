use crate::signaling::ClientRequest;
use switchboard_core::ClientId;
use tokio::sync::oneshot;

/// Commands consumed by the room coordinator, one at a time.
#[derive(Debug)]
pub enum RoomCommand {
    /// A parsed request from a connected client.
    Request {
        client_id: ClientId,
        request: ClientRequest,
    },

    /// The client's socket closed, gracefully or not.
    Disconnect {
        client_id: ClientId,
        done: oneshot::Sender<()>,
    },

    /// Snapshot of table sizes.
    Stats { reply: oneshot::Sender<RoomStats> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomStats {
    pub rooms: usize,
    pub clients: usize,
}

use crate::error::SignalingError;
use axum::extract::ws::{Message, Utf8Bytes};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Instant;
use switchboard_core::{ClientId, ServerMessage, WireMessage};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, warn};

/// Frames queued per connection before further sends to it are dropped.
pub const OUTBOUND_BUFFER: usize = 256;

/// Outbound side of one live WebSocket.
#[derive(Clone, Debug)]
pub struct Connection {
    tx: mpsc::Sender<Message>,
    pub connected_at: Instant,
}

impl Connection {
    /// Queue a frame without waiting. A full queue counts as a failed send.
    fn deliver(&self, text: Utf8Bytes) -> bool {
        match self.tx.try_send(Message::Text(text)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Outbound queue full, dropping frame");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

/// Concurrent `clientId` → connection table.
///
/// Rooms only ever hold ids; every send resolves the id here, so a peer that
/// is gone simply fails to resolve.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<DashMap<ClientId, Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection under a fresh id and queue its `client-id` message.
    ///
    /// The queue is empty at this point, so `client-id` is always the first
    /// frame the client receives.
    pub fn register(&self, tx: mpsc::Sender<Message>) -> ClientId {
        let connection = Connection {
            tx,
            connected_at: Instant::now(),
        };

        let client_id = loop {
            let candidate = ClientId::new();
            if let Entry::Vacant(slot) = self.connections.entry(candidate.clone()) {
                slot.insert(connection.clone());
                break candidate;
            }
        };

        let hello = ServerMessage::ClientId {
            id: client_id.clone(),
        };
        if let Err(e) = self.send(&client_id, &hello) {
            debug!("Client {} went away before client-id: {}", client_id.short(), e);
        }

        client_id
    }

    pub fn lookup(&self, client_id: &ClientId) -> Option<Connection> {
        self.connections
            .get(client_id)
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.connections.contains_key(client_id)
    }

    /// Remove a connection. Returns false when it was already gone.
    pub fn unregister(&self, client_id: &ClientId) -> bool {
        self.connections.remove(client_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn send<M: WireMessage>(&self, client_id: &ClientId, msg: &M) -> Result<(), SignalingError> {
        match msg.to_text() {
            Ok(json) => self.send_text(client_id, json.into()),
            Err(e) => {
                error!("Failed to serialize message for {}: {}", client_id.short(), e);
                Ok(())
            }
        }
    }

    /// Queue an already serialized frame. Never blocks.
    pub fn send_text(&self, client_id: &ClientId, text: Utf8Bytes) -> Result<(), SignalingError> {
        let Some(connection) = self.lookup(client_id) else {
            return Err(SignalingError::PeerNotFound);
        };
        if connection.deliver(text) {
            Ok(())
        } else {
            Err(SignalingError::PeerNotFound)
        }
    }
}

use crate::error::SignalingError;
use crate::registry::ConnectionRegistry;
use crate::room::RoomTable;
use crate::signaling::{ClientRequest, Notifier};
use serde_json::{Map, Value};
use switchboard_core::{
    ChatMessage, ClientId, RelayedSignal, RoomId, ServerMessage, SignalKind, WireMessage,
};
use tracing::{debug, info, warn};

/// Applies client requests to the room table and routes the resulting messages.
///
/// Owned by the room coordinator task, so every call runs to completion
/// before the next request is looked at.
pub struct SignalingRouter {
    rooms: RoomTable,
    registry: ConnectionRegistry,
    notifier: Notifier,
}

impl SignalingRouter {
    pub fn new(rooms: RoomTable, registry: ConnectionRegistry) -> Self {
        let notifier = Notifier::new(registry.clone());
        Self {
            rooms,
            registry,
            notifier,
        }
    }

    pub fn rooms(&self) -> &RoomTable {
        &self.rooms
    }

    pub fn handle(&mut self, client_id: &ClientId, request: ClientRequest) {
        if !self.registry.contains(client_id) {
            debug!("Ignoring request from departed client {}", client_id.short());
            return;
        }

        let result = match request {
            ClientRequest::CreateRoom => self.create_room(client_id),
            ClientRequest::JoinRoom { room_id } => self.join_room(client_id, &room_id),
            ClientRequest::LeaveRoom => {
                self.leave_room(client_id);
                Ok(())
            }
            ClientRequest::Relay { kind, to, payload } => {
                self.relay(client_id, kind, &to, payload)
            }
            ClientRequest::ListPeers => self.list_peers(client_id),
            ClientRequest::Chat { payload } => self.chat(client_id, payload),
        };

        if let Err(e) = result {
            self.report(client_id, &e);
        }
    }

    /// Room cleanup for a closed socket, then removal from the registry.
    pub fn disconnect(&mut self, client_id: &ClientId) {
        self.leave_room(client_id);

        if let Some(connection) = self.registry.lookup(client_id) {
            info!(
                "Client {} disconnected after {:?}",
                client_id.short(),
                connection.connected_at.elapsed()
            );
        }
        self.registry.unregister(client_id);
    }

    fn create_room(&mut self, client_id: &ClientId) -> Result<(), SignalingError> {
        let room_id = self.rooms.create_room(client_id)?;
        info!("Room {} created by {}", room_id, client_id.short());

        self.reply(client_id, &ServerMessage::RoomCreated { room_id });
        Ok(())
    }

    fn join_room(&mut self, client_id: &ClientId, room_id: &RoomId) -> Result<(), SignalingError> {
        let joined = self.rooms.join_room(client_id, room_id)?;
        info!(
            "Client {} joined room {}, total in room: {}",
            client_id.short(),
            room_id,
            joined.peer_count
        );

        let notice = ServerMessage::PeerJoined {
            peer_id: client_id.clone(),
            peer_count: joined.peer_count,
        };
        self.notifier.broadcast(&joined.others, None, &notice);

        let connected_peer = joined
            .others
            .first()
            .map(ToString::to_string)
            .unwrap_or_default();
        self.reply(
            client_id,
            &ServerMessage::RoomJoined {
                room_id: joined.room_id,
                peer_id: client_id.clone(),
                connected_peer,
                peer_count: joined.peer_count,
            },
        );

        for line in &joined.history {
            self.reply(client_id, line);
        }
        Ok(())
    }

    fn leave_room(&mut self, client_id: &ClientId) {
        let Some(left) = self.rooms.leave_room(client_id) else {
            debug!("Client {} left no room", client_id.short());
            return;
        };
        info!("Client {} left room {}", client_id.short(), left.room_id);

        let notice = ServerMessage::PeerLeft {
            peer_id: client_id.clone(),
            peer_count: left.remaining.len(),
        };
        self.notifier.broadcast(&left.remaining, None, &notice);
    }

    /// Forward a negotiation payload to a member of the sender's room.
    fn relay(
        &mut self,
        client_id: &ClientId,
        kind: SignalKind,
        to: &str,
        payload: Map<String, Value>,
    ) -> Result<(), SignalingError> {
        let target: ClientId = to.parse().map_err(|_| SignalingError::PeerNotFound)?;
        if !self.registry.contains(&target) {
            return Err(SignalingError::PeerNotFound);
        }

        let room_id = self
            .rooms
            .room_of(client_id)
            .ok_or(SignalingError::NotInRoom)?;
        if self.rooms.room_of(&target) != Some(room_id) {
            return Err(SignalingError::PeerNotFound);
        }

        let msg = RelayedSignal {
            kind,
            from: client_id.clone(),
            payload,
        };
        self.notifier.send(&target, &msg)?;
        debug!(
            "Relayed {} from {} to {}",
            kind.as_str(),
            client_id.short(),
            target.short()
        );
        Ok(())
    }

    fn list_peers(&mut self, client_id: &ClientId) -> Result<(), SignalingError> {
        let room_id = self
            .rooms
            .room_of(client_id)
            .ok_or(SignalingError::NotInRoom)?;
        let peers = self
            .rooms
            .members(room_id)
            .map(<[ClientId]>::to_vec)
            .unwrap_or_default();

        self.reply(client_id, &ServerMessage::PeerList { peers });
        Ok(())
    }

    /// Legacy chat: echoed to every member, sender included, and kept for joiners.
    fn chat(&mut self, client_id: &ClientId, payload: Value) -> Result<(), SignalingError> {
        let room_id = self
            .rooms
            .room_of(client_id)
            .cloned()
            .ok_or(SignalingError::NotInRoom)?;

        let msg = ChatMessage {
            from: client_id.clone(),
            payload,
        };
        if let Some(members) = self.rooms.members(&room_id) {
            self.notifier.broadcast(members, None, &msg);
        }
        self.rooms.record_chat(&room_id, msg);
        Ok(())
    }

    fn reply<M: WireMessage>(&self, client_id: &ClientId, msg: &M) {
        if let Err(e) = self.notifier.send(client_id, msg) {
            debug!("Reply to {} dropped: {}", client_id.short(), e);
        }
    }

    fn report(&self, client_id: &ClientId, error: &SignalingError) {
        if !error.is_reportable() {
            warn!("Dropping request from {}: {}", client_id.short(), error);
            return;
        }
        warn!("Request from {} failed: {}", client_id.short(), error);
        self.reply(client_id, &ServerMessage::room_error(error));
    }
}

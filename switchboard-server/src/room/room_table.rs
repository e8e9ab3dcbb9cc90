use crate::error::SignalingError;
use crate::room::Room;
use std::collections::HashMap;
use switchboard_core::{ChatMessage, ClientId, RoomId};
use tracing::info;

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub room_id: RoomId,
    /// Member count including the joiner.
    pub peer_count: usize,
    /// Members present before the join, in join order.
    pub others: Vec<ClientId>,
    pub history: Vec<ChatMessage>,
}

/// Result of removing a member.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    /// Members still in the room, in join order. Empty when the room was deleted.
    pub remaining: Vec<ClientId>,
    pub room_deleted: bool,
}

/// All rooms plus the reverse `clientId` → `roomId` index.
///
/// The index is the only record of a client's current room, which keeps the
/// one-room-per-client invariant checkable in O(1).
#[derive(Debug, Default)]
pub struct RoomTable {
    rooms: HashMap<RoomId, Room>,
    membership: HashMap<ClientId, RoomId>,
    max_peers: Option<usize>,
    history_limit: usize,
}

impl RoomTable {
    pub fn new(max_peers: Option<usize>, history_limit: usize) -> Self {
        Self {
            rooms: HashMap::new(),
            membership: HashMap::new(),
            max_peers,
            history_limit,
        }
    }

    pub fn create_room(&mut self, creator: &ClientId) -> Result<RoomId, SignalingError> {
        if self.membership.contains_key(creator) {
            return Err(SignalingError::AlreadyInRoom);
        }

        let room_id = loop {
            let candidate = RoomId::new();
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        self.rooms
            .insert(room_id.clone(), Room::new(room_id.clone(), creator.clone()));
        self.membership.insert(creator.clone(), room_id.clone());

        Ok(room_id)
    }

    pub fn join_room(
        &mut self,
        client_id: &ClientId,
        room_id: &RoomId,
    ) -> Result<JoinOutcome, SignalingError> {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return Err(SignalingError::RoomNotFound);
        };
        if self.membership.contains_key(client_id) {
            return Err(SignalingError::AlreadyInRoom);
        }
        if self.max_peers.is_some_and(|max| room.len() >= max) {
            return Err(SignalingError::RoomFull);
        }

        let others = room.members().to_vec();
        room.add(client_id.clone());
        self.membership.insert(client_id.clone(), room_id.clone());

        Ok(JoinOutcome {
            room_id: room_id.clone(),
            peer_count: room.len(),
            others,
            history: room.chat_history().cloned().collect(),
        })
    }

    /// Remove `client_id` from its room. `None` when it was in no room.
    pub fn leave_room(&mut self, client_id: &ClientId) -> Option<LeaveOutcome> {
        let room_id = self.membership.remove(client_id)?;
        let room = self.rooms.get_mut(&room_id)?;
        room.remove(client_id);

        if room.is_empty() {
            if let Some(room) = self.rooms.remove(&room_id) {
                info!(
                    "Room {} deleted after {:?}",
                    room_id,
                    room.created_at.elapsed()
                );
            }
            return Some(LeaveOutcome {
                room_id,
                remaining: Vec::new(),
                room_deleted: true,
            });
        }

        Some(LeaveOutcome {
            room_id,
            remaining: room.members().to_vec(),
            room_deleted: false,
        })
    }

    pub fn room_of(&self, client_id: &ClientId) -> Option<&RoomId> {
        self.membership.get(client_id)
    }

    pub fn members(&self, room_id: &RoomId) -> Option<&[ClientId]> {
        self.rooms.get(room_id).map(Room::members)
    }

    pub fn record_chat(&mut self, room_id: &RoomId, msg: ChatMessage) {
        let limit = self.history_limit;
        if let Some(room) = self.rooms.get_mut(room_id) {
            room.record_chat(msg, limit);
        }
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

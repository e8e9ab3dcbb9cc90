use std::collections::VecDeque;
use std::time::Instant;
use switchboard_core::{ChatMessage, ClientId, RoomId};

/// A group of clients that signal to each other.
///
/// Members are kept in join order. A room is never empty: the table drops it
/// the moment its last member leaves.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    members: Vec<ClientId>,
    pub created_at: Instant,
    chat_history: VecDeque<ChatMessage>,
}

impl Room {
    pub fn new(id: RoomId, creator: ClientId) -> Self {
        Self {
            id,
            members: vec![creator],
            created_at: Instant::now(),
            chat_history: VecDeque::new(),
        }
    }

    pub fn members(&self) -> &[ClientId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.members.contains(client_id)
    }

    pub(crate) fn add(&mut self, client_id: ClientId) {
        if !self.contains(&client_id) {
            self.members.push(client_id);
        }
    }

    pub(crate) fn remove(&mut self, client_id: &ClientId) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member != client_id);
        self.members.len() != before
    }

    pub fn chat_history(&self) -> impl Iterator<Item = &ChatMessage> {
        self.chat_history.iter()
    }

    pub(crate) fn record_chat(&mut self, msg: ChatMessage, limit: usize) {
        if limit == 0 {
            return;
        }
        while self.chat_history.len() >= limit {
            self.chat_history.pop_front();
        }
        self.chat_history.push_back(msg);
    }
}

mod client;
mod message;
mod room;

pub use client::ClientId;
pub use message::{ChatMessage, Envelope, RelayedSignal, ServerMessage, SignalKind, WireMessage};
pub use room::RoomId;

pub mod config;
pub mod error;
pub mod registry;
pub mod room;
pub mod server;
pub mod signaling;

pub use config::{Args, ServerConfig};
pub use error::{ServerError, SignalingError};
pub use registry::*;
pub use room::*;
pub use server::{AppState, router, serve, serve_with_listener};
pub use signaling::*;

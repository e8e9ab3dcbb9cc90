mod client_request;
mod notifier;
mod signaling_router;
mod ws_handler;

pub use client_request::*;
pub use notifier::*;
pub use signaling_router::*;
pub use ws_handler::*;

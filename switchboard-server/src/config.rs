use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Largest accepted WebSocket message, SDP blobs stay well below this.
const MAX_ALLOWED_MESSAGE_SIZE: usize = 1 << 20;

/// CLI arguments for the signaling server.
#[derive(Parser, Debug, Clone)]
#[command(name = "switchboard")]
#[command(about = "WebRTC signaling relay")]
#[command(version)]
pub struct Args {
    /// Socket address to listen on.
    #[arg(long, default_value = "0.0.0.0:8081", env = "SWITCHBOARD_LISTEN")]
    pub listen: SocketAddr,
    /// Maximum members per room. Unlimited when omitted.
    #[arg(long, env = "SWITCHBOARD_MAX_PEERS")]
    pub max_peers_per_room: Option<usize>,
    /// Close connections that answer nothing, not even keepalive pings, for this
    /// many seconds. 0 = never.
    #[arg(long, default_value = "0", env = "SWITCHBOARD_IDLE_TIMEOUT")]
    pub idle_timeout: u64,
    /// Maximum WebSocket message size in bytes.
    #[arg(long, default_value = "65536", env = "SWITCHBOARD_MAX_MESSAGE")]
    pub max_message_size: usize,
    /// Chat lines kept per room and replayed to joiners. 0 = none.
    #[arg(long, default_value = "50", env = "SWITCHBOARD_CHAT_HISTORY")]
    pub chat_history: usize,
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info", env = "SWITCHBOARD_LOG")]
    pub log_level: String,
}

/// Runtime configuration derived from [`Args`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub max_peers_per_room: Option<usize>,
    /// Idle timeout in seconds, 0 disables it.
    pub idle_timeout: u64,
    pub max_message_size: usize,
    pub chat_history: usize,
}

impl ServerConfig {
    /// Returns Err with a description when a value is out of range.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_peers_per_room == Some(0) {
            return Err("max_peers_per_room must be greater than 0".to_string());
        }

        if self.idle_timeout > 86_400 {
            return Err(
                "idle_timeout exceeds reasonable limit (86400 seconds / 1 day)".to_string(),
            );
        }

        if self.max_message_size == 0 {
            return Err("max_message_size must be greater than 0".to_string());
        }
        if self.max_message_size > MAX_ALLOWED_MESSAGE_SIZE {
            return Err(format!(
                "max_message_size exceeds maximum allowed ({} bytes)",
                MAX_ALLOWED_MESSAGE_SIZE
            ));
        }

        if self.chat_history > 10_000 {
            return Err("chat_history exceeds reasonable limit (10000 lines)".to_string());
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout > 0).then(|| Duration::from_secs(self.idle_timeout))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8081)),
            max_peers_per_room: None,
            idle_timeout: 0,
            max_message_size: 65_536,
            chat_history: 50,
        }
    }
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            listen: args.listen,
            max_peers_per_room: args.max_peers_per_room,
            idle_timeout: args.idle_timeout,
            max_message_size: args.max_message_size,
            chat_history: args.chat_history,
        }
    }
}

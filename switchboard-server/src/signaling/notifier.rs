use crate::error::SignalingError;
use crate::registry::ConnectionRegistry;
use axum::extract::ws::Utf8Bytes;
use switchboard_core::{ClientId, WireMessage};
use tracing::{debug, error};

/// Fans room events out to members, resolving each id at send time.
#[derive(Clone)]
pub struct Notifier {
    registry: ConnectionRegistry,
}

impl Notifier {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    pub fn send<M: WireMessage>(&self, to: &ClientId, msg: &M) -> Result<(), SignalingError> {
        self.registry.send(to, msg)
    }

    /// Send `msg` to every member except `exclude`. Returns how many were reached.
    ///
    /// Members whose socket already closed are skipped; their own cleanup is
    /// already queued behind this operation.
    pub fn broadcast<M: WireMessage>(
        &self,
        members: &[ClientId],
        exclude: Option<&ClientId>,
        msg: &M,
    ) -> usize {
        let Some(text) = encode(msg) else {
            return 0;
        };

        let mut delivered = 0;
        for member in members {
            if Some(member) == exclude {
                continue;
            }
            match self.registry.send_text(member, text.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => debug!("Skipping departed member {}", member.short()),
            }
        }
        delivered
    }
}

fn encode<M: WireMessage>(msg: &M) -> Option<Utf8Bytes> {
    match msg.to_text() {
        Ok(json) => Some(json.into()),
        Err(e) => {
            error!("Failed to serialize broadcast: {}", e);
            None
        }
    }
}

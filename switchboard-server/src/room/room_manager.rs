use crate::config::ServerConfig;
use crate::registry::ConnectionRegistry;
use crate::room::{RoomCommand, RoomStats, RoomTable};
use crate::signaling::{ClientRequest, SignalingRouter};
use switchboard_core::ClientId;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

const COMMAND_BUFFER: usize = 1024;

/// Handle to the single task that owns all room state.
///
/// Every room mutation goes through this queue, so a join and a concurrent
/// disconnect for the same room can never interleave.
#[derive(Clone)]
pub struct RoomManager {
    command_tx: mpsc::Sender<RoomCommand>,
}

impl RoomManager {
    /// Spawn the coordinator on the current runtime.
    pub fn spawn(registry: ConnectionRegistry, config: &ServerConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let table = RoomTable::new(config.max_peers_per_room, config.chat_history);
        let coordinator = RoomCoordinator {
            router: SignalingRouter::new(table, registry.clone()),
            registry,
            command_rx,
        };
        tokio::spawn(coordinator.run());

        Self { command_tx }
    }

    pub async fn submit(&self, client_id: ClientId, request: ClientRequest) {
        let cmd = RoomCommand::Request { client_id, request };
        if let Err(e) = self.command_tx.send(cmd).await {
            error!("Room coordinator died: {}", e);
        }
    }

    /// Run room cleanup for `client_id` and wait until it is done.
    pub async fn disconnect(&self, client_id: ClientId) {
        let (done, wait) = oneshot::channel();
        let cmd = RoomCommand::Disconnect { client_id, done };
        if let Err(e) = self.command_tx.send(cmd).await {
            error!("Room coordinator died: {}", e);
            return;
        }
        let _ = wait.await;
    }

    pub async fn stats(&self) -> Option<RoomStats> {
        let (reply, wait) = oneshot::channel();
        self.command_tx.send(RoomCommand::Stats { reply }).await.ok()?;
        wait.await.ok()
    }
}

struct RoomCoordinator {
    router: SignalingRouter,
    registry: ConnectionRegistry,
    command_rx: mpsc::Receiver<RoomCommand>,
}

impl RoomCoordinator {
    async fn run(mut self) {
        info!("Room coordinator started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        info!("Command channel closed. Room coordinator finished");
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Request { client_id, request } => {
                self.router.handle(&client_id, request);
            }

            RoomCommand::Disconnect { client_id, done } => {
                self.router.disconnect(&client_id);
                let _ = done.send(());
            }

            RoomCommand::Stats { reply } => {
                let _ = reply.send(RoomStats {
                    rooms: self.router.rooms().len(),
                    clients: self.registry.len(),
                });
            }
        }
    }
}

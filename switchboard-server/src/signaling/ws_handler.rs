use crate::error::SignalingError;
use crate::registry::OUTBOUND_BUFFER;
use crate::server::AppState;
use crate::signaling::ClientRequest;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use switchboard_core::{ClientId, ServerMessage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.max_message_size(state.config.max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);

    let client_id = state.registry.register(tx);
    info!(
        "New WebSocket connection: {}, total clients: {}",
        client_id,
        state.registry.len()
    );

    // Pings make a quiet but healthy client answer with pongs, which count as activity
    let keepalive = state.config.idle_timeout().map(|limit| limit / 2);
    let mut send_task = tokio::spawn(drain_outbound(sender, rx, keepalive));

    let mut recv_task = tokio::spawn({
        let state = state.clone();
        let client_id = client_id.clone();
        let idle_timeout = state.config.idle_timeout();

        async move {
            loop {
                let next = match idle_timeout {
                    Some(limit) => match tokio::time::timeout(limit, receiver.next()).await {
                        Ok(next) => next,
                        Err(_) => {
                            info!("Closing idle connection {}", client_id.short());
                            break;
                        }
                    },
                    None => receiver.next().await,
                };

                let text = match next {
                    Some(Ok(Message::Text(text))) => text.as_str().to_owned(),
                    Some(Ok(Message::Binary(data))) => match String::from_utf8(data.to_vec()) {
                        Ok(text) => text,
                        Err(_) => {
                            warn!("Ignoring non UTF-8 binary frame from {}", client_id.short());
                            continue;
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        debug!("WebSocket error for {}: {}", client_id.short(), e);
                        break;
                    }
                };

                match ClientRequest::parse(&text) {
                    Ok(request) => state.rooms.submit(client_id.clone(), request).await,
                    Err(e) => reject(&state, &client_id, e),
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            // No request may reach the coordinator after the disconnect below
            let _ = (&mut recv_task).await;
        }
        _ = (&mut recv_task) => send_task.abort(),
    };

    state.rooms.disconnect(client_id.clone()).await;
    info!(
        "WebSocket disconnected: {}, total clients: {}",
        client_id,
        state.registry.len()
    );
}

/// Write queued frames to the socket, pinging every `keepalive` when set.
async fn drain_outbound(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Message>,
    keepalive: Option<Duration>,
) {
    let Some(period) = keepalive else {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
        return;
    };

    let mut ticker = tokio::time::interval(period);
    ticker.tick().await;
    loop {
        let msg = tokio::select! {
            queued = rx.recv() => match queued {
                Some(msg) => msg,
                None => break,
            },
            _ = ticker.tick() => Message::Ping(Default::default()),
        };
        if sender.send(msg).await.is_err() {
            break;
        }
    }
}

/// Parse failures never reach the room coordinator.
fn reject(state: &AppState, client_id: &ClientId, error: SignalingError) {
    if !error.is_reportable() {
        warn!("Invalid message from {}: {}", client_id.short(), error);
        return;
    }
    warn!("Rejected message from {}: {}", client_id.short(), error);
    let _ = state
        .registry
        .send(client_id, &ServerMessage::room_error(&error));
}

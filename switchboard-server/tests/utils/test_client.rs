use anyhow::{Context, Result, bail, ensure};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::signal_helpers::RECV_TIMEOUT_MS;
use super::test_server::TestServer;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A probe-like WebSocket client speaking the JSON protocol.
pub struct TestClient {
    /// Id assigned by the server in its `client-id` message.
    pub client_id: String,
    ws_tx: SplitSink<WsStream, Message>,
    ws_rx: SplitStream<WsStream>,
}

impl TestClient {
    /// Connect and consume the mandatory `client-id` greeting.
    pub async fn connect(server: &TestServer) -> Result<Self> {
        let (ws, _) = connect_async(server.ws_url())
            .await
            .context("Failed to connect to test server")?;
        let (ws_tx, ws_rx) = ws.split();

        let mut client = Self {
            client_id: String::new(),
            ws_tx,
            ws_rx,
        };

        let hello = client.recv().await.context("No greeting from server")?;
        ensure!(hello["type"] == "client-id", "first message was {hello}");
        client.client_id = hello["payload"]["id"]
            .as_str()
            .context("client-id without id")?
            .to_string();

        tracing::debug!("[TestClient] connected as {}", client.client_id);
        Ok(client)
    }

    pub async fn send_json(&mut self, value: Value) -> Result<()> {
        self.send_raw(&value.to_string()).await
    }

    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.ws_tx
            .send(Message::text(text.to_string()))
            .await
            .context("Failed to send frame")
    }

    pub async fn send_binary(&mut self, data: Vec<u8>) -> Result<()> {
        self.ws_tx
            .send(Message::binary(data))
            .await
            .context("Failed to send binary frame")
    }

    pub async fn recv(&mut self) -> Result<Value> {
        self.recv_timeout(RECV_TIMEOUT_MS).await
    }

    pub async fn recv_timeout(&mut self, timeout_ms: u64) -> Result<Value> {
        let timeout = Duration::from_millis(timeout_ms);
        loop {
            let msg = tokio::time::timeout(timeout, self.ws_rx.next())
                .await
                .context("Timed out waiting for a message")?
                .context("Connection closed")??;

            match msg {
                Message::Text(text) => {
                    return serde_json::from_str(text.as_str()).context("Invalid JSON from server");
                }
                Message::Close(_) => bail!("Connection closed by server"),
                _ => continue,
            }
        }
    }

    /// Receive the next message and check its `type`.
    pub async fn expect(&mut self, kind: &str) -> Result<Value> {
        let msg = self.recv().await?;
        ensure!(msg["type"] == kind, "expected {kind}, got {msg}");
        Ok(msg)
    }

    /// Expect a `room-error` carrying `error`.
    pub async fn expect_error(&mut self, error: &str) -> Result<()> {
        let msg = self.expect("room-error").await?;
        ensure!(msg["payload"]["error"] == error, "unexpected error {msg}");
        Ok(())
    }

    /// Fail if any message arrives within `window_ms`.
    ///
    /// Keeps reading the whole window, so keepalive pings are answered.
    pub async fn expect_silence(&mut self, window_ms: u64) -> Result<()> {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(window_ms);
        loop {
            match tokio::time::timeout_at(deadline, self.ws_rx.next()).await {
                Err(_) => return Ok(()),
                Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => continue,
                Ok(Some(Ok(Message::Text(text)))) => bail!("unexpected message {}", text.as_str()),
                Ok(other) => bail!("unexpected stream event {:?}", other),
            }
        }
    }

    /// Wait until the server closes the socket.
    pub async fn wait_closed(&mut self, timeout_ms: u64) -> Result<()> {
        let deadline = Duration::from_millis(timeout_ms);
        tokio::time::timeout(deadline, async {
            while let Some(msg) = self.ws_rx.next().await {
                match msg {
                    Ok(Message::Close(_)) | Err(_) => break,
                    Ok(_) => continue,
                }
            }
        })
        .await
        .context("Server did not close the connection")
    }

    pub async fn close(mut self) -> Result<()> {
        self.ws_tx
            .send(Message::Close(None))
            .await
            .context("Failed to close")
    }
}

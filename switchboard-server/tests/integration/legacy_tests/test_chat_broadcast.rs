use serde_json::json;

use crate::integration::init_tracing;
use crate::utils::{
    SILENCE_MS, TestClient, TestServer, create_room, expect_peer_event, join_room, test_config,
};

#[tokio::test]
async fn test_chat_broadcast() {
    init_tracing();

    let server = TestServer::start(test_config())
        .await
        .expect("Failed to start server");

    let mut a = TestClient::connect(&server).await.expect("Client A");
    let mut b = TestClient::connect(&server).await.expect("Client B");
    let mut outsider = TestClient::connect(&server).await.expect("Outsider");

    let room_id = create_room(&mut a).await.expect("create-room failed");

    a.send_json(json!({"type": "chat", "payload": {"text": "anyone here?"}}))
        .await
        .expect("Send failed");
    let echo = a.expect("chat").await.expect("No chat echo");
    assert_eq!(echo["from"], a.client_id.as_str());

    // History is replayed right after room-joined
    join_room(&mut b, &room_id).await.expect("join failed");
    let replay = b.expect("chat").await.expect("No history replay");
    assert_eq!(replay["payload"]["text"], "anyone here?");
    expect_peer_event(&mut a, "peer-joined", &b.client_id)
        .await
        .expect("A missed B");

    let b_id = b.client_id.clone();
    b.send_json(json!({"type": "chat", "from": "spoofed", "payload": "hi"}))
        .await
        .expect("Send failed");
    for member in [&mut a, &mut b] {
        let line = member.expect("chat").await.expect("Chat not delivered");
        assert_eq!(line["from"], b_id.as_str());
        assert_eq!(line["payload"], "hi");
    }

    outsider
        .expect_silence(SILENCE_MS)
        .await
        .expect("Chat leaked outside the room");
}

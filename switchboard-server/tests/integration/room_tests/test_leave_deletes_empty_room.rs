use serde_json::json;

use crate::integration::init_tracing;
use crate::utils::{SILENCE_MS, TestClient, TestServer, create_room, test_config};

#[tokio::test]
async fn test_leave_deletes_empty_room() {
    init_tracing();

    let server = TestServer::start(test_config())
        .await
        .expect("Failed to start server");

    let mut a = TestClient::connect(&server).await.expect("Client A");
    let mut b = TestClient::connect(&server).await.expect("Client B");

    let room_id = create_room(&mut a).await.expect("create-room failed");

    a.send_json(json!({"type": "leave-room"}))
        .await
        .expect("Send failed");
    // Leaving has no direct reply, and a second leave is a no-op
    a.send_json(json!({"type": "leave-room"}))
        .await
        .expect("Send failed");
    a.expect_silence(SILENCE_MS).await.expect("A got noise");

    b.send_json(json!({"type": "join-room", "payload": {"roomId": room_id}}))
        .await
        .expect("Send failed");
    b.expect_error("room not found")
        .await
        .expect("Empty room survived");

    // A is free to start over
    create_room(&mut a).await.expect("A could not create again");
    server.wait_for_counts(1, 2).await.expect("Unexpected counts");
}

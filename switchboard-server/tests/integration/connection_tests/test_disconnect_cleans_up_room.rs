use serde_json::json;

use crate::integration::init_tracing;
use crate::utils::{
    TestClient, TestServer, create_room, expect_peer_event, join_room, send_signal, test_config,
};

/// Create, join, offer, then an abrupt disconnect.
#[tokio::test]
async fn test_disconnect_cleans_up_room() {
    init_tracing();

    let server = TestServer::start(test_config())
        .await
        .expect("Failed to start server");

    let mut x = TestClient::connect(&server).await.expect("Client X");
    let mut y = TestClient::connect(&server).await.expect("Client Y");

    let room_id = create_room(&mut x).await.expect("create-room failed");

    let joined = join_room(&mut y, &room_id).await.expect("join-room failed");
    assert_eq!(joined["peerCount"], 2);
    expect_peer_event(&mut x, "peer-joined", &y.client_id)
        .await
        .expect("X was not told about Y");

    let x_id = x.client_id.clone();
    let y_id = y.client_id.clone();
    send_signal(&mut x, "offer", &y_id, json!({"sdp": "v=0\r\n"}))
        .await
        .expect("Send failed");
    let offer = y.expect("offer").await.expect("Y did not get the offer");
    assert_eq!(offer["from"], x_id.as_str());
    assert_eq!(offer["sdp"], "v=0\r\n");

    y.close().await.expect("Failed to close Y");

    let left = expect_peer_event(&mut x, "peer-left", &y_id)
        .await
        .expect("X was not told Y left");
    assert_eq!(left["peerCount"], 1);

    // X leaving empties and deletes the room
    x.close().await.expect("Failed to close X");
    server
        .wait_for_counts(0, 0)
        .await
        .expect("Room outlived its last member");

    let mut z = TestClient::connect(&server).await.expect("Client Z");
    z.send_json(json!({"type": "join-room", "payload": {"roomId": room_id}}))
        .await
        .expect("Send failed");
    z.expect_error("room not found")
        .await
        .expect("Deleted room was joinable");
}

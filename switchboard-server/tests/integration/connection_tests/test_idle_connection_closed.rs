use std::time::Duration;
use switchboard_server::ServerConfig;

use crate::integration::init_tracing;
use crate::utils::{TestClient, TestServer, create_room, test_config};

#[tokio::test]
async fn test_idle_connection_closed() {
    init_tracing();

    let config = ServerConfig {
        idle_timeout: 1,
        ..test_config()
    };
    let server = TestServer::start(config)
        .await
        .expect("Failed to start server");

    let mut idle = TestClient::connect(&server).await.expect("Client");
    create_room(&mut idle).await.expect("create-room failed");

    // Not reading means keepalive pings go unanswered
    tokio::time::sleep(Duration::from_millis(2500)).await;
    idle.wait_closed(5000)
        .await
        .expect("Idle connection stayed open");

    // The idle client's room went with it
    server
        .wait_for_counts(0, 0)
        .await
        .expect("Idle client was not cleaned up");
}

use switchboard_core::{RoomId, ServerMessage};

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::{TEARDOWN_TIMEOUT_MS, TestClient, wait_for_connections, wait_until};

#[tokio::test]
async fn test_disconnect_cleans_up() {
    init_tracing();

    let (addr, service) = spawn_relay(16).await;
    let room = RoomId::from("r1");

    let mut x = TestClient::connect(addr).await.expect("Failed to connect X");
    let mut y = TestClient::connect(addr).await.expect("Failed to connect Y");
    x.join("r1").await.expect("X failed to join");
    y.join("r1").await.expect("Y failed to join");
    assert!(matches!(
        x.recv_server_message().await.expect("X missed peer-joined"),
        ServerMessage::PeerJoined { .. }
    ));

    let x_id = x.peer_id.clone();
    x.close().await.expect("Failed to close X");

    assert!(wait_for_connections(&service, 1).await, "X was not unregistered");
    assert!(
        wait_until(
            || !service.rooms().members_of(&room).contains(&x_id),
            TEARDOWN_TIMEOUT_MS
        )
        .await,
        "X still listed in r1"
    );
    assert_eq!(service.rooms().members_of(&room), vec![y.peer_id.clone()]);

    y.close().await.expect("Failed to close Y");
    assert!(wait_for_connections(&service, 0).await);
    assert!(
        wait_until(|| service.stats().active_rooms == 0, TEARDOWN_TIMEOUT_MS).await,
        "Empty room was not dropped"
    );
}

#[tokio::test]
async fn test_dropped_socket_without_close_frame() {
    init_tracing();

    let (addr, service) = spawn_relay(16).await;

    let mut client = TestClient::connect(addr).await.expect("Failed to connect");
    client.join("r1").await.expect("Failed to join");
    drop(client);

    assert!(wait_for_connections(&service, 0).await);
    assert!(service.rooms().members_of(&RoomId::from("r1")).is_empty());
}

use switchboard_core::{RoomId, ServerMessage};

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::{SILENCE_MS, TestClient, wait_for_connections};

#[tokio::test]
async fn test_two_peers_join() {
    init_tracing();

    let (addr, service) = spawn_relay(16).await;

    let mut x = TestClient::connect(addr).await.expect("Failed to connect X");
    let peers = x.join("r1").await.expect("X failed to join");
    assert_eq!(peers, vec![x.peer_id.clone()]);

    let mut y = TestClient::connect(addr).await.expect("Failed to connect Y");
    let peers = y.join("r1").await.expect("Y failed to join");
    let both = vec![x.peer_id.clone(), y.peer_id.clone()];
    assert_eq!(peers, both);

    assert_eq!(
        x.recv_server_message().await.expect("X missed peer-joined"),
        ServerMessage::PeerJoined {
            peer_id: y.peer_id.clone(),
            peers: both,
        }
    );
    y.expect_silence(SILENCE_MS)
        .await
        .expect("Joiner must not receive its own broadcast");

    let x_id = x.peer_id.clone();
    x.close().await.expect("Failed to close X");
    assert!(wait_for_connections(&service, 1).await);
    assert!(
        !service
            .rooms()
            .members_of(&RoomId::from("r1"))
            .contains(&x_id)
    );

    y.close().await.expect("Failed to close Y");
}

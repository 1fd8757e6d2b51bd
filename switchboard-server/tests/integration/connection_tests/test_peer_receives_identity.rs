use switchboard_core::PEER_ID_LEN;

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::{SILENCE_MS, TestClient};

#[tokio::test]
async fn test_peer_receives_identity() {
    init_tracing();

    let (addr, service) = spawn_relay(16).await;

    let mut client = TestClient::connect(addr)
        .await
        .expect("Failed to connect client");

    assert_eq!(client.peer_id.as_str().len(), PEER_ID_LEN);
    assert!(service.connections().contains(&client.peer_id));
    assert_eq!(service.stats().active_connections, 1);

    // Nothing else is sent until the client speaks.
    client
        .expect_silence(SILENCE_MS)
        .await
        .expect("Unexpected message after greeting");

    client.close().await.expect("Failed to close client");
}

#[tokio::test]
async fn test_concurrent_peers_get_distinct_identities() {
    init_tracing();

    let (addr, service) = spawn_relay(64).await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        handles.push(tokio::spawn(TestClient::connect(addr)));
    }

    let mut clients = Vec::new();
    for handle in handles {
        clients.push(handle.await.unwrap().expect("Failed to connect client"));
    }

    let mut ids: Vec<_> = clients.iter().map(|c| c.peer_id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
    assert_eq!(service.stats().active_connections, 20);

    for client in clients {
        client.close().await.expect("Failed to close client");
    }
}

use serde_json::json;

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::{SILENCE_MS, TestClient, wait_for_connections};

#[tokio::test]
async fn test_offer_relay() {
    init_tracing();

    let (addr, _service) = spawn_relay(16).await;

    let mut a = TestClient::connect(addr).await.expect("Failed to connect A");
    let mut b = TestClient::connect(addr).await.expect("Failed to connect B");

    let offer = json!({
        "type": "offer",
        "targetPeerId": b.peer_id.as_str(),
        "offer": { "type": "offer", "sdp": "v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\n" }
    });
    a.send_json(offer).await.expect("Failed to send offer");

    let received = b.recv_json().await.expect("B did not receive the offer");
    assert_eq!(
        received,
        json!({
            "type": "offer",
            "targetPeerId": b.peer_id.as_str(),
            "sourcePeerId": a.peer_id.as_str(),
            "offer": { "type": "offer", "sdp": "v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\n" }
        })
    );

    // The answer flows back the same way.
    b.send_json(json!({
        "type": "answer",
        "targetPeerId": a.peer_id.as_str(),
        "answer": { "type": "answer", "sdp": "v=0" }
    }))
    .await
    .expect("Failed to send answer");

    let answer = a.recv_json().await.expect("A did not receive the answer");
    assert_eq!(answer["type"], "answer");
    assert_eq!(answer["sourcePeerId"], b.peer_id.as_str());
    assert_eq!(answer["answer"]["sdp"], "v=0");

    a.close().await.expect("Failed to close A");
    b.close().await.expect("Failed to close B");
}

#[tokio::test]
async fn test_offer_to_departed_peer_is_dropped() {
    init_tracing();

    let (addr, service) = spawn_relay(16).await;

    let mut a = TestClient::connect(addr).await.expect("Failed to connect A");
    let b = TestClient::connect(addr).await.expect("Failed to connect B");
    let b_id = b.peer_id.clone();
    b.close().await.expect("Failed to close B");
    assert!(wait_for_connections(&service, 1).await);

    a.send_json(json!({ "type": "offer", "targetPeerId": b_id.as_str(), "offer": {} }))
        .await
        .expect("Failed to send offer");
    a.send_json(json!({ "type": "ice-candidate", "candidate": {} }))
        .await
        .expect("Failed to send untargeted candidate");

    a.expect_silence(SILENCE_MS)
        .await
        .expect("Sender should not hear about dropped deliveries");

    // The session is still alive.
    let peers = a.join("r1").await.expect("Session should still work");
    assert_eq!(peers, vec![a.peer_id.clone()]);

    a.close().await.expect("Failed to close A");
}

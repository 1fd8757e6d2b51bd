use crate::SignalingService;
use axum::extract::State;
use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code};
use axum::response::IntoResponse;
use futures::stream::SplitStream;
use futures::{SinkExt, StreamExt};
use switchboard_core::PeerId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Outcome of waiting for the next frame from a client.
enum Incoming {
    Text(Utf8Bytes),
    Binary,
    /// Control frames handled by the transport itself.
    Skip,
    /// Close frame, transport error or end of stream.
    Disconnected,
}

async fn next_incoming(receiver: &mut SplitStream<WebSocket>, peer_id: &PeerId) -> Incoming {
    match receiver.next().await {
        Some(Ok(Message::Text(text))) => Incoming::Text(text),
        Some(Ok(Message::Binary(_))) => Incoming::Binary,
        Some(Ok(Message::Ping(_) | Message::Pong(_))) => Incoming::Skip,
        Some(Ok(Message::Close(frame))) => {
            debug!(peer_id = %peer_id, ?frame, "Client closed the socket");
            Incoming::Disconnected
        }
        Some(Err(e)) => {
            debug!(peer_id = %peer_id, "WebSocket read error: {}", e);
            Incoming::Disconnected
        }
        None => Incoming::Disconnected,
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let peer_id = match service.connect(tx) {
        Ok(peer_id) => peer_id,
        Err(e) => {
            warn!("Rejecting WebSocket connection: {}", e);
            let frame = CloseFrame {
                code: close_code::AGAIN,
                reason: Utf8Bytes::from_static("relay is at capacity"),
            };
            let _ = sender.send(Message::Close(Some(frame))).await;
            return;
        }
    };
    info!(peer_id = %peer_id, "New WebSocket session");

    // Ends when the registry drops the sink or the socket stops accepting writes.
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let peer_id = peer_id.clone();

        async move {
            loop {
                match next_incoming(&mut receiver, &peer_id).await {
                    Incoming::Text(text) => {
                        if let Err(e) = service.handle_text(&peer_id, text.as_str()) {
                            warn!(peer_id = %peer_id, "Skipping envelope: {}", e);
                        }
                    }
                    Incoming::Binary => {
                        warn!(peer_id = %peer_id, "Skipping binary frame, expected JSON text");
                    }
                    Incoming::Skip => {}
                    Incoming::Disconnected => break,
                }
            }
        }
    });

    // An aborted task may still be inside a synchronous `handle_text`; wait
    // for it so nothing routes on behalf of this peer after teardown.
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            let _ = recv_task.await;
        }
        _ = (&mut recv_task) => {
            send_task.abort();
            let _ = send_task.await;
        }
    };

    service.disconnect(&peer_id);
    info!(peer_id = %peer_id, "WebSocket session closed");
}

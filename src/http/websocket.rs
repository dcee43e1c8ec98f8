//! Server-push WebSocket endpoint.
//!
//! # Data Flow
//! ```text
//! Handler broadcasts GatewayEvent
//!     → EventHub (serialize once)
//!     → per-connection mpsc channel
//!     → this task → client socket
//! ```
//!
//! Client messages are read only to notice disconnects.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};

use crate::events::EventHub;
use crate::http::server::AppState;

/// `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let hub = state.events.clone();
    ws.on_upgrade(move |socket| handle_connection(socket, hub))
}

async fn handle_connection(mut socket: WebSocket, hub: EventHub) {
    let (id, mut events) = hub.register();

    loop {
        tokio::select! {
            payload = events.recv() => {
                match payload {
                    Some(payload) => {
                        if socket.send(Message::Text((&*payload).into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    hub.unregister(id);
}

// WebSocket handler streaming panel events to the dashboard.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};

use super::AppState;
use crate::events::PanelEvent;
use crate::metrics;

/// WebSocket upgrade handler for live reward and clan updates.
pub async fn ws_events(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn send_event(socket: &mut WebSocket, event: &PanelEvent) -> bool {
    let json = match serde_json::to_string(event) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize panel event: {e}");
            return true;
        }
    };
    if socket.send(Message::Text(json.into())).await.is_err() {
        return false;
    }
    metrics::WEBSOCKET_MESSAGES_SENT_TOTAL.inc();
    true
}

async fn handle_ws(mut socket: WebSocket, state: AppState) {
    let mut rx = state.notifier.subscribe();
    metrics::CONNECTED_WEBSOCKETS.inc();
    tracing::info!("Client connected");

    let greeting = PanelEvent::Connected {
        message: "Connected to Glory Bot Panel".to_string(),
    };

    if send_event(&mut socket, &greeting).await {
        loop {
            tokio::select! {
                result = rx.recv() => {
                    match result {
                        Ok(event) => {
                            if !send_event(&mut socket, &event).await {
                                break;
                            }
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!("WebSocket client lagged, skipped {n} events");
                        }
                    }
                }
                // Client messages are ignored; only disconnects matter.
                result = socket.recv() => {
                    match result {
                        Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                        _ => {}
                    }
                }
            }
        }
    }

    metrics::CONNECTED_WEBSOCKETS.dec();
    tracing::info!("Client disconnected");
}

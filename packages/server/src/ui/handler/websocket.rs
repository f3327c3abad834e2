//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{Session, SessionCommand},
    infrastructure::{
        dto::websocket::{ClientMessage, ServerMessage},
        message_pusher::WebSocketMessagePusher,
    },
    ui::state::AppState,
    usecase::SessionLifecycle,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Broadcasts from rooms and replies to this client's own commands share the
/// channel, so the client sees them in the order they were queued.
///
/// # Arguments
///
/// * `rx` - Channel receiver for this session's outbound messages
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match msg.encode() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("{}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this session's outbound messages
    let (tx, rx) = mpsc::unbounded_channel();
    let session = Session::new(Arc::new(WebSocketMessagePusher::new(tx)));
    let session_id = session.id();
    let mut lifecycle = SessionLifecycle::new(session, state.session_usecases.clone());
    tracing::info!("Session '{}' connected", session_id);

    // Spawn a task to send queued messages to this client
    let mut send_task = pusher_loop(rx, sender);

    loop {
        tokio::select! {
            msg = receiver.next() => {
                let msg = match msg {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error on session '{}': {}", session_id, e);
                        break;
                    }
                    None => break,
                };

                match msg {
                    Message::Text(text) => {
                        tracing::debug!("Received text from '{}': {}", session_id, text.as_str());
                        handle_text(&mut lifecycle, text.as_str()).await;
                    }
                    Message::Ping(_) => {
                        tracing::debug!("Received ping");
                        // Ping/pong is handled automatically by the WebSocket protocol
                    }
                    Message::Close(_) => {
                        tracing::info!("Session '{}' requested close", session_id);
                        break;
                    }
                    _ => {}
                }
            }
            _ = &mut send_task => {
                tracing::info!("Session '{}' can no longer be written to", session_id);
                break;
            }
        }
    }

    send_task.abort();

    // Runs exactly once per connection, whichever side ended it
    lifecycle.disconnect().await;
    tracing::info!("Session '{}' disconnected", session_id);
}

/// Decode one text frame and dispatch it.
///
/// Replies are queued on the session's own channel by the core, so they keep
/// their place relative to room broadcasts. Malformed frames are logged and
/// dropped; the connection stays open.
async fn handle_text(lifecycle: &mut SessionLifecycle, text: &str) {
    let command: SessionCommand = match ClientMessage::decode(text) {
        Ok(message) => message.into(),
        Err(e) => {
            tracing::warn!(
                "Session '{}' sent a malformed message: {}",
                lifecycle.session().id(),
                e
            );
            return;
        }
    };

    if let Some(reply) = lifecycle.handle(command).await {
        tracing::debug!("Replied to session '{}': {:?}", lifecycle.session().id(), reply);
    }
}

//! Shared helpers for the relay integration tests.
//!
//! Each test starts its own in-process server on an ephemeral port so that
//! room registries never leak between tests.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    domain::SequentialRoomIdGenerator,
    infrastructure::repository::InMemoryRoomRepository,
    ui::Server,
    usecase::{
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        OpenRoomUseCase, SendMessageUseCase, SessionUseCases,
    },
};
use hiroba_shared::time::SystemClock;
use serde_json::Value;
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// How long a test waits for a single frame before failing
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper struct to manage the in-process server lifecycle
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server bound to 127.0.0.1 on a free port
    pub async fn start() -> Self {
        let clock = Arc::new(SystemClock);
        let repository = Arc::new(InMemoryRoomRepository::new(
            Arc::new(SequentialRoomIdGenerator::new()),
            clock.clone(),
        ));
        let session_usecases = SessionUseCases {
            open_room: Arc::new(OpenRoomUseCase::new(repository.clone())),
            join_room: Arc::new(JoinRoomUseCase::new(repository.clone())),
            leave_room: Arc::new(LeaveRoomUseCase::new(repository.clone())),
            send_message: Arc::new(SendMessageUseCase::new(repository.clone(), clock)),
        };
        let server = Server::new(
            session_usecases,
            Arc::new(GetRoomsUseCase::new(repository.clone())),
            Arc::new(GetRoomDetailUseCase::new(repository)),
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let handle = tokio::spawn(async move {
            let _ = server.serve(listener).await;
        });

        TestServer { addr, handle }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Get an HTTP URL for the given path on this server
    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Open a new WebSocket connection
    pub async fn connect(&self) -> WsClient {
        let (ws, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect WebSocket client");
        ws
    }

    /// Fetch the room listing as raw JSON
    pub async fn get_rooms(&self) -> Vec<Value> {
        reqwest::get(self.http_url("/getrooms"))
            .await
            .expect("Failed to request /getrooms")
            .json::<Vec<Value>>()
            .await
            .expect("Failed to decode /getrooms body")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Send one JSON frame
pub async fn send_json(ws: &mut WsClient, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Receive the next text frame as JSON, skipping control frames
pub async fn recv_json(ws: &mut WsClient) -> Value {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Connection closed unexpectedly")
            .expect("WebSocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("Server sent invalid JSON");
        }
    }
}

/// Open a room and return its id
pub async fn open_room(ws: &mut WsClient, name: &str) -> String {
    send_json(
        ws,
        serde_json::json!({ "protocol": "openroom", "roomname": name }),
    )
    .await;
    let reply = recv_json(ws).await;
    assert_eq!(reply["protocol"], "resopenroom");
    assert_eq!(reply["status"], "ok");
    reply["roomid"]
        .as_str()
        .expect("roomid must be a string")
        .to_string()
}

/// Send a chat message
pub async fn send_chat(ws: &mut WsClient, nickname: &str, message: &str) {
    send_json(
        ws,
        serde_json::json!({ "protocol": "message", "nickname": nickname, "message": message }),
    )
    .await;
}

/// `HH:MM:SS` check without pulling in a regex engine
pub fn is_hms(time: &str) -> bool {
    let bytes = time.as_bytes();
    bytes.len() == 8
        && bytes[2] == b':'
        && bytes[5] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit())
}

//! WebSocket を使った MessageSink 実装
//!
//! ## 責務
//!
//! - 接続 1 つ分の送信チャンネル（`PusherChannel`）を保持
//! - ドメインの `ChatMessage` と `SessionReply` をワイヤーフォーマットに変換してチャンネルに積む
//!
//! ## 設計ノート
//!
//! WebSocket への実際の書き込みは UI 層（`ui/handler/websocket.rs`）の送信タスクが
//! チャンネルから取り出して行います。チャンネルは無制限のため `deliver` は
//! ブロックせず、失敗するのは送信タスクが終了している（接続が切れている）場合だけです。

use tokio::sync::mpsc;

use crate::{
    domain::{ChatMessage, DeliveryError, MessageSink, SessionReply},
    infrastructure::dto::websocket::ServerMessage,
};

/// 接続 1 つ分の送信チャンネル
///
/// ブロードキャストとコマンドへの応答は同じチャンネルを通るため、
/// 1 つの接続に対する送信順序はチャンネルに積んだ順序になる。
pub type PusherChannel = mpsc::UnboundedSender<ServerMessage>;

/// WebSocket を使った MessageSink 実装
pub struct WebSocketMessagePusher {
    sender: PusherChannel,
}

impl WebSocketMessagePusher {
    pub fn new(sender: PusherChannel) -> Self {
        Self { sender }
    }
}

impl MessageSink for WebSocketMessagePusher {
    fn deliver(&self, message: &ChatMessage) -> Result<(), DeliveryError> {
        self.sender
            .send(ServerMessage::from(message.clone()))
            .map_err(|_| DeliveryError::ConnectionClosed)
    }

    fn reply(&self, reply: &SessionReply) -> Result<(), DeliveryError> {
        self.sender
            .send(ServerMessage::from(reply.clone()))
            .map_err(|_| DeliveryError::ConnectionClosed)
    }
}

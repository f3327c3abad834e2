//! Session と、セッションが受け付けるコマンド

use std::{fmt, sync::Arc};

use super::{
    entity::ChatMessage,
    error::{DeliveryError, RoomError},
    pusher::MessageSink,
    value_object::{RoomId, SessionId},
};

/// 接続中のクライアント 1 つを表すハンドル
///
/// ルームはセッションを所有せず、配送口（`MessageSink`）への参照だけを保持する。
#[derive(Clone)]
pub struct Session {
    id: SessionId,
    sink: Arc<dyn MessageSink>,
}

impl Session {
    /// 新しい ID を発行してセッションを作成
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self {
            id: SessionId::generate(),
            sink,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn deliver(&self, message: &ChatMessage) -> Result<(), DeliveryError> {
        self.sink.deliver(message)
    }

    /// 応答を届ける。失敗しても接続の後片付けは切断処理に任せる
    pub fn reply(&self, reply: &SessionReply) {
        if let Err(e) = self.sink.reply(reply) {
            tracing::debug!("Reply to session '{}' dropped: {}", self.id, e);
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish_non_exhaustive()
    }
}

/// クライアントから届くイベント（デコード済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// 新しいルームを作成して参加する
    OpenRoom { name: String },
    /// 既存のルームに参加する
    JoinRoom { room_id: String },
    /// 現在のルームにメッセージを送る
    SendMessage { nickname: String, body: String },
}

/// コマンドに対する送信者への応答
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionReply {
    RoomOpened { room_id: RoomId },
    RoomJoined { history: Vec<ChatMessage> },
    JoinFailed(RoomError),
}

//! エンティティと読み取り専用のスナップショット

use hiroba_shared::time::timestamp_to_local_hms;

use super::value_object::{RoomId, SessionId, Timestamp};

/// ルームにブロードキャストされる 1 件のメッセージ
///
/// 作成後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// 送信者の表示名
    pub nickname: String,
    /// 本文
    pub body: String,
    /// サーバーが受信した時刻
    pub received_at: Timestamp,
    /// `HH:MM:SS` 形式の受信時刻（サーバーのローカル時刻）
    pub time: String,
}

impl ChatMessage {
    /// 受信時刻から表示用の時刻文字列を生成してメッセージを作成
    pub fn new(nickname: String, body: String, received_at: Timestamp) -> Self {
        let time = timestamp_to_local_hms(received_at.value());
        Self {
            nickname,
            body,
            received_at,
            time,
        }
    }
}

/// ブロードキャスト 1 回分の配送結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// 配送に成功したセッション
    pub delivered: Vec<SessionId>,
    /// 配送に失敗し、ルームから外されたセッション
    pub failed: Vec<SessionId>,
}

impl DeliveryReport {
    pub fn recipients(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// ルーム一覧の 1 エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
}

/// 診断用のルーム状態スナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub name: String,
    pub created_at: Timestamp,
    /// ソート済みのメンバー ID
    pub members: Vec<SessionId>,
    pub history_len: usize,
}

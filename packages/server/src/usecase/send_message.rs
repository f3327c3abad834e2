//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 履歴への追加と、送信時点のメンバー全員（送信者を含む）へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 配送に失敗したメンバーがその場でルームから外されることを保証
//! - 外した結果ルームが空になった場合に、ルームが削除されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：全員への配送
//! - 異常系：切断済みのメンバーへの配送
//! - エッジケース：最後のメンバーが切断済みでルームが空になる

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{ChatMessage, DeliveryReport, RoomId, RoomRepository, SharedRoom, Timestamp};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// 受信時刻の取得元
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信先ルームの ID
    /// * `room` - 送信先ルーム（セッションが保持している参照）
    /// * `nickname` - 送信者の表示名
    /// * `body` - 本文
    ///
    /// # Returns
    ///
    /// 配送結果。失敗したメンバーは既にルームから外されている。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        room: &SharedRoom,
        nickname: String,
        body: String,
    ) -> DeliveryReport {
        let message = ChatMessage::new(nickname, body, Timestamp::new(self.clock.now_millis()));

        // 1. Room のロックの下で履歴に追加し、メンバー全員に配送
        let (report, now_empty) = {
            let mut room = room.lock().await;
            let report = room.append_and_broadcast(message);
            (report, room.is_empty())
        };

        tracing::debug!(
            "Broadcasted message to {} member(s) of room '{}'",
            report.delivered.len(),
            room_id
        );

        // 2. 配送に失敗したメンバーは外された。空になったらルームを削除
        if report.has_failures() {
            for session_id in &report.failed {
                tracing::warn!(
                    "Delivery to session '{}' failed; evicted from room '{}'",
                    session_id,
                    room_id
                );
            }
            if now_empty {
                self.repository.remove_if_empty(room_id).await;
            }
        }

        report
    }
}

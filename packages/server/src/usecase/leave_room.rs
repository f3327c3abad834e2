//! UseCase: ルーム退出処理
//!
//! 切断時と、別のルームへ移るときに使われます。

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository, SessionId, SharedRoom};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム退出を実行
    ///
    /// メンバーでなければ何もしない（エラーにはならない）。
    ///
    /// # Returns
    ///
    /// ルームが空になり削除された場合は `true`
    pub async fn execute(&self, session_id: SessionId, room_id: &RoomId, room: &SharedRoom) -> bool {
        // 1. Room のロックの下でメンバーから外す
        let left = room.lock().await.leave(&session_id);
        if left {
            tracing::info!("Session '{}' left room '{}'", session_id, room_id);
        }

        // 2. Room のロックを解放してから、空であればレジストリから削除
        self.repository.remove_if_empty(room_id).await
    }
}

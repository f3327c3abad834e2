//! UseCase: ルーム参加処理

use std::sync::Arc;

use crate::domain::{ChatMessage, RoomError, RoomId, RoomRepository, Session, SharedRoom};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok((SharedRoom, Vec<ChatMessage>))` - 参加したルームと、参加時点の履歴（古い順）
    /// * `Err(RoomError::RoomNotFound)` - ルームが存在しない、または削除と競合した
    pub async fn execute(
        &self,
        session: Session,
        room_id: &RoomId,
    ) -> Result<(SharedRoom, Vec<ChatMessage>), RoomError> {
        let session_id = session.id();

        // 1. レジストリから Room を取得（レジストリのロックはここで解放される）
        let room = self.repository.find_room(room_id).await?;

        // 2. Room のロックの下で参加し、応答を積む（閉じていれば RoomNotFound）
        let history = room.lock().await.join(session)?;

        tracing::info!(
            "Session '{}' joined room '{}' ({} messages in history)",
            session_id,
            room_id,
            history.len()
        );
        Ok((room, history))
    }
}

//! UseCase: ルーム詳細取得処理（診断用）

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository, RoomSnapshot};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム詳細を取得
    ///
    /// # Returns
    ///
    /// * `Ok(RoomSnapshot)` - ルームの状態
    /// * `Err(GetRoomDetailError::RoomNotFound)` - ルームが存在しない
    pub async fn execute(&self, room_id: String) -> Result<RoomSnapshot, GetRoomDetailError> {
        let room_id = RoomId::new(room_id.clone())
            .map_err(|_| GetRoomDetailError::RoomNotFound(room_id))?;
        let room = self
            .repository
            .find_room(&room_id)
            .await
            .map_err(|_| GetRoomDetailError::RoomNotFound(room_id.into_string()))?;

        let snapshot = room.lock().await.snapshot();
        Ok(snapshot)
    }
}

//! UseCase 層のエラー型

use thiserror::Error;

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Room not found: {0}")]
    RoomNotFound(String),
}

//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("room id is too long (max {max} chars, got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },
}

/// Room 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// 存在しない、または既に削除されたルーム
    #[error("Room not found: {0}")]
    RoomNotFound(String),
}

/// メンバー 1 人へのメッセージ配送失敗
///
/// 再送はしない。配送に失敗したメンバーはその場でルームから外される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// 接続先の送信タスクが既に終了している
    #[error("connection closed")]
    ConnectionClosed,
}

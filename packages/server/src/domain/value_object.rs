//! 値オブジェクト
//!
//! ルーム ID・セッション ID・タイムスタンプを表す型。

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// ルーム ID の最大長（文字数）
pub const ROOM_ID_MAX_LENGTH: usize = 128;

/// ルーム ID
///
/// 書式は実装の詳細であり、プロセス内で一意であることだけが契約です。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// 外部から受け取った文字列を検証して RoomId を作成
    ///
    /// # Errors
    ///
    /// 空文字列、または [`ROOM_ID_MAX_LENGTH`] を超える場合はエラー
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyRoomId);
        }
        let length = value.chars().count();
        if length > ROOM_ID_MAX_LENGTH {
            return Err(ValueObjectError::RoomIdTooLong {
                max: ROOM_ID_MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(value))
    }

    /// 生成器が作った ID（空でないことが保証されている）
    pub(crate) fn from_generated(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// セッション ID
///
/// 接続確立時に発行され、接続が続く間は変わりません。
/// トランスポート固有のハンドルとは独立しています。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(Uuid);

impl SessionId {
    /// 新しいセッション ID を発行
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

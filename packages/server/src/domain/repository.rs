//! Repository trait 定義
//!
//! ルームレジストリ（ルーム ID → Room の対応表）へのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## ロック順序
//!
//! レジストリのロックは Room の参照を得る・挿入する・削除するためだけに取り、
//! Room のロックを取る前に解放する。Room のロックを保持したままレジストリの
//! ロックを取ってはならない。

use async_trait::async_trait;

use super::{
    entity::RoomSummary,
    error::RoomError,
    room::SharedRoom,
    session::Session,
    value_object::RoomId,
};

/// Room Repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 一意な ID を発行し、`creator` をメンバーに含めたルームを登録する
    ///
    /// ルームは作成者が参加した状態で公開されるため、公開直後に空のルームとして
    /// 削除されることはない。通常の運用では失敗しない。ID の衝突は不具合として扱われる。
    async fn create_room(&self, name: String, creator: Session) -> (RoomId, SharedRoom);

    /// ルームを取得
    async fn find_room(&self, room_id: &RoomId) -> Result<SharedRoom, RoomError>;

    /// 現時点のルーム一覧（ID 順）
    async fn list_rooms(&self) -> Vec<RoomSummary>;

    /// メンバーが空であればルームを削除する
    ///
    /// 削除した（または既に閉じられていた）場合は `true` を返す。
    async fn remove_if_empty(&self, room_id: &RoomId) -> bool;

    /// 登録されているルーム数
    async fn count_rooms(&self) -> usize;
}

//! UseCase: ルーム作成処理
//!
//! 作成したセッションを最初のメンバーとして新しいルームを登録します。
//! ルームは作成者が参加した状態で公開されるため、この操作は失敗しません。

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository, Session, SharedRoom};

/// ルーム作成のユースケース
pub struct OpenRoomUseCase {
    /// Repository（ルームレジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl OpenRoomUseCase {
    /// 新しい OpenRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム作成を実行
    ///
    /// 作成者への `RoomOpened` 応答はルームの公開前に積まれる。
    pub async fn execute(&self, session: Session, name: String) -> (RoomId, SharedRoom) {
        let session_id = session.id();
        let (room_id, room) = self.repository.create_room(name, session).await;

        tracing::info!("Session '{}' opened room '{}'", session_id, room_id);
        (room_id, room)
    }
}

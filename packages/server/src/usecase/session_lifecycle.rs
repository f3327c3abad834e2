//! UseCase: セッションのライフサイクル
//!
//! 接続 1 つ分の状態（セッションと現在のルームへの参照）を持ち、
//! クライアントから届いたコマンドをユースケースに振り分けます。
//!
//! | コマンド     | 操作                                  | 応答                    |
//! |--------------|---------------------------------------|-------------------------|
//! | OpenRoom     | 現在のルームを退出 → 作成者を含めて作成 | RoomOpened              |
//! | JoinRoom     | 取得 → 参加 → 以前のルームを退出      | RoomJoined / JoinFailed |
//! | SendMessage  | 現在のルームに追加してブロードキャスト | なし                    |
//! | 切断         | 現在のルームを退出                    | なし                    |
//!
//! セッションが同時に所属するルームは 1 つだけです。
//!
//! `RoomOpened` / `RoomJoined` はルームのロックの下でルーム自身が送信者に積み、
//! `JoinFailed` はここで積みます。`handle` の戻り値は送った応答の控えです。

use std::sync::{Arc, Weak};

use tokio::sync::Mutex;

use crate::domain::{Room, RoomError, RoomId, Session, SessionCommand, SessionReply, SharedRoom};

use super::{JoinRoomUseCase, LeaveRoomUseCase, OpenRoomUseCase, SendMessageUseCase};

/// セッションが使うユースケース一式
#[derive(Clone)]
pub struct SessionUseCases {
    pub open_room: Arc<OpenRoomUseCase>,
    pub join_room: Arc<JoinRoomUseCase>,
    pub leave_room: Arc<LeaveRoomUseCase>,
    pub send_message: Arc<SendMessageUseCase>,
}

/// 現在のルームへの参照
///
/// ルームを所有するのはレジストリであり、ここでは所有しない。
struct CurrentRoom {
    id: RoomId,
    room: Weak<Mutex<Room>>,
}

impl CurrentRoom {
    fn new(id: RoomId, room: &SharedRoom) -> Self {
        Self {
            id,
            room: Arc::downgrade(room),
        }
    }
}

/// 接続 1 つ分のディスパッチャ
pub struct SessionLifecycle {
    session: Session,
    current_room: Option<CurrentRoom>,
    usecases: SessionUseCases,
}

impl SessionLifecycle {
    pub fn new(session: Session, usecases: SessionUseCases) -> Self {
        Self {
            session,
            current_room: None,
            usecases,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 現在所属しているルームの ID
    pub fn current_room_id(&self) -> Option<&RoomId> {
        self.current_room.as_ref().map(|current| &current.id)
    }

    /// コマンドを処理し、送信者へ積んだ応答があればその控えを返す
    pub async fn handle(&mut self, command: SessionCommand) -> Option<SessionReply> {
        match command {
            SessionCommand::OpenRoom { name } => Some(self.open_room(name).await),
            SessionCommand::JoinRoom { room_id } => Some(self.join_room(room_id).await),
            SessionCommand::SendMessage { nickname, body } => {
                self.send_message(nickname, body).await;
                None
            }
        }
    }

    /// 切断時の後片付け
    ///
    /// 何度呼んでも失敗しない。
    pub async fn disconnect(&mut self) {
        self.leave_current_room().await;
        tracing::debug!("Session '{}' cleaned up", self.session.id());
    }

    async fn open_room(&mut self, name: String) -> SessionReply {
        self.leave_current_room().await;

        let (room_id, room) = self
            .usecases
            .open_room
            .execute(self.session.clone(), name)
            .await;
        self.current_room = Some(CurrentRoom::new(room_id.clone(), &room));
        SessionReply::RoomOpened { room_id }
    }

    async fn join_room(&mut self, raw_room_id: String) -> SessionReply {
        let room_id = match RoomId::new(raw_room_id.clone()) {
            Ok(room_id) => room_id,
            Err(_) => return self.join_failed(RoomError::RoomNotFound(raw_room_id)),
        };

        // 失敗した場合は現在のルームに留まる
        let (room, history) = match self
            .usecases
            .join_room
            .execute(self.session.clone(), &room_id)
            .await
        {
            Ok(joined) => joined,
            Err(e) => {
                tracing::info!("Session '{}' failed to join: {}", self.session.id(), e);
                return self.join_failed(e);
            }
        };

        if self.current_room_id() != Some(&room_id) {
            self.leave_current_room().await;
        }
        self.current_room = Some(CurrentRoom::new(room_id, &room));

        SessionReply::RoomJoined { history }
    }

    /// 参加失敗を送信者に積む。現在のルームは変わらない
    fn join_failed(&self, error: RoomError) -> SessionReply {
        let reply = SessionReply::JoinFailed(error);
        self.session.reply(&reply);
        reply
    }

    async fn send_message(&mut self, nickname: String, body: String) {
        let Some(current) = &self.current_room else {
            tracing::debug!(
                "Session '{}' sent a message without a room; ignored",
                self.session.id()
            );
            return;
        };
        let Some(room) = current.room.upgrade() else {
            self.current_room = None;
            return;
        };

        self.usecases
            .send_message
            .execute(&current.id, &room, nickname, body)
            .await;
    }

    async fn leave_current_room(&mut self) {
        let Some(current) = self.current_room.take() else {
            return;
        };
        if let Some(room) = current.room.upgrade() {
            self.usecases
                .leave_room
                .execute(self.session.id(), &current.id, &room)
                .await;
        }
    }
}

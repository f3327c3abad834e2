//! Room 集約
//!
//! メンバー集合と直近メッセージの履歴（上限付き FIFO）を保持します。
//! 並行アクセスは `SharedRoom`（ルームごとのロック）で保護され、
//! レジストリのロックとは独立しています。

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Arc,
};

use tokio::sync::Mutex;

use super::{
    broadcast::fan_out,
    entity::{ChatMessage, DeliveryReport, RoomSnapshot},
    error::RoomError,
    session::{Session, SessionReply},
    value_object::{RoomId, SessionId, Timestamp},
};

/// ルームごとに保持する履歴の既定の上限
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

/// ルームごとのロックで保護された Room
pub type SharedRoom = Arc<Mutex<Room>>;

/// チャットルーム
///
/// 状態遷移: Active（作成者が参加した状態で作成）→（最後の leave）→ Empty →（レジストリから削除）Closed
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub created_at: Timestamp,
    members: HashMap<SessionId, Session>,
    history: VecDeque<ChatMessage>,
    history_capacity: usize,
    /// レジストリから削除済み。以後の join は `RoomNotFound` になる
    closed: bool,
}

impl Room {
    pub fn new(id: RoomId, name: String, created_at: Timestamp) -> Self {
        Self::with_capacity(id, name, created_at, DEFAULT_HISTORY_CAPACITY)
    }

    /// 作成者をメンバーに含めた状態で Room を作成
    ///
    /// 作成者への `RoomOpened` 応答は、ルームがレジストリに公開される前に積まれる。
    /// そのため作成者にはどのブロードキャストよりも先に応答が届き、
    /// メンバーのいないルームが他のセッションから見えることもない。
    pub fn open(id: RoomId, name: String, created_at: Timestamp, creator: Session) -> Self {
        let mut room = Self::new(id, name, created_at);
        creator.reply(&SessionReply::RoomOpened {
            room_id: room.id.clone(),
        });
        room.members.insert(creator.id(), creator);
        room
    }

    /// 履歴の上限を指定して Room を作成
    pub fn with_capacity(
        id: RoomId,
        name: String,
        created_at: Timestamp,
        history_capacity: usize,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            members: HashMap::new(),
            history: VecDeque::with_capacity(history_capacity),
            history_capacity,
            closed: false,
        }
    }

    /// セッションをメンバーに加え、現在の履歴のコピーを返す
    ///
    /// 既にメンバーであれば集合は変わらない。
    /// `RoomJoined` 応答はロックを保持している間に積まれるため、
    /// 参加したセッションには応答より先にブロードキャストが届くことはない。
    ///
    /// # Errors
    ///
    /// ルームが既にレジストリから削除されている場合は `RoomError::RoomNotFound`
    pub fn join(&mut self, session: Session) -> Result<Vec<ChatMessage>, RoomError> {
        if self.closed {
            return Err(RoomError::RoomNotFound(self.id.as_str().to_string()));
        }
        let history = self.history();
        session.reply(&SessionReply::RoomJoined {
            history: history.clone(),
        });
        self.members.entry(session.id()).or_insert(session);
        Ok(history)
    }

    /// メンバーから外す。メンバーでなければ何もしない
    ///
    /// 外した場合は `true` を返す。
    pub fn leave(&mut self, session_id: &SessionId) -> bool {
        self.members.remove(session_id).is_some()
    }

    /// 履歴に追加してから現在のメンバー全員に配送する
    ///
    /// 配送に失敗したメンバーはこの呼び出しの中で外される。
    /// メンバーがいない場合は履歴への追加だけが行われる。
    pub fn append_and_broadcast(&mut self, message: ChatMessage) -> DeliveryReport {
        self.push_history(message.clone());

        let report = fan_out(self.members.values(), &message);
        for session_id in &report.failed {
            self.members.remove(session_id);
        }
        report
    }

    /// 空であれば閉じる（レジストリからの削除の前段）
    ///
    /// 閉じた、または既に閉じていた場合は `true` を返す。
    pub fn close_if_empty(&mut self) -> bool {
        if self.members.is_empty() {
            self.closed = true;
        }
        self.closed
    }

    /// 診断・テスト用のメンバー ID 集合
    pub fn snapshot_members(&self) -> HashSet<SessionId> {
        self.members.keys().copied().collect()
    }

    /// 古い順の履歴のコピー
    pub fn history(&self) -> Vec<ChatMessage> {
        self.history.iter().cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        let mut members: Vec<SessionId> = self.members.keys().copied().collect();
        members.sort();
        RoomSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
            members,
            history_len: self.history.len(),
        }
    }

    fn push_history(&mut self, message: ChatMessage) {
        if self.history_capacity == 0 {
            return;
        }
        while self.history.len() >= self.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(message);
    }
}

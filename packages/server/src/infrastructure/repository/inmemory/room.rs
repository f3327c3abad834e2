//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリのルームレジストリとして使用します。
//!
//! ## ロックの構成
//!
//! - レジストリ全体のロック: `rooms`（ID → Room の対応表）
//! - ルームごとのロック: `SharedRoom`
//!
//! 2 つのロックを同時に保持することはありません。
//!
//! ## 空ルームの削除と join の競合
//!
//! `remove_if_empty` はルームのロックの下で空であることを再確認してルームを
//! 閉じ（`Room::close_if_empty`）、ロックを解放してからレジストリから削除します。
//! 削除と競合した join は閉じたルームを見て `RoomNotFound` になるため、
//! 削除済みのルームに参加してしまうことはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use hiroba_shared::time::Clock;

use crate::domain::{
    Room, RoomError, RoomId, RoomIdGenerator, RoomRepository, RoomSummary, Session, SharedRoom,
    Timestamp,
};

/// レジストリの 1 エントリ
///
/// ルーム名は変更されないため、一覧の取得でルームのロックを取らずに済むよう
/// ここにも保持する。
struct RoomEntry {
    name: String,
    room: SharedRoom,
}

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// ルーム ID → Room
    rooms: Mutex<HashMap<RoomId, RoomEntry>>,
    id_generator: Arc<dyn RoomIdGenerator>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 空のレジストリを作成
    pub fn new(id_generator: Arc<dyn RoomIdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            id_generator,
            clock,
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    /// # Panics
    ///
    /// 生成器が既存のルームと同じ ID を返した場合（生成器の不具合）
    async fn create_room(&self, name: String, creator: Session) -> (RoomId, SharedRoom) {
        let room_id = self.id_generator.generate();
        let created_at = Timestamp::new(self.clock.now_millis());
        let room = Arc::new(Mutex::new(Room::open(
            room_id.clone(),
            name.clone(),
            created_at,
            creator,
        )));

        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room_id) {
            tracing::error!("Room id collision detected for '{}'", room_id);
            panic!("room id generator produced a duplicate id: {room_id}");
        }
        rooms.insert(
            room_id.clone(),
            RoomEntry {
                name,
                room: room.clone(),
            },
        );
        tracing::debug!("Room '{}' registered ({} rooms)", room_id, rooms.len());

        (room_id, room)
    }

    async fn find_room(&self, room_id: &RoomId) -> Result<SharedRoom, RoomError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|entry| entry.room.clone())
            .ok_or_else(|| RoomError::RoomNotFound(room_id.as_str().to_string()))
    }

    async fn list_rooms(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.lock().await;
        let mut summaries: Vec<RoomSummary> = rooms
            .iter()
            .map(|(id, entry)| RoomSummary {
                id: id.clone(),
                name: entry.name.clone(),
            })
            .collect();
        drop(rooms);

        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    async fn remove_if_empty(&self, room_id: &RoomId) -> bool {
        // 1. レジストリのロックの下で Room の参照だけを得る
        let room = {
            let rooms = self.rooms.lock().await;
            match rooms.get(room_id) {
                Some(entry) => entry.room.clone(),
                None => return false,
            }
        };

        // 2. Room のロックの下で空であることを再確認して閉じる
        if !room.lock().await.close_if_empty() {
            return false;
        }

        // 3. 同じ Room がまだ登録されていれば削除する
        let mut rooms = self.rooms.lock().await;
        let is_same_room = rooms
            .get(room_id)
            .is_some_and(|entry| Arc::ptr_eq(&entry.room, &room));
        if is_same_room {
            rooms.remove(room_id);
            tracing::info!("Room '{}' is empty and was removed", room_id);
        }
        true
    }

    async fn count_rooms(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::{
        ChatMessage, DeliveryError, MessageSink, SequentialRoomIdGenerator, SessionReply,
    };
    use hiroba_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRepository の作成・取得・一覧・削除
    // - 並行して作成したルームの ID が重複しないこと
    // - 空ルームの削除と join の競合が起きないこと
    // - 作成直後のルームが、作成者が抜ける前に空として削除されないこと
    //
    // 【なぜこのテストが必要か】
    // - レジストリは全接続タスクから並行にアクセスされる共有状態
    // - 削除済みのルームに参加できてしまうと、メッセージが誰にも届かなくなる
    // ========================================

    struct NullSink;

    impl MessageSink for NullSink {
        fn deliver(&self, _message: &ChatMessage) -> Result<(), DeliveryError> {
            Ok(())
        }

        fn reply(&self, _reply: &SessionReply) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    /// 常に同じ ID を返す（不具合のある）生成器
    struct ConstantRoomIdGenerator;

    impl RoomIdGenerator for ConstantRoomIdGenerator {
        fn generate(&self) -> RoomId {
            RoomId::new("room_fixed".to_string()).unwrap()
        }
    }

    /// 呼び出し回数から ID を作る生成器
    #[derive(Default)]
    struct CountingRoomIdGenerator {
        next: AtomicUsize,
    }

    impl RoomIdGenerator for CountingRoomIdGenerator {
        fn generate(&self) -> RoomId {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            RoomId::new(format!("R{n}")).unwrap()
        }
    }

    fn create_test_repository() -> InMemoryRoomRepository {
        InMemoryRoomRepository::new(
            Arc::new(SequentialRoomIdGenerator::new()),
            Arc::new(FixedClock::new(1_000)),
        )
    }

    fn session() -> Session {
        Session::new(Arc::new(NullSink))
    }

    /// 作成者をルームから外す
    async fn leave(room: &SharedRoom, member: &Session) {
        room.lock().await.leave(&member.id());
    }

    #[tokio::test]
    async fn test_create_room_registers_room_with_creator() {
        // テスト項目: 作成したルームが作成者だけをメンバーに含めた状態で登録される
        // given (前提条件):
        let repo = create_test_repository();
        let creator = session();

        // when (操作):
        let (room_id, room) = repo.create_room("general".to_string(), creator.clone()).await;

        // then (期待する結果):
        let found = repo.find_room(&room_id).await.unwrap();
        assert!(Arc::ptr_eq(&found, &room));
        let room = room.lock().await;
        assert_eq!(room.name, "general");
        assert_eq!(room.created_at, Timestamp::new(1_000));
        assert_eq!(room.snapshot_members(), HashSet::from([creator.id()]));
    }

    #[tokio::test]
    async fn test_new_room_survives_foreign_join_and_leave() {
        // テスト項目: 作成直後に別セッションが一覧から参加して退出しても、作成者のいるルームは削除されない
        // given (前提条件):
        let repo = create_test_repository();
        let creator = session();
        let (room_id, _room) = repo.create_room("general".to_string(), creator.clone()).await;

        // when (操作): 一覧で見つけた別セッションが参加・退出し、空ルームの削除を試みる
        let listed = repo.list_rooms().await;
        let stranger = session();
        let room = repo.find_room(&listed[0].id).await.unwrap();
        room.lock().await.join(stranger.clone()).unwrap();
        leave(&room, &stranger).await;
        let removed = repo.remove_if_empty(&room_id).await;

        // then (期待する結果):
        assert!(!removed);
        let room = repo.find_room(&room_id).await.unwrap();
        assert_eq!(
            room.lock().await.snapshot_members(),
            HashSet::from([creator.id()])
        );
    }

    #[tokio::test]
    async fn test_find_room_not_found() {
        // テスト項目: 存在しない ID の取得は RoomNotFound になる
        // given (前提条件):
        let repo = create_test_repository();
        let room_id = RoomId::new("does-not-exist".to_string()).unwrap();

        // when (操作):
        let result = repo.find_room(&room_id).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RoomError::RoomNotFound(id)) if id == "does-not-exist"));
    }

    #[tokio::test]
    async fn test_list_rooms_returns_id_and_name() {
        // テスト項目: 一覧に全てのルームの ID と名前が含まれる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new(
            Arc::new(CountingRoomIdGenerator::default()),
            Arc::new(FixedClock::new(0)),
        );
        repo.create_room("general".to_string(), session()).await;
        repo.create_room("random".to_string(), session()).await;

        // when (操作):
        let rooms = repo.list_rooms().await;

        // then (期待する結果):
        assert_eq!(
            rooms,
            vec![
                RoomSummary {
                    id: RoomId::new("R0".to_string()).unwrap(),
                    name: "general".to_string(),
                },
                RoomSummary {
                    id: RoomId::new("R1".to_string()).unwrap(),
                    name: "random".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_if_empty_removes_empty_room() {
        // テスト項目: 最後のメンバーが抜けたルームは削除され、以後の取得は RoomNotFound になる
        // given (前提条件):
        let repo = create_test_repository();
        let member = session();
        let (room_id, room) = repo.create_room("general".to_string(), member.clone()).await;
        leave(&room, &member).await;

        // when (操作):
        let removed = repo.remove_if_empty(&room_id).await;

        // then (期待する結果):
        assert!(removed);
        assert!(matches!(
            repo.find_room(&room_id).await,
            Err(RoomError::RoomNotFound(_))
        ));
        assert_eq!(repo.count_rooms().await, 0);
    }

    #[tokio::test]
    async fn test_remove_if_empty_keeps_active_room() {
        // テスト項目: メンバーがいるルームは削除されない
        // given (前提条件):
        let repo = create_test_repository();
        let (room_id, _room) = repo.create_room("general".to_string(), session()).await;

        // when (操作):
        let removed = repo.remove_if_empty(&room_id).await;

        // then (期待する結果):
        assert!(!removed);
        assert!(repo.find_room(&room_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_if_empty_unknown_room_is_noop() {
        // テスト項目: 存在しないルームの削除は何もしない
        // given (前提条件):
        let repo = create_test_repository();
        let room_id = RoomId::new("unknown".to_string()).unwrap();

        // when (操作):
        let removed = repo.remove_if_empty(&room_id).await;

        // then (期待する結果):
        assert!(!removed);
    }

    #[tokio::test]
    async fn test_join_holding_stale_reference_after_removal_fails() {
        // テスト項目: 削除前に取得した参照から join しても、削除済みのルームには参加できない
        // given (前提条件):
        let repo = create_test_repository();
        let creator = session();
        let (room_id, room) = repo.create_room("general".to_string(), creator.clone()).await;
        let stale = repo.find_room(&room_id).await.unwrap();
        leave(&room, &creator).await;

        // when (操作):
        repo.remove_if_empty(&room_id).await;
        let result = stale.lock().await.join(session());

        // then (期待する結果):
        assert!(matches!(result, Err(RoomError::RoomNotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_room_ids_are_unique() {
        // テスト項目: 並行して作成したルームの ID が重複しない
        // given (前提条件):
        let repo = Arc::new(create_test_repository());

        // when (操作):
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    let mut ids = Vec::new();
                    for j in 0..32 {
                        let (id, _) = repo.create_room(format!("room {i}-{j}"), session()).await;
                        ids.push(id);
                    }
                    ids
                })
            })
            .collect();
        let mut ids = Vec::new();
        for handle in handles {
            ids.extend(handle.await.unwrap());
        }

        // then (期待する結果):
        let unique: HashSet<RoomId> = ids.into_iter().collect();
        assert_eq!(unique.len(), 64 * 32);
        assert_eq!(repo.count_rooms().await, 64 * 32);
    }

    #[tokio::test]
    #[should_panic(expected = "duplicate id")]
    async fn test_create_room_panics_on_id_collision() {
        // テスト項目: 生成器が同じ ID を返した場合は不具合として扱われる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new(
            Arc::new(ConstantRoomIdGenerator),
            Arc::new(FixedClock::new(0)),
        );
        repo.create_room("first".to_string(), session()).await;

        // when (操作):
        repo.create_room("second".to_string(), session()).await;

        // then (期待する結果): panic する
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_join_and_remove_never_joins_removed_room() {
        // テスト項目: join と空ルームの削除が競合しても、削除済みのルームにメンバーが残らない
        // given (前提条件):
        let repo = Arc::new(create_test_repository());

        for _ in 0..200 {
            let creator = session();
            let (room_id, room) = repo.create_room("race".to_string(), creator.clone()).await;
            leave(&room, &creator).await;

            // when (操作):
            let joiner = {
                let repo = repo.clone();
                let room_id = room_id.clone();
                tokio::spawn(async move {
                    match repo.find_room(&room_id).await {
                        Ok(room) => room.lock().await.join(session()).is_ok(),
                        Err(_) => false,
                    }
                })
            };
            let remover = {
                let repo = repo.clone();
                let room_id = room_id.clone();
                tokio::spawn(async move { repo.remove_if_empty(&room_id).await })
            };
            let joined = joiner.await.unwrap();
            let removed = remover.await.unwrap();

            // then (期待する結果): join と削除のどちらか一方だけが成功する
            assert_ne!(joined, removed);
            assert_eq!(repo.find_room(&room_id).await.is_ok(), joined);
        }
    }
}

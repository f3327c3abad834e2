//! ルーム ID の生成

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use super::value_object::RoomId;

/// ルーム ID の生成器
///
/// 同時に作成された 2 つのルームに同じ ID を返してはならない。
pub trait RoomIdGenerator: Send + Sync {
    fn generate(&self) -> RoomId;
}

/// ナノ秒精度の時刻と単調増加する連番から ID を作る生成器
///
/// 連番は生成器ごとに 0 から始まり、`room_<nanos>_<seq>` の形になる。
#[derive(Debug, Default)]
pub struct SequentialRoomIdGenerator {
    sequence: AtomicU64,
}

impl SequentialRoomIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoomIdGenerator for SequentialRoomIdGenerator {
    fn generate(&self) -> RoomId {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        RoomId::from_generated(format!("room_{nanos}_{sequence}"))
    }
}

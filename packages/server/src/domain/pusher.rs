//! MessageSink trait 定義
//!
//! コアが 1 クライアントへメッセージと応答を届けるためのインターフェース。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use super::{entity::ChatMessage, error::DeliveryError, session::SessionReply};

/// 1 セッションへの配送口
///
/// `deliver` はブロックしてはならない。ルームのロックを保持したまま呼ばれるため、
/// 実装はキューへの投入など即座に終わる処理に限る。
#[cfg_attr(test, mockall::automock)]
pub trait MessageSink: Send + Sync {
    /// メッセージを配送する
    ///
    /// エラーはそのセッションにとって終端的な失敗として扱われる。
    fn deliver(&self, message: &ChatMessage) -> Result<(), DeliveryError>;

    /// このセッションが送ったコマンドへの応答を届ける
    ///
    /// `deliver` と同じ順序の列に積まれること。
    fn reply(&self, reply: &SessionReply) -> Result<(), DeliveryError>;
}

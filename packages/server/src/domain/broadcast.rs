//! ブロードキャスト（fan-out）アルゴリズム
//!
//! メンバー全員に 1 件のメッセージを配送し、失敗したメンバーを集めて返す。
//! メンバー集合の変更（失敗したメンバーの削除）は呼び出し側が走査の後で行う。

use super::{entity::ChatMessage, entity::DeliveryReport, session::Session};

/// `recipients` 全員に `message` を配送する
///
/// 失敗は再送しない。メンバー間の配送順序は規定しない。
pub fn fan_out<'a, I>(recipients: I, message: &ChatMessage) -> DeliveryReport
where
    I: IntoIterator<Item = &'a Session>,
{
    let mut report = DeliveryReport::default();
    for session in recipients {
        match session.deliver(message) {
            Ok(()) => report.delivered.push(session.id()),
            Err(_) => report.failed.push(session.id()),
        }
    }
    report
}

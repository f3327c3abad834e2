//! UseCase 層
//!
//! コアの操作（ルーム作成・参加・退出・送信・一覧・詳細）と、
//! 接続 1 つ分のイベントを操作に振り分ける `SessionLifecycle`。

mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod leave_room;
mod open_room;
mod send_message;
mod session_lifecycle;

pub use error::GetRoomDetailError;
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use open_room::OpenRoomUseCase;
pub use send_message::SendMessageUseCase;
pub use session_lifecycle::{SessionLifecycle, SessionUseCases};

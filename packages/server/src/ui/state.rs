//! Server state shared by all handlers.

use std::sync::Arc;

use crate::usecase::{GetRoomDetailUseCase, GetRoomsUseCase, SessionUseCases};

/// Shared application state
///
/// Built once at startup with an empty room registry and shared by every
/// connection through axum's `State`.
pub struct AppState {
    /// UseCases driven by each WebSocket session
    pub session_usecases: SessionUseCases,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

//! Conversion logic between DTOs and domain types.

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, RoomError, RoomSnapshot, RoomSummary, SessionCommand, SessionReply};
use crate::infrastructure::dto::{http, websocket as dto};

/// Error text sent to clients when a join references an unknown room
pub const ROOM_NOT_FOUND_MESSAGE: &str = "Room not found";

// ========================================
// DTO → Domain
// ========================================

impl From<dto::ClientMessage> for SessionCommand {
    fn from(message: dto::ClientMessage) -> Self {
        match message {
            dto::ClientMessage::OpenRoom { room_name } => Self::OpenRoom { name: room_name },
            dto::ClientMessage::JoinRoom { room_id } => Self::JoinRoom { room_id },
            dto::ClientMessage::Message { nickname, message } => Self::SendMessage {
                nickname,
                body: message,
            },
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<ChatMessage> for dto::ServerMessage {
    fn from(model: ChatMessage) -> Self {
        Self::Message {
            nickname: model.nickname,
            message: model.body,
            time: model.time,
        }
    }
}

impl From<ChatMessage> for dto::HistoryEntry {
    fn from(model: ChatMessage) -> Self {
        Self {
            nickname: model.nickname,
            message: model.body,
            time: model.time,
        }
    }
}

impl From<SessionReply> for dto::ServerMessage {
    fn from(reply: SessionReply) -> Self {
        match reply {
            SessionReply::RoomOpened { room_id } => Self::ResOpenRoom {
                status: dto::Status::Ok,
                room_id: room_id.into_string(),
            },
            SessionReply::RoomJoined { history } => Self::ResJoinRoom {
                status: dto::Status::Ok,
                message: None,
                history: Some(history.into_iter().map(Into::into).collect()),
            },
            SessionReply::JoinFailed(RoomError::RoomNotFound(_)) => Self::ResJoinRoom {
                status: dto::Status::Error,
                message: Some(ROOM_NOT_FOUND_MESSAGE.to_string()),
                history: None,
            },
        }
    }
}

impl From<RoomSummary> for http::RoomSummaryDto {
    fn from(model: RoomSummary) -> Self {
        Self {
            room_id: model.id.into_string(),
            room_name: model.name,
        }
    }
}

impl From<RoomSnapshot> for http::RoomDetailDto {
    fn from(model: RoomSnapshot) -> Self {
        Self {
            id: model.id.into_string(),
            name: model.name,
            members: model.members.iter().map(ToString::to_string).collect(),
            history_len: model.history_len,
            created_at: timestamp_to_rfc3339(model.created_at.value()),
        }
    }
}

//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// One entry of `GET /getrooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    #[serde(rename = "roomid")]
    pub room_id: String,
    #[serde(rename = "roomname")]
    pub room_name: String,
}

/// Response of `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
    pub history_len: usize,
    pub created_at: String,
}

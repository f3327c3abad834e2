//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by its `protocol` field.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    /// Invalid JSON, unknown `protocol`, or a missing required field
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Failed to encode message: {0}")]
    Encode(String),
}

/// Messages sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum ClientMessage {
    OpenRoom {
        #[serde(rename = "roomname")]
        room_name: String,
    },
    JoinRoom {
        #[serde(rename = "roomid")]
        room_id: String,
    },
    Message {
        nickname: String,
        message: String,
    },
}

impl ClientMessage {
    /// Decode a text frame
    pub fn decode(text: &str) -> Result<Self, CodecError> {
        serde_json::from_str(text).map_err(|e| CodecError::MalformedMessage(e.to_string()))
    }
}

/// Response status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// One history entry returned on join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub nickname: String,
    pub message: String,
    pub time: String,
}

/// Messages sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum ServerMessage {
    ResOpenRoom {
        status: Status,
        #[serde(rename = "roomid")]
        room_id: String,
    },
    ResJoinRoom {
        status: Status,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        history: Option<Vec<HistoryEntry>>,
    },
    Message {
        nickname: String,
        message: String,
        time: String,
    },
}

impl ServerMessage {
    /// Encode as a text frame
    pub fn encode(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(|e| CodecError::Encode(e.to_string()))
    }
}

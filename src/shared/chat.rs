//! Transient chat messages.
//!
//! Chat is never persisted: a message exists only in the room broadcast and
//! in each client's in-memory transcript, which is cleared when the client
//! leaves the room.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::identity::UserIdentity;

/// Sender identity snapshot embedded in a chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatSender {
    pub name: String,
    pub color: String,
}

/// A chat message as fanned out to a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Composite of the sender's connection id and the send timestamp.
    pub id: String,
    pub text: String,
    pub sender: ChatSender,
    /// Epoch millis, assigned by the server.
    pub timestamp: i64,
}

impl ChatMessage {
    /// Enrich raw text from a connection into a full message.
    pub fn from_text(connection_id: Uuid, sender: &UserIdentity, text: String) -> Self {
        let timestamp = Utc::now().timestamp_millis();
        Self {
            id: format!("{}-{}", connection_id, timestamp),
            text,
            sender: ChatSender {
                name: sender.name.clone(),
                color: sender.color.clone(),
            },
            timestamp,
        }
    }
}

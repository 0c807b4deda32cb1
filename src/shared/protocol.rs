//! The sync protocol event catalog.
//!
//! Every frame on the WebSocket is a JSON envelope `{ "event": ..., "data":
//! ... }`. The catalog is fixed; the kebab-case serde rename produces the
//! exact wire names (`join-room`, `task-updated`, `online-users`, ...).
//!
//! # Announcements, not commands
//!
//! The socket layer is a notification bus. Task events carried here are
//! announcements of changes already committed through the HTTP CRUD surface;
//! the server relays them to the room without validating or persisting
//! anything. A client that fails a CRUD call must not announce it.
//!
//! # Echo-to-self
//!
//! Room fan-out includes the sender. A client's own confirmed change arrives
//! back through the same merge path as a peer's, which keeps the client-side
//! reconciliation logic uniform.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::chat::ChatMessage;
use crate::shared::identity::UserIdentity;
use crate::shared::task::Task;

/// Events emitted by a client over the socket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Register presence in a list room; triggers a roster broadcast.
    JoinRoom { room_id: i64 },
    /// Leave the room; triggers a roster broadcast.
    LeaveRoom { room_id: i64 },
    /// Announce the authoritative state of a task after a committed
    /// create or update.
    TaskUpdate { room_id: i64, task: Task },
    /// Announce a committed deletion.
    TaskDelete { room_id: i64, task_id: i64 },
    /// Announce a committed full-list reordering.
    TasksReorder { room_id: i64, tasks: Vec<Task> },
    /// Raw chat text; the server enriches it with sender identity.
    ChatMessage { room_id: i64, text: String },
    /// Request a name/color change.
    IdentityUpdate { name: String, color: String },
}

/// Events fanned out by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Full roster replace, not a diff. Sent to a joining connection as a
    /// pre-join snapshot and to a room on every membership change.
    OnlineUsers { users: Vec<UserIdentity> },
    TaskUpdated { room_id: i64, task: Task },
    TaskDeleted { room_id: i64, task_id: i64 },
    TasksReordered { room_id: i64, tasks: Vec<Task> },
    /// Chat message enriched with sender identity, id, and timestamp.
    ChatMessage { message: ChatMessage },
    /// Fanned out to the sender's current room only.
    IdentityUpdated {
        connection_id: Uuid,
        name: String,
        color: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_wire_names() {
        let event = ClientEvent::JoinRoom { room_id: 7 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "join-room");
        assert_eq!(json["data"]["room_id"], 7);

        let event = ClientEvent::TaskDelete {
            room_id: 7,
            task_id: 42,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap()["event"],
            "task-delete"
        );

        let event = ClientEvent::IdentityUpdate {
            name: "Ana".to_string(),
            color: "#00ff00".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap()["event"],
            "identity-update"
        );
    }

    #[test]
    fn test_server_event_wire_names() {
        let event = ServerEvent::OnlineUsers { users: vec![] };
        assert_eq!(
            serde_json::to_value(&event).unwrap()["event"],
            "online-users"
        );

        let event = ServerEvent::TaskDeleted {
            room_id: 1,
            task_id: 2,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap()["event"],
            "task-deleted"
        );
    }

    #[test]
    fn test_chat_message_event_name_matches_both_directions() {
        // Both directions use the same "chat-message" name; only the payload
        // shape differs (raw text up, enriched message down).
        let up = ClientEvent::ChatMessage {
            room_id: 3,
            text: "hi".to_string(),
        };
        assert_eq!(serde_json::to_value(&up).unwrap()["event"], "chat-message");
    }

    #[test]
    fn test_envelope_roundtrip() {
        let event = ClientEvent::TasksReorder {
            room_id: 9,
            tasks: vec![],
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ClientEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}

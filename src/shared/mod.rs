//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the client and the server. All types are designed for JSON serialization
//! over the HTTP CRUD surface and the WebSocket sync protocol.

/// List entity
pub mod list;

/// Task entity and its tagged variant data
pub mod task;

/// Connection-scoped user identity
pub mod identity;

/// Transient chat messages
pub mod chat;

/// The sync protocol event catalog
pub mod protocol;

/// Re-export commonly used types for convenience
pub use chat::{ChatMessage, ChatSender};
pub use identity::UserIdentity;
pub use list::{List, ListSnapshot};
pub use protocol::{ClientEvent, ServerEvent};
pub use task::{NewTask, Task, TaskDetails, TaskOrder, TaskPatch};

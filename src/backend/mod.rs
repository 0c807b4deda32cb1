//! Backend Module
//!
//! Server-side code: the Axum HTTP + WebSocket server, presence tracking,
//! room fan-out, and the sqlx-backed list/task store.
//!
//! # Architecture
//!
//! The HTTP CRUD surface (`lists`, `tasks`) is the source of truth for data;
//! the WebSocket sync protocol (`realtime`) is a notification bus that fans
//! committed changes out to room members. Presence (`presence`) tracks which
//! connection occupies which list room.

/// Static-credential login
pub mod auth;

/// Error taxonomy and HTTP conversion
pub mod error;

/// List storage and handlers
pub mod lists;

/// Presence registry
pub mod presence;

/// Room router and WebSocket sessions
pub mod realtime;

/// Route wiring
pub mod routes;

/// Configuration, state, initialization
pub mod server;

/// Task storage and handlers
pub mod tasks;

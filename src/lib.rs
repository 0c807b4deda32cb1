//! CoList - Main Library
//!
//! CoList is a real-time collaborative to-do list application built with Rust.
//! Multiple users view and edit a shared list of hierarchical tasks, see each
//! other's presence, and chat, with changes propagated live to every connected
//! viewer of the list.
//!
//! # Module Structure
//!
//! The library is organized into three main modules:
//!
//! - **`shared`** - Types shared between client and server
//!   - List, task, and identity entities
//!   - The sync protocol event catalog
//!   - Chat message structures
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server with a WebSocket sync endpoint
//!   - Presence registry and room broadcast router
//!   - sqlx-backed list/task store
//!
//! - **`client`** - Headless client layer
//!   - HTTP API client for the CRUD surface
//!   - The reconciliation layer that merges optimistic local edits,
//!     server-confirmed state, and peer-broadcast events
//!   - Hierarchy construction and filtering helpers
//!
//! # Synchronization Model
//!
//! The WebSocket protocol is a notification bus, not the source of truth:
//! clients persist mutations through the HTTP CRUD surface first, then
//! announce the committed result to their room. The room router fans each
//! announcement out to every member, including the sender, so a client's own
//! confirmed change re-enters through the same merge path as a peer's.
//!
//! # Thread Safety
//!
//! Server-side shared state (presence, rooms) lives behind `Arc<RwLock<>>`
//! and `broadcast::Sender` handles inside `AppState`. The client layer is
//! single-owner and needs no locking.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;

/// Headless client reconciliation layer
pub mod client;

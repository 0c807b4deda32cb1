//! Presence tracking.
//!
//! The registry is the authoritative mapping of live connection to identity
//! to current room. It is owned by `AppState` behind an `Arc<RwLock<>>` and
//! only touched by the socket session tasks.

pub mod registry;

pub use registry::PresenceRegistry;

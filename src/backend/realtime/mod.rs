//! Real-time fan-out.
//!
//! The room router groups socket connections into per-list broadcast groups;
//! the socket module runs one session task per WebSocket connection and
//! wires client events, presence, and room fan-out together.

pub mod router;
pub mod socket;

pub use router::RoomRouter;

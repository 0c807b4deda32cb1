//! Client Module
//!
//! The headless client layer: everything a UI needs to present a live,
//! collaboratively edited list, minus the rendering.
//!
//! - [`api`] - HTTP access to the CRUD surface behind the `ListApi` trait
//! - [`list_view`] - the reconciliation layer that merges optimistic local
//!   edits, server-confirmed state, and peer-broadcast events into one
//!   consistent in-memory view
//! - [`hierarchy`] - pure functions turning the flat task set into a
//!   display forest, with filtering and nutrition roll-up
//! - [`config`] - environment passthroughs locating the server
//!
//! The layer is transport-agnostic on the socket side: the embedding
//! application feeds incoming [`crate::shared::ServerEvent`]s into
//! `ListView::apply_remote` and drains outgoing announcements from
//! `ListView::take_outgoing` into whatever connection it holds.

pub mod api;
pub mod config;
pub mod hierarchy;
pub mod list_view;

pub use api::{ApiError, HttpListApi, ListApi};
pub use hierarchy::{build_hierarchy, flatten, TaskFilter, TaskNode};
pub use list_view::{ListView, ViewPhase};

//! Server assembly: configuration, shared state, and app initialization.

pub mod config;
pub mod init;
pub mod state;

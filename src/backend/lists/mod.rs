//! List storage and HTTP handlers.

pub mod db;
pub mod handlers;

//! List entity shared between client and server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::task::Task;

/// A to-do list. The slug is a URL-safe unique key generated from the title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct List {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A list together with its full flat task set, as returned by
/// `GET /api/lists/slug/{slug}`. This is what a client loads when opening a
/// list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListSnapshot {
    pub list: List,
    pub tasks: Vec<Task>,
}

/// Request body for creating or renaming a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRequest {
    pub title: String,
}

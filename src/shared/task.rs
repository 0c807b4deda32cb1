//! Task entity shared between client and server.
//!
//! Tasks form a forest: each task belongs to one list, has at most one
//! parent, and carries an advisory `task_order` within its sibling group.
//! Variant-specific attributes (a work deadline, food macros) live in the
//! [`TaskDetails`] tagged union keyed by `task_type`, so a basic task cannot
//! carry a deadline and a food task cannot lose its macro fields to typos.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Variant data carried by a task, tagged by `task_type` on the wire.
///
/// The storage layer keeps `task_type` as an open string column; tags other
/// than the three known ones read back as `Basic`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "task_type", rename_all = "kebab-case")]
pub enum TaskDetails {
    /// A plain to-do item with no extra attributes.
    Basic,
    /// A work item with an optional deadline.
    WorkTask {
        #[serde(default)]
        deadline: Option<NaiveDate>,
    },
    /// A food item with macro nutrients (g/100g) and an optional picture URL.
    Food {
        #[serde(default)]
        carbohydrate: Option<f64>,
        #[serde(default)]
        protein: Option<f64>,
        #[serde(default)]
        fat: Option<f64>,
        #[serde(default)]
        picture: Option<String>,
    },
}

impl Default for TaskDetails {
    fn default() -> Self {
        TaskDetails::Basic
    }
}

impl TaskDetails {
    /// The `task_type` tag as stored in the database column.
    pub fn tag(&self) -> &'static str {
        match self {
            TaskDetails::Basic => "basic",
            TaskDetails::WorkTask { .. } => "work-task",
            TaskDetails::Food { .. } => "food",
        }
    }
}

/// A single task row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: i64,
    pub list_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_completed: bool,
    pub task_order: i64,
    /// `None` means root-level. A dangling reference (parent deleted) is
    /// valid data: clients promote such tasks to roots, the store never
    /// rewrites them.
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(flatten)]
    pub details: TaskDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a task. `task_order` is always assigned by the
/// server (max existing order in the sibling group + 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub list_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(flatten)]
    pub details: Option<TaskDetails>,
}

/// Partial update of a task. Absent fields are left untouched.
///
/// For `description`, `parent_id`, and `deadline` the wire format must
/// distinguish "not provided" from "set to null" (reparenting a subtask to
/// the root level sends `"parent_id": null`), hence the double `Option` with
/// an explicit deserializer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_order: Option<i64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub parent_id: Option<Option<i64>>,
    /// Replaces the whole variant payload (including `task_type`) when present.
    #[serde(flatten)]
    pub details: Option<TaskDetails>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.is_completed.is_none()
            && self.task_order.is_none()
            && self.parent_id.is_none()
            && self.details.is_none()
    }
}

impl Task {
    /// Apply a partial update in place. Used both by the store (inside the
    /// update transaction) and by the client's optimistic local apply, so the
    /// two sides cannot drift on patch semantics.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        if let Some(task_order) = patch.task_order {
            self.task_order = task_order;
        }
        if let Some(parent_id) = patch.parent_id {
            self.parent_id = parent_id;
        }
        if let Some(details) = &patch.details {
            self.details = details.clone();
        }
    }
}

/// One entry of a reorder batch: the task and its new sibling order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskOrder {
    pub id: i64,
    pub task_order: i64,
}

/// Deserialize a field that was explicitly present, mapping JSON `null` to
/// `Some(None)` instead of collapsing it into "absent".
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

//! Shared test fixtures.
//!
//! Every database test gets its own sqlite file in a temp directory; the
//! directory is dropped with the fixture. A file-backed database rather than
//! `:memory:` because the pool opens multiple connections and each in-memory
//! connection would see its own empty database.

#![allow(dead_code)]

use sqlx::SqlitePool;
use tempfile::TempDir;

use colist::backend::server::config::connect_database;
use colist::shared::{NewTask, TaskDetails};

pub struct TestDatabase {
    pool: SqlitePool,
    _dir: TempDir,
}

impl TestDatabase {
    /// Fresh database with migrations applied.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}/test.db", dir.path().display());
        let pool = connect_database(&url)
            .await
            .expect("Failed to open test database");
        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// A root-level basic task request.
pub fn basic_task(list_id: i64, title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        list_id,
        description: None,
        parent_id: None,
        details: None,
    }
}

/// A basic task request under the given parent.
pub fn child_task(list_id: i64, parent_id: i64, title: &str) -> NewTask {
    NewTask {
        parent_id: Some(parent_id),
        ..basic_task(list_id, title)
    }
}

/// A food task request with the given macros.
pub fn food_task(list_id: i64, title: &str, carbohydrate: f64, protein: f64, fat: f64) -> NewTask {
    NewTask {
        details: Some(TaskDetails::Food {
            carbohydrate: Some(carbohydrate),
            protein: Some(protein),
            fat: Some(fat),
            picture: None,
        }),
        ..basic_task(list_id, title)
    }
}

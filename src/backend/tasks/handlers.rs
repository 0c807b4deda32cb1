/**
 * Task HTTP Handlers
 *
 * Thin request/response mapping onto the task store. These endpoints are
 * the source of truth for task mutations; the WebSocket protocol only
 * announces their committed results.
 */
use axum::extract::{Path, State};
use axum::Json;
use sqlx::SqlitePool;

use crate::backend::error::BackendResult;
use crate::backend::tasks::db;
use crate::shared::task::{NewTask, Task, TaskOrder, TaskPatch};

/// POST /api/tasks
pub async fn create_task(
    State(pool): State<SqlitePool>,
    Json(new): Json<NewTask>,
) -> BackendResult<Json<Task>> {
    let task = db::create_task(&pool, &new).await?;
    tracing::info!(
        "[Tasks] Created task {} ('{}') in list {}",
        task.id,
        task.title,
        task.list_id
    );
    Ok(Json(task))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> BackendResult<Json<Task>> {
    Ok(Json(db::get_task(&pool, id).await?))
}

/// PATCH /api/tasks/{id} - partial update, any subset of mutable fields.
pub async fn update_task(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> BackendResult<Json<Task>> {
    Ok(Json(db::update_task(&pool, id, &patch).await?))
}

/// DELETE /api/tasks/{id} - returns the deleted task; children stay put.
pub async fn delete_task(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> BackendResult<Json<Task>> {
    Ok(Json(db::delete_task(&pool, id).await?))
}

/// PUT /api/lists/{id}/tasks/reorder - atomic batch of order changes.
pub async fn reorder_tasks(
    State(pool): State<SqlitePool>,
    Path(list_id): Path<i64>,
    Json(orders): Json<Vec<TaskOrder>>,
) -> BackendResult<Json<Vec<Task>>> {
    Ok(Json(db::reorder_tasks(&pool, list_id, &orders).await?))
}

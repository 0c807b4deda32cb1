/**
 * List HTTP Handlers
 *
 * Thin request/response mapping onto the list store. All real semantics
 * live in `lists::db`; handlers only extract input and shape output.
 */
use axum::extract::{Path, State};
use axum::Json;
use sqlx::SqlitePool;

use crate::backend::error::BackendResult;
use crate::backend::{lists::db, tasks};
use crate::shared::list::{List, ListRequest, ListSnapshot};

/// POST /api/lists
pub async fn create_list(
    State(pool): State<SqlitePool>,
    Json(req): Json<ListRequest>,
) -> BackendResult<Json<List>> {
    let list = db::create_list(&pool, &req.title).await?;
    tracing::info!("[Lists] Created list '{}' ({})", list.title, list.slug);
    Ok(Json(list))
}

/// GET /api/lists
pub async fn get_lists(State(pool): State<SqlitePool>) -> BackendResult<Json<Vec<List>>> {
    Ok(Json(db::list_lists(&pool).await?))
}

/// GET /api/lists/slug/{slug} - the list plus its full flat task set, which
/// is what a client loads when opening a list view.
pub async fn get_list_snapshot(
    State(pool): State<SqlitePool>,
    Path(slug): Path<String>,
) -> BackendResult<Json<ListSnapshot>> {
    let list = db::get_list_by_slug(&pool, &slug).await?;
    let tasks = tasks::db::tasks_for_list(&pool, list.id).await?;
    Ok(Json(ListSnapshot { list, tasks }))
}

/// PUT /api/lists/{id}
pub async fn update_list(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(req): Json<ListRequest>,
) -> BackendResult<Json<List>> {
    Ok(Json(db::update_list(&pool, id, &req.title).await?))
}

/// DELETE /api/lists/{id} - returns the deleted list.
pub async fn delete_list(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> BackendResult<Json<List>> {
    Ok(Json(db::delete_list(&pool, id).await?))
}

//! Database operations for tasks.
//!
//! The task table stores the variant payload as plain nullable columns next
//! to an open `task_type` tag; rows map into the `TaskDetails` union on the
//! way out, with unknown tags reading back as basic tasks.
//!
//! Two contract points matter to the sync core:
//!
//! - `create_task` assigns `task_order` = max existing order in the sibling
//!   group + 1; clients never pick their own order on create.
//! - `delete_task` removes only the addressed row. Children keep their
//!   dangling `parent_id` and are promoted to roots by clients.

use chrono::Utc;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::backend::error::{BackendError, BackendResult};
use crate::shared::task::{NewTask, Task, TaskDetails, TaskOrder, TaskPatch};

const TASK_COLUMNS: &str = "id, list_id, title, description, is_completed, task_order, parent_id, \
     task_type, deadline, carbohydrate, protein, fat, picture, created_at, updated_at";

/// Create a task. The sibling order is computed server-side.
pub async fn create_task(pool: &SqlitePool, new: &NewTask) -> BackendResult<Task> {
    let title = new.title.trim();
    if title.is_empty() {
        return Err(BackendError::validation("title", "must not be empty"));
    }
    // The list must exist; a dangling parent_id, by contrast, is tolerated.
    let list_exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM lists WHERE id = ?")
        .bind(new.list_id)
        .fetch_optional(pool)
        .await?;
    if list_exists.is_none() {
        return Err(BackendError::not_found("list"));
    }

    let (next_order,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(MAX(task_order), 0) + 1 FROM tasks WHERE list_id = ? AND parent_id IS ?",
    )
    .bind(new.list_id)
    .bind(new.parent_id)
    .fetch_one(pool)
    .await?;

    let details = new.details.clone().unwrap_or_default();
    let now = Utc::now();
    let task = Task {
        id: 0,
        list_id: new.list_id,
        title: title.to_string(),
        description: new.description.clone(),
        is_completed: false,
        task_order: next_order,
        parent_id: new.parent_id,
        details,
        created_at: now,
        updated_at: now,
    };

    let id = insert_task(pool, &task).await?;
    Ok(Task { id, ..task })
}

/// Fetch one task by id.
pub async fn get_task(pool: &SqlitePool, id: i64) -> BackendResult<Task> {
    let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(map_task_row).ok_or(BackendError::not_found("task"))
}

/// The full flat task set of a list, ordered by task_order.
pub async fn tasks_for_list(pool: &SqlitePool, list_id: i64) -> BackendResult<Vec<Task>> {
    let rows = sqlx::query(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE list_id = ? ORDER BY task_order, id"
    ))
    .bind(list_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(map_task_row).collect())
}

/// Partial update: any subset of the mutable fields, applied inside a
/// transaction via read-modify-write. Last writer wins under concurrency.
pub async fn update_task(pool: &SqlitePool, id: i64, patch: &TaskPatch) -> BackendResult<Task> {
    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            return Err(BackendError::validation("title", "must not be empty"));
        }
    }

    let mut tx = pool.begin().await?;
    let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let mut task = row.map(map_task_row).ok_or(BackendError::not_found("task"))?;

    task.apply_patch(patch);
    task.updated_at = Utc::now();
    write_task(&mut tx, &task).await?;
    tx.commit().await?;

    Ok(task)
}

/// Delete a task outright. Children are NOT cascaded or reparented: they
/// keep the dangling parent_id, and clients show them as roots.
pub async fn delete_task(pool: &SqlitePool, id: i64) -> BackendResult<Task> {
    let task = get_task(pool, id).await?;
    sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    tracing::info!("[Store] Deleted task {} ('{}')", id, task.title);
    Ok(task)
}

/// Apply a batch of sibling-order changes atomically: if any entry matches
/// no task in the list, nothing is changed. Returns the updated tasks in
/// batch order.
pub async fn reorder_tasks(
    pool: &SqlitePool,
    list_id: i64,
    orders: &[TaskOrder],
) -> BackendResult<Vec<Task>> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();
    for entry in orders {
        let result =
            sqlx::query("UPDATE tasks SET task_order = ?, updated_at = ? WHERE id = ? AND list_id = ?")
                .bind(entry.task_order)
                .bind(now)
                .bind(entry.id)
                .bind(list_id)
                .execute(&mut *tx)
                .await?;
        if result.rows_affected() == 0 {
            // Dropping the transaction rolls the whole batch back.
            return Err(BackendError::not_found("task"));
        }
    }
    tx.commit().await?;

    let all = tasks_for_list(pool, list_id).await?;
    let updated = orders
        .iter()
        .filter_map(|entry| all.iter().find(|t| t.id == entry.id).cloned())
        .collect();
    Ok(updated)
}

async fn insert_task(pool: &SqlitePool, task: &Task) -> BackendResult<i64> {
    let (deadline, carbohydrate, protein, fat, picture) = detail_columns(&task.details);
    let result = sqlx::query(
        r#"
        INSERT INTO tasks (list_id, title, description, is_completed, task_order, parent_id,
                           task_type, deadline, carbohydrate, protein, fat, picture,
                           created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(task.list_id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.is_completed)
    .bind(task.task_order)
    .bind(task.parent_id)
    .bind(task.details.tag())
    .bind(deadline)
    .bind(carbohydrate)
    .bind(protein)
    .bind(fat)
    .bind(picture)
    .bind(task.created_at)
    .bind(task.updated_at)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

async fn write_task(tx: &mut Transaction<'_, Sqlite>, task: &Task) -> BackendResult<()> {
    let (deadline, carbohydrate, protein, fat, picture) = detail_columns(&task.details);
    sqlx::query(
        r#"
        UPDATE tasks
        SET title = ?, description = ?, is_completed = ?, task_order = ?, parent_id = ?,
            task_type = ?, deadline = ?, carbohydrate = ?, protein = ?, fat = ?, picture = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.is_completed)
    .bind(task.task_order)
    .bind(task.parent_id)
    .bind(task.details.tag())
    .bind(deadline)
    .bind(carbohydrate)
    .bind(protein)
    .bind(fat)
    .bind(picture)
    .bind(task.updated_at)
    .bind(task.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

type DetailColumns = (
    Option<chrono::NaiveDate>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<String>,
);

fn detail_columns(details: &TaskDetails) -> DetailColumns {
    match details {
        TaskDetails::Basic => (None, None, None, None, None),
        TaskDetails::WorkTask { deadline } => (*deadline, None, None, None, None),
        TaskDetails::Food {
            carbohydrate,
            protein,
            fat,
            picture,
        } => (None, *carbohydrate, *protein, *fat, picture.clone()),
    }
}

fn map_task_row(row: sqlx::sqlite::SqliteRow) -> Task {
    let task_type: String = row.get("task_type");
    let details = match task_type.as_str() {
        "work-task" => TaskDetails::WorkTask {
            deadline: row.get("deadline"),
        },
        "food" => TaskDetails::Food {
            carbohydrate: row.get("carbohydrate"),
            protein: row.get("protein"),
            fat: row.get("fat"),
            picture: row.get("picture"),
        },
        // The column is an open tag; anything unrecognized reads as basic.
        _ => TaskDetails::Basic,
    };
    Task {
        id: row.get("id"),
        list_id: row.get("list_id"),
        title: row.get("title"),
        description: row.get("description"),
        is_completed: row.get("is_completed"),
        task_order: row.get("task_order"),
        parent_id: row.get("parent_id"),
        details,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

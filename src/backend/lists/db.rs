//! Database operations for lists.
//!
//! Slugs are generated from the title: lowercased, runs of non-alphanumeric
//! characters collapsed to `-`. A colliding slug gets an epoch-millis suffix
//! ("groceries" -> "groceries-1718000000000") so two lists can share a title.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::backend::error::{BackendError, BackendResult};
use crate::shared::list::List;

/// Create a list with a unique slug derived from its title.
pub async fn create_list(pool: &SqlitePool, title: &str) -> BackendResult<List> {
    let title = title.trim();
    if title.is_empty() {
        return Err(BackendError::validation("title", "must not be empty"));
    }

    let slug = unique_slug(pool, title).await?;
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO lists (title, slug, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(title)
    .bind(&slug)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(List {
        id: result.last_insert_rowid(),
        title: title.to_string(),
        slug,
        created_at: now,
        updated_at: now,
    })
}

/// Fetch a list by its URL slug.
pub async fn get_list_by_slug(pool: &SqlitePool, slug: &str) -> BackendResult<List> {
    let row = sqlx::query("SELECT id, title, slug, created_at, updated_at FROM lists WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    row.map(map_list_row).ok_or(BackendError::not_found("list"))
}

/// Fetch a list by id.
pub async fn get_list(pool: &SqlitePool, id: i64) -> BackendResult<List> {
    let row = sqlx::query("SELECT id, title, slug, created_at, updated_at FROM lists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(map_list_row).ok_or(BackendError::not_found("list"))
}

/// All lists, oldest first.
pub async fn list_lists(pool: &SqlitePool) -> BackendResult<Vec<List>> {
    let rows =
        sqlx::query("SELECT id, title, slug, created_at, updated_at FROM lists ORDER BY created_at")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(map_list_row).collect())
}

/// Rename a list. The slug is stable: renaming does not break shared URLs.
pub async fn update_list(pool: &SqlitePool, id: i64, title: &str) -> BackendResult<List> {
    let title = title.trim();
    if title.is_empty() {
        return Err(BackendError::validation("title", "must not be empty"));
    }

    let result = sqlx::query("UPDATE lists SET title = ?, updated_at = ? WHERE id = ?")
        .bind(title)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(BackendError::not_found("list"));
    }
    get_list(pool, id).await
}

/// Delete a list. Its tasks go with it via the list_id foreign key cascade.
pub async fn delete_list(pool: &SqlitePool, id: i64) -> BackendResult<List> {
    let list = get_list(pool, id).await?;
    sqlx::query("DELETE FROM lists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    tracing::info!("[Store] Deleted list {} ('{}')", id, list.title);
    Ok(list)
}

fn map_list_row(row: sqlx::sqlite::SqliteRow) -> List {
    List {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

async fn unique_slug(pool: &SqlitePool, title: &str) -> BackendResult<String> {
    let base = slugify(title);
    let taken: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM lists WHERE slug = ?")
        .bind(&base)
        .fetch_optional(pool)
        .await?;
    if taken.is_none() {
        return Ok(base);
    }
    Ok(format!("{}-{}", base, Utc::now().timestamp_millis()))
}

/// Lowercase the title and collapse every run of non-alphanumeric characters
/// into a single hyphen.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_dash = true; // suppress a leading dash
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "list".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Groceries"), "groceries");
        assert_eq!(slugify("Weekend Trip Plan"), "weekend-trip-plan");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("Mom & Dad's visit!"), "mom-dad-s-visit");
        assert_eq!(slugify("  spaced  out  "), "spaced-out");
    }

    #[test]
    fn test_slugify_never_empty() {
        assert_eq!(slugify("!!!"), "list");
    }
}

//! Store contract tests against a real sqlite database: slug assignment,
//! server-side ordering, patch semantics, deletion behavior, and reorder
//! atomicity.

mod common;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use colist::backend::error::BackendError;
use colist::backend::lists::db as lists;
use colist::backend::tasks::db as tasks;
use colist::shared::{TaskDetails, TaskOrder, TaskPatch};
use common::{basic_task, child_task, food_task, TestDatabase};

#[tokio::test]
async fn test_slug_generated_from_title() {
    let db = TestDatabase::new().await;
    let list = lists::create_list(db.pool(), "Grocery Run!").await.unwrap();
    assert_eq!(list.slug, "grocery-run");
    assert_eq!(list.title, "Grocery Run!");
}

#[tokio::test]
async fn test_slug_collision_gets_suffix() {
    let db = TestDatabase::new().await;
    let first = lists::create_list(db.pool(), "Weekend").await.unwrap();
    let second = lists::create_list(db.pool(), "Weekend").await.unwrap();

    assert_eq!(first.slug, "weekend");
    assert_ne!(second.slug, first.slug);
    assert!(second.slug.starts_with("weekend-"));

    // Both stay addressable by their own slug.
    let fetched = lists::get_list_by_slug(db.pool(), &second.slug)
        .await
        .unwrap();
    assert_eq!(fetched.id, second.id);
}

#[tokio::test]
async fn test_blank_list_title_rejected() {
    let db = TestDatabase::new().await;
    let err = lists::create_list(db.pool(), "   ").await.unwrap_err();
    assert_matches!(err, BackendError::Validation { field: "title", .. });
}

#[tokio::test]
async fn test_rename_keeps_slug_stable() {
    let db = TestDatabase::new().await;
    let list = lists::create_list(db.pool(), "Chores").await.unwrap();
    let renamed = lists::update_list(db.pool(), list.id, "House Chores")
        .await
        .unwrap();
    assert_eq!(renamed.title, "House Chores");
    assert_eq!(renamed.slug, "chores");
}

#[tokio::test]
async fn test_task_order_assigned_per_sibling_group() {
    let db = TestDatabase::new().await;
    let list = lists::create_list(db.pool(), "Plan").await.unwrap();

    let a = tasks::create_task(db.pool(), &basic_task(list.id, "a"))
        .await
        .unwrap();
    let b = tasks::create_task(db.pool(), &basic_task(list.id, "b"))
        .await
        .unwrap();
    // A child starts its own sibling group at 1.
    let child = tasks::create_task(db.pool(), &child_task(list.id, a.id, "a1"))
        .await
        .unwrap();

    assert_eq!(a.task_order, 1);
    assert_eq!(b.task_order, 2);
    assert_eq!(child.task_order, 1);
}

#[tokio::test]
async fn test_create_task_requires_existing_list() {
    let db = TestDatabase::new().await;
    let err = tasks::create_task(db.pool(), &basic_task(999, "lost"))
        .await
        .unwrap_err();
    assert_matches!(err, BackendError::NotFound { entity: "list" });
}

#[tokio::test]
async fn test_create_task_tolerates_dangling_parent() {
    let db = TestDatabase::new().await;
    let list = lists::create_list(db.pool(), "Plan").await.unwrap();
    let task = tasks::create_task(db.pool(), &child_task(list.id, 4242, "orphan"))
        .await
        .unwrap();
    assert_eq!(task.parent_id, Some(4242));
}

#[tokio::test]
async fn test_partial_update_touches_only_named_fields() {
    let db = TestDatabase::new().await;
    let list = lists::create_list(db.pool(), "Plan").await.unwrap();
    let task = tasks::create_task(db.pool(), &basic_task(list.id, "draft"))
        .await
        .unwrap();

    let patch = TaskPatch {
        is_completed: Some(true),
        ..TaskPatch::default()
    };
    let updated = tasks::update_task(db.pool(), task.id, &patch).await.unwrap();

    assert!(updated.is_completed);
    assert_eq!(updated.title, "draft");
    assert_eq!(updated.task_order, task.task_order);
    assert!(updated.updated_at >= task.updated_at);
}

#[tokio::test]
async fn test_patch_null_parent_moves_task_to_root() {
    let db = TestDatabase::new().await;
    let list = lists::create_list(db.pool(), "Plan").await.unwrap();
    let parent = tasks::create_task(db.pool(), &basic_task(list.id, "parent"))
        .await
        .unwrap();
    let child = tasks::create_task(db.pool(), &child_task(list.id, parent.id, "child"))
        .await
        .unwrap();

    // Absent parent_id leaves the link alone.
    let keep = tasks::update_task(
        db.pool(),
        child.id,
        &TaskPatch {
            title: Some("renamed".to_string()),
            ..TaskPatch::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(keep.parent_id, Some(parent.id));

    // Explicit null reparents to the root level.
    let promoted = tasks::update_task(
        db.pool(),
        child.id,
        &TaskPatch {
            parent_id: Some(None),
            ..TaskPatch::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(promoted.parent_id, None);
}

#[tokio::test]
async fn test_patch_can_change_variant() {
    let db = TestDatabase::new().await;
    let list = lists::create_list(db.pool(), "Pantry").await.unwrap();
    let task = tasks::create_task(db.pool(), &basic_task(list.id, "milk"))
        .await
        .unwrap();

    let patch = TaskPatch {
        details: Some(TaskDetails::Food {
            carbohydrate: Some(5.0),
            protein: Some(3.4),
            fat: Some(1.5),
            picture: None,
        }),
        ..TaskPatch::default()
    };
    tasks::update_task(db.pool(), task.id, &patch).await.unwrap();

    let reread = tasks::get_task(db.pool(), task.id).await.unwrap();
    assert_matches!(
        reread.details,
        TaskDetails::Food {
            protein: Some(p),
            ..
        } if p == 3.4
    );
}

#[tokio::test]
async fn test_update_missing_task_is_not_found() {
    let db = TestDatabase::new().await;
    let err = tasks::update_task(db.pool(), 77, &TaskPatch::default())
        .await
        .unwrap_err();
    assert_matches!(err, BackendError::NotFound { entity: "task" });
}

#[tokio::test]
async fn test_delete_task_leaves_children_behind() {
    let db = TestDatabase::new().await;
    let list = lists::create_list(db.pool(), "Plan").await.unwrap();
    let parent = tasks::create_task(db.pool(), &basic_task(list.id, "parent"))
        .await
        .unwrap();
    let child = tasks::create_task(db.pool(), &child_task(list.id, parent.id, "child"))
        .await
        .unwrap();

    tasks::delete_task(db.pool(), parent.id).await.unwrap();

    // The child survives with its dangling parent link intact.
    let survivor = tasks::get_task(db.pool(), child.id).await.unwrap();
    assert_eq!(survivor.parent_id, Some(parent.id));
    let err = tasks::get_task(db.pool(), parent.id).await.unwrap_err();
    assert_matches!(err, BackendError::NotFound { entity: "task" });
}

#[tokio::test]
async fn test_delete_list_cascades_its_tasks() {
    let db = TestDatabase::new().await;
    let list = lists::create_list(db.pool(), "Plan").await.unwrap();
    let task = tasks::create_task(db.pool(), &food_task(list.id, "rice", 28.0, 2.7, 0.3))
        .await
        .unwrap();

    lists::delete_list(db.pool(), list.id).await.unwrap();

    let err = tasks::get_task(db.pool(), task.id).await.unwrap_err();
    assert_matches!(err, BackendError::NotFound { entity: "task" });
}

#[tokio::test]
async fn test_reorder_applies_batch_and_returns_batch_order() {
    let db = TestDatabase::new().await;
    let list = lists::create_list(db.pool(), "Plan").await.unwrap();
    let a = tasks::create_task(db.pool(), &basic_task(list.id, "a"))
        .await
        .unwrap();
    let b = tasks::create_task(db.pool(), &basic_task(list.id, "b"))
        .await
        .unwrap();

    let orders = vec![
        TaskOrder { id: b.id, task_order: 1 },
        TaskOrder { id: a.id, task_order: 2 },
    ];
    let updated = tasks::reorder_tasks(db.pool(), list.id, &orders)
        .await
        .unwrap();

    let ids: Vec<i64> = updated.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
    assert_eq!(updated[0].task_order, 1);
    assert_eq!(updated[1].task_order, 2);

    let all = tasks::tasks_for_list(db.pool(), list.id).await.unwrap();
    let first: Vec<i64> = all.iter().map(|t| t.id).collect();
    assert_eq!(first, vec![b.id, a.id]);
}

#[tokio::test]
async fn test_reorder_with_unknown_id_rolls_back() {
    let db = TestDatabase::new().await;
    let list = lists::create_list(db.pool(), "Plan").await.unwrap();
    let a = tasks::create_task(db.pool(), &basic_task(list.id, "a"))
        .await
        .unwrap();

    let orders = vec![
        TaskOrder { id: a.id, task_order: 9 },
        TaskOrder { id: 4242, task_order: 1 },
    ];
    let err = tasks::reorder_tasks(db.pool(), list.id, &orders)
        .await
        .unwrap_err();
    assert_matches!(err, BackendError::NotFound { entity: "task" });

    // The valid entry earlier in the batch was rolled back too.
    let reread = tasks::get_task(db.pool(), a.id).await.unwrap();
    assert_eq!(reread.task_order, a.task_order);
}

#[tokio::test]
async fn test_reorder_scoped_to_list() {
    let db = TestDatabase::new().await;
    let mine = lists::create_list(db.pool(), "Mine").await.unwrap();
    let theirs = lists::create_list(db.pool(), "Theirs").await.unwrap();
    let foreign = tasks::create_task(db.pool(), &basic_task(theirs.id, "x"))
        .await
        .unwrap();

    // A task from another list counts as not found for this batch.
    let orders = vec![TaskOrder { id: foreign.id, task_order: 5 }];
    let err = tasks::reorder_tasks(db.pool(), mine.id, &orders)
        .await
        .unwrap_err();
    assert_matches!(err, BackendError::NotFound { entity: "task" });
}

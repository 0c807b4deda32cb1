//! Hierarchy construction and filtering.
//!
//! The store hands clients a flat task set; display wants a forest. The
//! functions here are pure and restartable: they recompute from the current
//! snapshot every time, never incrementally.
//!
//! # Orphan promotion
//!
//! A task whose `parent_id` points at a task not present in the set (the
//! parent was deleted, or its create has not arrived yet) is shown as a
//! root. Nothing is ever silently dropped; peers rely on this rule for
//! consistency because the store does not cascade or reparent on delete.

use std::collections::HashMap;

use crate::shared::task::{Task, TaskDetails};

/// A task with its children attached, sorted by `task_order`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    pub task: Task,
    pub children: Vec<TaskNode>,
}

/// Completion filter applied at the root level of the forest.
///
/// Deliberately not cascading: a root that matches is shown with its whole
/// subtree, unfiltered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.is_completed,
            TaskFilter::Completed => task.is_completed,
        }
    }
}

/// Build the display forest from the flat task set.
///
/// Two passes: index every task by id, then attach each task under its
/// parent where the parent resolves, else at the root. Siblings and roots
/// sort by `task_order` ascending (ties by id, so the output is stable
/// against the advisory ordering's transient duplicates).
pub fn build_hierarchy(tasks: &[Task]) -> Vec<TaskNode> {
    let known: HashMap<i64, ()> = tasks.iter().map(|t| (t.id, ())).collect();

    let mut children_of: HashMap<Option<i64>, Vec<Task>> = HashMap::new();
    for task in tasks {
        let key = match task.parent_id {
            Some(parent) if known.contains_key(&parent) => Some(parent),
            // Root task, or orphan promoted to root.
            _ => None,
        };
        children_of.entry(key).or_default().push(task.clone());
    }

    let mut roots = attach(None, &mut children_of);

    // A parent cycle (corrupt or mid-merge data) leaves tasks unreachable
    // from any root; promote those too rather than losing them.
    if !children_of.is_empty() {
        let mut stranded: Vec<Task> = children_of.drain().flat_map(|(_, v)| v).collect();
        stranded.sort_by_key(|t| (t.task_order, t.id));
        roots.extend(stranded.into_iter().map(|task| TaskNode {
            task,
            children: Vec::new(),
        }));
    }

    roots
}

fn attach(parent: Option<i64>, children_of: &mut HashMap<Option<i64>, Vec<Task>>) -> Vec<TaskNode> {
    let mut tasks = children_of.remove(&parent).unwrap_or_default();
    tasks.sort_by_key(|t| (t.task_order, t.id));
    tasks
        .into_iter()
        .map(|task| {
            let children = attach(Some(task.id), children_of);
            TaskNode { task, children }
        })
        .collect()
}

/// Pre-order traversal collecting every task back into a flat list.
pub fn flatten(nodes: &[TaskNode]) -> Vec<Task> {
    let mut out = Vec::new();
    for node in nodes {
        out.push(node.task.clone());
        out.extend(flatten(&node.children));
    }
    out
}

/// Apply the completion filter at the root level only.
pub fn filter_roots(nodes: Vec<TaskNode>, filter: TaskFilter) -> Vec<TaskNode> {
    nodes
        .into_iter()
        .filter(|node| filter.matches(&node.task))
        .collect()
}

/// Aggregated macro nutrients over a subtree, display only.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Nutrition {
    pub carbohydrate: f64,
    pub protein: f64,
    pub fat: f64,
}

/// Sum the positive macro fields of every food task in the subtree,
/// including the node itself. Absent and non-positive values contribute
/// nothing.
pub fn subtree_nutrition(node: &TaskNode) -> Nutrition {
    let mut total = own_nutrition(&node.task);
    for child in &node.children {
        let n = subtree_nutrition(child);
        total.carbohydrate += n.carbohydrate;
        total.protein += n.protein;
        total.fat += n.fat;
    }
    total
}

fn own_nutrition(task: &Task) -> Nutrition {
    match &task.details {
        TaskDetails::Food {
            carbohydrate,
            protein,
            fat,
            ..
        } => Nutrition {
            carbohydrate: positive(*carbohydrate),
            protein: positive(*protein),
            fat: positive(*fat),
        },
        _ => Nutrition::default(),
    }
}

fn positive(value: Option<f64>) -> f64 {
    value.filter(|v| *v > 0.0).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: i64, parent_id: Option<i64>, task_order: i64) -> Task {
        Task {
            id,
            list_id: 1,
            title: format!("task {}", id),
            description: None,
            is_completed: false,
            task_order,
            parent_id,
            details: TaskDetails::Basic,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_forest_shape() {
        let tasks = vec![
            task(1, None, 1),
            task(2, None, 2),
            task(3, Some(1), 1),
            task(4, Some(1), 2),
            task(5, Some(3), 1),
        ];
        let forest = build_hierarchy(&tasks);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].task.id, 1);
        assert_eq!(forest[0].children.len(), 2);
        assert_eq!(forest[0].children[0].children[0].task.id, 5);
    }

    #[test]
    fn test_orphans_promoted_to_roots() {
        let tasks = vec![task(1, None, 1), task(2, Some(99), 2)];
        let forest = build_hierarchy(&tasks);
        assert_eq!(forest.len(), 2);
        assert_eq!(flatten(&forest).len(), 2);
    }

    #[test]
    fn test_siblings_sorted_by_order() {
        let tasks = vec![task(1, None, 3), task(2, None, 1), task(3, None, 2)];
        let forest = build_hierarchy(&tasks);
        let ids: Vec<i64> = forest.iter().map(|n| n.task.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_parent_cycle_never_drops_tasks() {
        // 1 -> 2 -> 1 is unreachable from any root; both still show up.
        let tasks = vec![task(1, Some(2), 1), task(2, Some(1), 2), task(3, None, 1)];
        let forest = build_hierarchy(&tasks);
        assert_eq!(flatten(&forest).len(), 3);
    }

    #[test]
    fn test_filter_does_not_prune_subtrees() {
        let mut done_root = task(1, None, 1);
        done_root.is_completed = true;
        let tasks = vec![done_root, task(2, Some(1), 1), task(3, None, 2)];

        let forest = build_hierarchy(&tasks);
        let completed = filter_roots(forest.clone(), TaskFilter::Completed);
        assert_eq!(completed.len(), 1);
        // The active child rides along under its completed root.
        assert_eq!(completed[0].children.len(), 1);

        let active = filter_roots(forest, TaskFilter::Active);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].task.id, 3);
    }

    #[test]
    fn test_nutrition_rollup_ignores_non_positive() {
        let mut parent = task(1, None, 1);
        parent.details = TaskDetails::Food {
            carbohydrate: Some(10.0),
            protein: None,
            fat: Some(-2.0),
            picture: None,
        };
        let mut child = task(2, Some(1), 1);
        child.details = TaskDetails::Food {
            carbohydrate: Some(5.0),
            protein: Some(3.0),
            fat: Some(1.0),
            picture: None,
        };
        let forest = build_hierarchy(&[parent, child]);
        let total = subtree_nutrition(&forest[0]);
        assert_eq!(total.carbohydrate, 15.0);
        assert_eq!(total.protein, 3.0);
        assert_eq!(total.fat, 1.0);
    }
}

//! In-memory to-do store.
//!
//! `TodoStore` owns every record for the lifetime of the process. Records
//! are kept in a `BTreeMap` keyed by id; ids only grow, so iteration order
//! is creation order.

use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::model::{
    CreateTodo, ListQuery, SortOrder, Todo, TodoStats, TodoStatus, UpdateTodo,
};

#[derive(Debug)]
struct Inner {
    todos: BTreeMap<u64, Todo>,
    next_id: u64,
}

#[derive(Debug)]
pub struct TodoStore {
    inner: RwLock<Inner>,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                todos: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub async fn create(&self, input: CreateTodo) -> Todo {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let now = Utc::now();
        let todo = Todo {
            id,
            title: input.title,
            description: input.description,
            status: TodoStatus::Pending,
            priority: input.priority,
            created_at: now,
            updated_at: now,
        };
        inner.todos.insert(id, todo.clone());
        tracing::debug!(id, "created todo");
        todo
    }

    pub async fn get(&self, id: u64) -> Option<Todo> {
        self.inner.read().await.todos.get(&id).cloned()
    }

    pub async fn list(&self, query: &ListQuery) -> Vec<Todo> {
        let inner = self.inner.read().await;
        let matching = inner.todos.values().filter(|todo| query.matches(todo));
        match query.order {
            SortOrder::Asc => matching.cloned().collect(),
            SortOrder::Desc => matching.rev().cloned().collect(),
        }
    }

    pub async fn update(&self, id: u64, input: UpdateTodo) -> Option<Todo> {
        let mut inner = self.inner.write().await;
        let todo = inner.todos.get_mut(&id)?;
        if let Some(title) = input.title {
            todo.title = title;
        }
        if let Some(description) = input.description {
            todo.description = description;
        }
        if let Some(status) = input.status {
            todo.status = status;
        }
        if let Some(priority) = input.priority {
            todo.priority = priority;
        }
        todo.updated_at = Utc::now();
        tracing::debug!(id, "updated todo");
        Some(todo.clone())
    }

    pub async fn delete(&self, id: u64) -> bool {
        let removed = self.inner.write().await.todos.remove(&id).is_some();
        if removed {
            tracing::debug!(id, "deleted todo");
        }
        removed
    }

    pub async fn mark_completed(&self, id: u64) -> Option<Todo> {
        self.update(
            id,
            UpdateTodo {
                status: Some(TodoStatus::Completed),
                ..Default::default()
            },
        )
        .await
    }

    /// Removes every completed record and returns how many were dropped.
    pub async fn clear_completed(&self) -> usize {
        let mut inner = self.inner.write().await;
        let before = inner.todos.len();
        inner
            .todos
            .retain(|_, todo| todo.status != TodoStatus::Completed);
        let removed = before - inner.todos.len();
        tracing::debug!(removed, "cleared completed todos");
        removed
    }

    pub async fn stats(&self) -> TodoStats {
        let inner = self.inner.read().await;
        inner
            .todos
            .values()
            .fold(TodoStats::default(), |mut stats, todo| {
                stats.record(todo);
                stats
            })
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.todos.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TodoPriority;

    fn new_todo(title: &str) -> CreateTodo {
        CreateTodo {
            title: title.to_string(),
            description: None,
            priority: TodoPriority::default(),
        }
    }

    fn with_details(title: &str, description: &str, priority: TodoPriority) -> CreateTodo {
        CreateTodo {
            title: title.to_string(),
            description: Some(description.to_string()),
            priority,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_and_defaults() {
        let store = TodoStore::new();
        let first = store.create(new_todo("one")).await;
        let second = store.create(new_todo("two")).await;

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.status, TodoStatus::Pending);
        assert_eq!(first.priority, TodoPriority::Medium);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = TodoStore::new();
        let first = store.create(new_todo("one")).await;
        assert!(store.delete(first.id).await);
        let second = store.create(new_todo("two")).await;
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn get_returns_created_record() {
        let store = TodoStore::new();
        let created = store.create(new_todo("Buy milk")).await;
        assert_eq!(store.get(created.id).await, Some(created));
        assert_eq!(store.get(99).await, None);
    }

    #[tokio::test]
    async fn list_orders_by_creation_and_reverses_on_request() {
        let store = TodoStore::new();
        for title in ["a", "b", "c"] {
            store.create(new_todo(title)).await;
        }

        let asc: Vec<u64> = store
            .list(&ListQuery::default())
            .await
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(asc, vec![1, 2, 3]);

        let desc_query = ListQuery {
            order: SortOrder::Desc,
            ..Default::default()
        };
        let desc: Vec<u64> = store.list(&desc_query).await.iter().map(|t| t.id).collect();
        assert_eq!(desc, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn list_filters_by_status_priority_and_search() {
        let store = TodoStore::new();
        store
            .create(with_details("Python Project", "FastAPI development", TodoPriority::High))
            .await;
        store
            .create(with_details("Java Project", "Spring Boot app", TodoPriority::Low))
            .await;
        let done = store.create(new_todo("Done thing")).await;
        store.mark_completed(done.id).await;

        let by_status = store
            .list(&ListQuery {
                status: Some(TodoStatus::Completed),
                ..Default::default()
            })
            .await;
        assert_eq!(by_status.len(), 1);
        assert!(by_status.iter().all(|t| t.status == TodoStatus::Completed));

        let by_priority = store
            .list(&ListQuery {
                priority: Some(TodoPriority::High),
                ..Default::default()
            })
            .await;
        assert_eq!(by_priority.len(), 1);
        assert_eq!(by_priority[0].title, "Python Project");

        let by_description = store
            .list(&ListQuery {
                search: Some("spring".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].title, "Java Project");

        let combined = store
            .list(&ListQuery {
                search: Some("project".to_string()),
                priority: Some(TodoPriority::Low),
                ..Default::default()
            })
            .await;
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].title, "Java Project");
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let store = TodoStore::new();
        let created = store
            .create(with_details("Original", "Original description", TodoPriority::Low))
            .await;

        let updated = store
            .update(
                created.id,
                UpdateTodo {
                    title: Some("New title".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.description.as_deref(), Some("Original description"));
        assert_eq!(updated.priority, TodoPriority::Low);
        assert_eq!(updated.status, TodoStatus::Pending);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_can_clear_description() {
        let store = TodoStore::new();
        let created = store
            .create(with_details("Task", "remove me", TodoPriority::Medium))
            .await;
        let updated = store
            .update(
                created.id,
                UpdateTodo {
                    description: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.description.is_none());
    }

    #[tokio::test]
    async fn update_missing_returns_none() {
        let store = TodoStore::new();
        assert!(store.update(7, UpdateTodo::default()).await.is_none());
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let store = TodoStore::new();
        let created = store.create(new_todo("gone")).await;
        assert!(store.delete(created.id).await);
        assert!(!store.delete(created.id).await);
        assert!(store.get(created.id).await.is_none());
    }

    #[tokio::test]
    async fn mark_completed_sets_status() {
        let store = TodoStore::new();
        let created = store.create(new_todo("finish")).await;
        let completed = store.mark_completed(created.id).await.unwrap();
        assert_eq!(completed.status, TodoStatus::Completed);
        assert!(store.mark_completed(42).await.is_none());
    }

    #[tokio::test]
    async fn clear_completed_removes_exactly_completed() {
        let store = TodoStore::new();
        let a = store.create(new_todo("a")).await;
        let b = store.create(new_todo("b")).await;
        let c = store.create(new_todo("c")).await;
        store.mark_completed(a.id).await;
        store.mark_completed(c.id).await;

        assert_eq!(store.clear_completed().await, 2);
        assert_eq!(store.len().await, 1);
        assert!(store.get(b.id).await.is_some());
        assert_eq!(store.clear_completed().await, 0);
    }

    #[tokio::test]
    async fn stats_counts_every_bucket() {
        let store = TodoStore::new();
        assert_eq!(store.stats().await, TodoStats::default());
        assert!(store.is_empty().await);

        store
            .create(with_details("high", "", TodoPriority::High))
            .await;
        store.create(new_todo("medium")).await;
        let low = store
            .create(with_details("low", "", TodoPriority::Low))
            .await;
        store.mark_completed(low.id).await;

        let stats = store.stats().await;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status.pending, 2);
        assert_eq!(stats.by_status.completed, 1);
        assert_eq!(stats.by_status.in_progress, 0);
        assert_eq!(stats.by_priority.high, 1);
        assert_eq!(stats.by_priority.medium, 1);
        assert_eq!(stats.by_priority.low, 1);
    }
}

//! Wire and domain types for to-do records.
//!
//! The same structs serve as the in-memory representation and the JSON
//! schema; request payloads carry their own validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    #[serde(alias = "done")]
    Completed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TodoPriority,
}

impl CreateTodo {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_title(&self.title)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

/// Partial update payload. Omitted fields are left unchanged; an explicit
/// `"description": null` clears the description.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub status: Option<TodoStatus>,
    pub priority: Option<TodoPriority>,
}

impl UpdateTodo {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(Some(description)) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.is_empty() {
        return Err(ApiError::Validation("title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ApiError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ApiError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Creation order, oldest first.
    #[default]
    Asc,
    Desc,
}

/// Filters accepted by `GET /todos`. All supplied filters must match.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<TodoStatus>,
    pub priority: Option<TodoPriority>,
    pub search: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
}

impl ListQuery {
    pub fn matches(&self, todo: &Todo) -> bool {
        if self.status.is_some_and(|status| status != todo.status) {
            return false;
        }
        if self.priority.is_some_and(|priority| priority != todo.priority) {
            return false;
        }
        match self.search.as_deref().map(str::to_lowercase) {
            Some(needle) if !needle.is_empty() => {
                todo.title.to_lowercase().contains(&needle)
                    || todo
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
    pub total: usize,
}

impl From<Vec<Todo>> for TodoList {
    fn from(todos: Vec<Todo>) -> Self {
        let total = todos.len();
        Self { todos, total }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    pub total: usize,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
}

impl TodoStats {
    pub fn record(&mut self, todo: &Todo) {
        self.total += 1;
        match todo.status {
            TodoStatus::Pending => self.by_status.pending += 1,
            TodoStatus::InProgress => self.by_status.in_progress += 1,
            TodoStatus::Completed => self.by_status.completed += 1,
        }
        match todo.priority {
            TodoPriority::Low => self.by_priority.low += 1,
            TodoPriority::Medium => self.by_priority.medium += 1,
            TodoPriority::High => self.by_priority.high += 1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearedTodos {
    pub message: String,
    pub deleted: usize,
}

impl From<usize> for ClearedTodos {
    fn from(deleted: usize) -> Self {
        Self {
            message: format!("Deleted {deleted} completed todos"),
            deleted,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(title: &str, description: Option<&str>) -> Todo {
        let now = Utc::now();
        Todo {
            id: 1,
            title: title.to_string(),
            description: description.map(str::to_string),
            status: TodoStatus::Pending,
            priority: TodoPriority::Medium,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn todo_serializes_enums_in_snake_case() {
        let mut item = todo("Test", None);
        item.status = TodoStatus::InProgress;
        item.priority = TodoPriority::High;
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["priority"], "high");
        assert!(json["description"].is_null());
    }

    #[test]
    fn status_accepts_done_alias() {
        let status: TodoStatus = serde_json::from_str(r#""done""#).unwrap();
        assert_eq!(status, TodoStatus::Completed);
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""completed""#);
    }

    #[test]
    fn status_rejects_unknown_value() {
        assert!(serde_json::from_str::<TodoStatus>(r#""archived""#).is_err());
    }

    #[test]
    fn create_todo_defaults_priority_to_medium() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"No priority"}"#).unwrap();
        assert_eq!(input.priority, TodoPriority::Medium);
        assert!(input.description.is_none());
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"priority":"low"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_title_fails_validation() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":""}"#).unwrap();
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn whitespace_title_passes_validation() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"   "}"#).unwrap();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn long_fields_fail_validation() {
        let input = CreateTodo {
            title: "x".repeat(MAX_TITLE_LEN + 1),
            description: None,
            priority: TodoPriority::Low,
        };
        assert!(input.validate().is_err());

        let input = CreateTodo {
            title: "ok".to_string(),
            description: Some("y".repeat(MAX_DESCRIPTION_LEN + 1)),
            priority: TodoPriority::Low,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_distinguishes_null_from_missing_description() {
        let missing: UpdateTodo = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert!(missing.description.is_none());

        let cleared: UpdateTodo = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateTodo = serde_json::from_str(r#"{"description":"text"}"#).unwrap();
        assert_eq!(set.description, Some(Some("text".to_string())));
    }

    #[test]
    fn update_validates_only_supplied_fields() {
        let input: UpdateTodo = serde_json::from_str(r#"{"status":"completed"}"#).unwrap();
        assert!(input.validate().is_ok());

        let input: UpdateTodo = serde_json::from_str(r#"{"title":""}"#).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn search_matches_title_or_description_ignoring_case() {
        let query = ListQuery {
            search: Some("MILK".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&todo("Buy milk", None)));
        assert!(query.matches(&todo("Groceries", Some("oat Milk, eggs"))));
        assert!(!query.matches(&todo("Groceries", Some("eggs"))));
    }

    #[test]
    fn empty_search_matches_everything() {
        let query = ListQuery {
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(query.matches(&todo("Anything", None)));
    }

    #[test]
    fn filters_combine_with_and() {
        let query = ListQuery {
            status: Some(TodoStatus::Pending),
            priority: Some(TodoPriority::High),
            ..Default::default()
        };
        let mut item = todo("Task", None);
        assert!(!query.matches(&item));
        item.priority = TodoPriority::High;
        assert!(query.matches(&item));
        item.status = TodoStatus::Completed;
        assert!(!query.matches(&item));
    }

    #[test]
    fn cleared_message_mentions_count() {
        let cleared = ClearedTodos::from(2);
        assert_eq!(cleared.deleted, 2);
        assert!(cleared.message.contains('2'));
    }
}

//! HTTP handlers. Each one validates its input, makes a single store call
//! and maps the result onto a status code.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::error::ApiError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::model::{
    ClearedTodos, CreateTodo, Health, ListQuery, Todo, TodoList, TodoStats, UpdateTodo,
};
use crate::AppState;

#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        version: state.config.app_version.clone(),
    })
}

#[tracing::instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Json<TodoList> {
    let todos = state.store.list(&query).await;
    Json(TodoList::from(todos))
}

#[tracing::instrument(skip(state, input))]
pub async fn create_todo(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    input.validate()?;
    let todo = state.store.create(input).await;
    tracing::info!(id = todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[tracing::instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Result<Json<Todo>, ApiError> {
    state
        .store
        .get(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

#[tracing::instrument(skip(state, input))]
pub async fn update_todo(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
    AppJson(input): AppJson<UpdateTodo>,
) -> Result<Json<Todo>, ApiError> {
    input.validate()?;
    state
        .store
        .update(id, input)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

#[tracing::instrument(skip(state))]
pub async fn complete_todo(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Result<Json<Todo>, ApiError> {
    state
        .store
        .mark_completed(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

#[tracing::instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AppPath(id): AppPath<u64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}

#[tracing::instrument(skip(state))]
pub async fn clear_completed(State(state): State<AppState>) -> Json<ClearedTodos> {
    let deleted = state.store.clear_completed().await;
    let remaining = state.store.len().await;
    tracing::info!(deleted, remaining, "cleared completed todos");
    Json(ClearedTodos::from(deleted))
}

#[tracing::instrument(skip(state))]
pub async fn stats(State(state): State<AppState>) -> Json<TodoStats> {
    Json(state.store.stats().await)
}

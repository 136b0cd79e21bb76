//! In-memory to-do REST service.
//!
//! The router is built around an explicitly constructed [`TodoStore`]
//! carried in [`AppState`]; the binary owns its lifecycle and tests build
//! their own.

pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod routes;
pub mod store;

use std::any::Any;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, patch},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

pub use config::Config;
pub use error::ApiError;
pub use model::{Todo, TodoPriority, TodoStats, TodoStatus};
pub use store::TodoStore;

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<TodoStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: TodoStore, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(TodoStore::new(), Config::default())
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/stats", get(routes::stats))
        .route("/todos", get(routes::list_todos).post(routes::create_todo))
        .route("/todos/stats", get(routes::stats))
        .route("/todos/completed", axum::routing::delete(routes::clear_completed))
        .route(
            "/todos/{id}",
            get(routes::get_todo)
                .put(routes::update_todo)
                .delete(routes::delete_todo),
        )
        .route("/todos/{id}/complete", patch(routes::complete_todo))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("handler panicked");
    ApiError::Internal(anyhow::anyhow!("{message}")).into_response()
}

/// Serves the API on `listener` until Ctrl-C.
pub async fn run(listener: TcpListener, config: Config) -> Result<(), std::io::Error> {
    let state = AppState::new(TodoStore::new(), config);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn panics_become_internal_errors() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: error::ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "internal_error");
    }

    #[tokio::test]
    async fn default_state_starts_empty() {
        let state = AppState::default();
        assert!(state.store.is_empty().await);
        assert_eq!(state.config.port, 8000);
    }
}

//! Local HTTP front-end
//!
//! Serves the single page and the JSON API it polls. All state lives in the shared
//! [`Session`]; handlers only translate between HTTP and session calls.

mod routes;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::session::Session;

pub use routes::ApiResponse;

/// Called by the exit endpoint
pub type ExitHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
    pub exit: ExitHook,
}

impl AppState {
    /// State whose exit endpoint ends the process at once, without cleanup
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            exit: Arc::new(|| std::process::exit(0)),
        }
    }

    pub fn with_exit_hook(session: Arc<Session>, exit: ExitHook) -> Self {
        Self { session, exit }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/api/health", get(routes::health))
        .route("/api/state", get(routes::get_state))
        .route("/api/form", put(routes::put_form))
        .route("/api/actions/:action", post(routes::run_action))
        .route("/api/log/clear", post(routes::clear_log))
        .route("/api/auth/login", post(routes::login))
        .route("/api/exit", post(routes::exit))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

#[cfg(test)]
#[path = "../web_tests.rs"]
mod tests;

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<services::user_service::UserService>,
}

impl AppState {
    /// Wires the SQLite repository and the user service over one pool.
    pub fn from_pool(pool: sqlx::SqlitePool) -> Self {
        let user_repository = Arc::new(repositories::SqliteUserRepository::new(pool));
        let user_service = Arc::new(services::UserService::new(user_repository));
        Self { user_service }
    }
}

pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/user/create", post(handlers::create_user_handler))
        .route("/user/delete", delete(handlers::delete_user_handler))
        .route("/user/getAll", get(handlers::list_users_handler))
        .route("/user/edit", put(handlers::update_user_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

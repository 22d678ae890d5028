pub mod handlers;
pub mod store;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/log", get(handlers::log_form).post(handlers::log_meal))
        .route("/meals", get(handlers::list_meals))
        .route("/clear", post(handlers::clear_meals))
        .route("/test-db", get(handlers::test_db))
}

use axum::{routing::get, Router};

pub mod habits;
pub mod system;

/// Router for the habit pages (principal middleware applied by the caller).
pub fn router() -> Router {
    Router::new()
        .route("/", get(habits::index))
        .route("/habit/:id", get(habits::permalink))
        .route("/newhabit", get(habits::new_habit_form).post(habits::create_habit))
}

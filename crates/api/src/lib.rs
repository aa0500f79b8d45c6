pub mod data;
pub mod output;
pub mod pipeline;
pub mod state;
pub mod routes {
    pub mod health;
    pub mod timetable;
}

use axum::{routing::get, Router};
use state::AppState;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(routes::health::health))
        .route("/api/timetable", get(routes::timetable::timetable))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

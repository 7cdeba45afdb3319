use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/year", get(handlers::get_year))
        .route("/api/timeline", post(handlers::timeline_event))
        .route("/api/map/hover", post(handlers::map_hover))
        .route("/api/map/click", post(handlers::map_click))
        .route("/api/map/resize", post(handlers::map_resize))
        .with_state(state)
}

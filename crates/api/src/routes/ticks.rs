use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ticks;
use crate::state::AppState;

/// Routes mounted at `/ticks`.
///
/// ```text
/// GET    /          -> list
/// POST   /reset     -> reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ticks::list))
        .route("/reset", post(ticks::reset))
}

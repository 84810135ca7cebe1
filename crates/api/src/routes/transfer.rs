use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::transfer;
use crate::state::AppState;

/// ```text
/// GET    /export    -> export
/// POST   /import    -> import (body capped at `max_import_bytes`)
/// DELETE /roster    -> clear
/// ```
pub fn router(max_import_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/export", get(transfer::export))
        .route(
            "/import",
            post(transfer::import).layer(DefaultBodyLimit::max(max_import_bytes)),
        )
        .route("/roster", delete(transfer::clear))
}

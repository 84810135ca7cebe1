use axum::routing::{get, put};
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes mounted at `/accounts`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// PUT    /order     -> reorder
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(account::list).post(account::create))
        .route("/order", put(account::reorder))
        .route(
            "/{id}",
            get(account::get_by_id)
                .put(account::update)
                .delete(account::delete),
        )
}

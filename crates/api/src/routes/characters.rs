use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{character, ticks};
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
/// PUT    /{id}/ticks/{code}      -> ticks::tick
/// DELETE /{id}/ticks/{code}      -> ticks::untick
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(character::list).post(character::create))
        .route(
            "/{id}",
            get(character::get_by_id)
                .put(character::update)
                .delete(character::delete),
        )
        .route("/{id}/ticks/{code}", put(ticks::tick).delete(ticks::untick))
}

use axum::routing::get;
use axum::Router;

use crate::handlers::catalogue;
use crate::state::AppState;

/// ```text
/// GET /instances      -> list_instances
/// GET /job-classes    -> list_job_classes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/instances", get(catalogue::list_instances))
        .route("/job-classes", get(catalogue::list_job_classes))
}

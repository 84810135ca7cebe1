//! Read-only reference data: instances and job classes.

use axum::Json;
use kafra_core::instance::{instance_catalogue, InstanceInfo};
use kafra_core::job_class::{JobClass, JOB_CLASSES};

use crate::response::DataResponse;

/// GET /api/v1/instances
pub async fn list_instances() -> Json<DataResponse<Vec<InstanceInfo>>> {
    Json(DataResponse {
        data: instance_catalogue(),
    })
}

/// GET /api/v1/job-classes
pub async fn list_job_classes() -> Json<DataResponse<&'static [JobClass]>> {
    Json(DataResponse { data: JOB_CLASSES })
}

//! Whole-roster export, import and clear.

use axum::extract::State;
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kafra_core::transfer::{plan_import, ImportPlan, ImportSummary, EXPORT_FILE_NAME};
use kafra_db::repositories::TransferRepo;
use kafra_db::DbPool;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/export
///
/// Served as a download in the established `{accounts, characters}` format.
pub async fn export(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let document = TransferRepo::export(&state.pool).await?;
    tracing::info!(
        accounts = document.accounts.len(),
        characters = document.characters.len(),
        "Roster exported",
    );
    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
    Ok(([(CONTENT_DISPOSITION, disposition)], Json(document)))
}

/// POST /api/v1/import
///
/// Accepts any of the supported payload shapes. Characters that cannot be
/// placed are skipped and listed in the summary.
pub async fn import(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    let plan = apply_import(&state.pool, &payload).await?;
    Ok(Json(DataResponse {
        data: plan.summary(),
    }))
}

/// DELETE /api/v1/roster
///
/// Removes every account and character and clears all instance ticks.
pub async fn clear(State(state): State<AppState>) -> AppResult<StatusCode> {
    let accounts = TransferRepo::delete_all(&state.pool).await?;
    state.ticks.write().await.reset();
    tracing::info!(accounts, "Roster cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// Reconcile `payload` against the store and write the result.
///
/// Both tables stay locked from the snapshot read until commit. Any error
/// drops the transaction, leaving the store untouched.
pub async fn apply_import(pool: &DbPool, payload: &serde_json::Value) -> AppResult<ImportPlan> {
    let mut tx = pool.begin().await?;
    let snapshot = TransferRepo::lock_snapshot(&mut tx).await?;
    let plan = plan_import(payload, &snapshot)?;
    TransferRepo::insert_plan(&mut tx, &plan).await?;
    tx.commit().await?;

    for skipped in &plan.skipped {
        tracing::warn!(
            index = skipped.index,
            name = skipped.name.as_deref().unwrap_or(""),
            reason = %skipped.reason,
            "Import skipped character",
        );
    }
    tracing::info!(
        shape = plan.shape.as_str(),
        accounts = plan.accounts.len(),
        characters = plan.characters.len(),
        skipped = plan.skipped.len(),
        "Roster imported",
    );
    Ok(plan)
}

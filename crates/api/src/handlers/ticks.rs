//! Instance completion ticks.
//!
//! Ticks live in [`AppState`] only. Hall of Life is shared by every
//! character of the same account.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kafra_core::error::CoreError;
use kafra_core::instance::InstanceCode;
use kafra_core::types::DbId;
use kafra_db::repositories::CharacterRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Completed instances of one character after a change.
#[derive(Debug, Serialize)]
pub struct CharacterTicks {
    pub character_id: DbId,
    pub ticks: Vec<InstanceCode>,
}

/// GET /api/v1/ticks
pub async fn list(
    State(state): State<AppState>,
) -> Json<DataResponse<BTreeMap<DbId, Vec<InstanceCode>>>> {
    let snapshot = state.ticks.read().await.snapshot();
    Json(DataResponse { data: snapshot })
}

/// PUT /api/v1/characters/{id}/ticks/{code}
pub async fn tick(
    State(state): State<AppState>,
    Path((id, code)): Path<(DbId, String)>,
) -> AppResult<Json<DataResponse<CharacterTicks>>> {
    set_tick(&state, id, &code, true).await
}

/// DELETE /api/v1/characters/{id}/ticks/{code}
pub async fn untick(
    State(state): State<AppState>,
    Path((id, code)): Path<(DbId, String)>,
) -> AppResult<Json<DataResponse<CharacterTicks>>> {
    set_tick(&state, id, &code, false).await
}

/// POST /api/v1/ticks/reset
pub async fn reset(State(state): State<AppState>) -> StatusCode {
    state.ticks.write().await.reset();
    tracing::info!("Instance ticks reset");
    StatusCode::NO_CONTENT
}

async fn set_tick(
    state: &AppState,
    id: DbId,
    code: &str,
    ticked: bool,
) -> AppResult<Json<DataResponse<CharacterTicks>>> {
    let code = InstanceCode::from_str(code).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown instance code '{code}'"
        )))
    })?;
    let character = CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;

    let targets = if code.is_account_wide() {
        CharacterRepo::ids_by_account(&state.pool, character.account_id).await?
    } else {
        vec![id]
    };

    let mut ticks = state.ticks.write().await;
    ticks.set_many(targets.iter().copied(), code, ticked);
    tracing::debug!(id, %code, ticked, affected = targets.len(), "Instance tick updated");

    Ok(Json(DataResponse {
        data: CharacterTicks {
            character_id: id,
            ticks: ticks.codes_for(id),
        },
    }))
}

//! Handlers for the `/accounts` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kafra_core::error::CoreError;
use kafra_core::roster::{validate_account_order, validate_name};
use kafra_core::types::DbId;
use kafra_db::models::account::{Account, AccountOrder, CreateAccount, UpdateAccount};
use kafra_db::repositories::{AccountRepo, CharacterRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Account",
        id,
    })
}

/// GET /api/v1/accounts
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Account>>> {
    let accounts = AccountRepo::list(&state.pool).await?;
    Ok(Json(accounts))
}

/// POST /api/v1/accounts
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateAccount>,
) -> AppResult<(StatusCode, Json<Account>)> {
    input.name = validate_name("Account", &input.name)?;
    let account = AccountRepo::create(&state.pool, &input).await?;
    tracing::info!(id = account.id, name = %account.name, "Account created");
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /api/v1/accounts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Account>> {
    let account = AccountRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(account))
}

/// PUT /api/v1/accounts/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateAccount>,
) -> AppResult<Json<Account>> {
    input.name = input
        .name
        .as_deref()
        .map(|name| validate_name("Account", name))
        .transpose()?;
    let account = AccountRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(account))
}

/// DELETE /api/v1/accounts/{id}
///
/// Characters go with the account, and so do their instance ticks.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let character_ids = CharacterRepo::ids_by_account(&state.pool, id).await?;
    if !AccountRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    let mut ticks = state.ticks.write().await;
    for character_id in &character_ids {
        ticks.forget(*character_id);
    }
    tracing::info!(id, characters = character_ids.len(), "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/accounts/order
///
/// Sets each account's `sort_order` to its position in `ids`.
pub async fn reorder(
    State(state): State<AppState>,
    Json(input): Json<AccountOrder>,
) -> AppResult<Json<Vec<Account>>> {
    validate_account_order(&input.ids)?;
    if let Some(missing) = AccountRepo::reorder(&state.pool, &input.ids).await? {
        return Err(not_found(missing));
    }
    let accounts = AccountRepo::list(&state.pool).await?;
    Ok(Json(accounts))
}

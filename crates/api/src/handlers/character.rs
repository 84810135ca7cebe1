//! Handlers for the `/characters` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kafra_core::error::CoreError;
use kafra_core::job_class::canonical_job_class;
use kafra_core::roster::{validate_level, validate_name};
use kafra_core::types::DbId;
use kafra_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use kafra_db::repositories::{AccountRepo, CharacterRepo};

use crate::error::{AppError, AppResult};
use crate::query::CharacterListParams;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Character",
        id,
    })
}

async fn ensure_account_exists(state: &AppState, account_id: DbId) -> AppResult<()> {
    AccountRepo::find_by_id(&state.pool, account_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Account",
            id: account_id,
        }))
}

/// GET /api/v1/characters?account_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CharacterListParams>,
) -> AppResult<Json<Vec<Character>>> {
    let characters = CharacterRepo::list(&state.pool, params.account_id).await?;
    Ok(Json(characters))
}

/// POST /api/v1/characters
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCharacter>,
) -> AppResult<(StatusCode, Json<Character>)> {
    let input = CreateCharacter {
        account_id: input.account_id,
        name: validate_name("Character", &input.name)?,
        class: canonical_job_class(&input.class)?.to_string(),
        lvl: input.lvl,
    };
    validate_level(input.lvl)?;
    ensure_account_exists(&state, input.account_id).await?;

    let character = CharacterRepo::create(&state.pool, &input).await?;
    tracing::info!(
        id = character.id,
        account_id = character.account_id,
        name = %character.name,
        "Character created",
    );
    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /api/v1/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Character>> {
    let character = CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(character))
}

/// PUT /api/v1/characters/{id}
///
/// Partial update; omitted fields are left unchanged.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCharacter>,
) -> AppResult<Json<Character>> {
    let input = UpdateCharacter {
        account_id: input.account_id,
        name: input
            .name
            .as_deref()
            .map(|name| validate_name("Character", name))
            .transpose()?,
        class: input
            .class
            .as_deref()
            .map(|class| canonical_job_class(class).map(str::to_string))
            .transpose()?,
        lvl: input.lvl,
    };
    if let Some(lvl) = input.lvl {
        validate_level(lvl)?;
    }
    if let Some(account_id) = input.account_id {
        ensure_account_exists(&state, account_id).await?;
    }

    let character = CharacterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(character))
}

/// DELETE /api/v1/characters/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if !CharacterRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    state.ticks.write().await.forget(id);
    tracing::info!(id, "Character deleted");
    Ok(StatusCode::NO_CONTENT)
}

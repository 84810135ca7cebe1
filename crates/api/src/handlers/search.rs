//! Roster search.

use axum::extract::{Query, State};
use axum::Json;
use kafra_core::query::{search_roster, Query as RosterQuery};
use kafra_db::models::account::Account;
use kafra_db::models::character::Character;
use kafra_db::repositories::{AccountRepo, CharacterRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::query::SearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// One visible account and its matching characters.
#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub account: Account,
    /// The account was kept because its own name matched.
    pub account_name_matched: bool,
    pub characters: Vec<Character>,
}

/// GET /api/v1/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<SearchHit>>>> {
    let query = RosterQuery::parse(&params.q);
    let accounts = AccountRepo::list(&state.pool).await?;
    let characters = CharacterRepo::list(&state.pool, None).await?;
    let ticks = state.ticks.read().await;

    let hits = search_roster(&query, &accounts, &characters, &ticks)
        .into_iter()
        .map(|hit| SearchHit {
            account: hit.account.clone(),
            account_name_matched: hit.account_name_matched,
            characters: hit.characters.into_iter().cloned().collect(),
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        q = %params.q,
        conditions = query.conditions().len(),
        hits = hits.len(),
        "Roster searched",
    );
    Ok(Json(DataResponse { data: hits }))
}

//! Query-string parameter types shared by handlers.

use kafra_core::types::DbId;
use serde::Deserialize;

/// `?account_id=` filter for character listings.
#[derive(Debug, Default, Deserialize)]
pub struct CharacterListParams {
    pub account_id: Option<DbId>,
}

/// `?q=` for roster search. A missing query behaves like an empty one.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

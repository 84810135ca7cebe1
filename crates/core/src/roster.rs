//! Roster records and field validation shared by CRUD and import.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Lowest base level a character can have.
pub const MIN_LEVEL: i32 = 1;

/// Highest base level a character can have.
pub const MAX_LEVEL: i32 = 999;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// An account as it appears in export documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub id: DbId,
    pub name: String,
    pub sort_order: i32,
}

/// A character as it appears in export documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub id: DbId,
    pub account_id: DbId,
    pub name: String,
    pub class: String,
    pub lvl: i32,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a display name and return it trimmed.
///
/// `entity` is used in the error message ("Account", "Character").
pub fn validate_name(entity: &str, name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!(
            "{entity} name cannot be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate that a base level is within `MIN_LEVEL..=MAX_LEVEL`.
pub fn validate_level(lvl: i32) -> Result<(), CoreError> {
    if (MIN_LEVEL..=MAX_LEVEL).contains(&lvl) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Level must be between {MIN_LEVEL} and {MAX_LEVEL}, got {lvl}"
        )))
    }
}

/// Validate a requested account ordering: non-empty and free of duplicates.
pub fn validate_account_order(ids: &[DbId]) -> Result<(), CoreError> {
    if ids.is_empty() {
        return Err(CoreError::Validation(
            "Account order cannot be empty".to_string(),
        ));
    }
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "Account {id} appears more than once in the requested order"
            )));
        }
    }
    Ok(())
}

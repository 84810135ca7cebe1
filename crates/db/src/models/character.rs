//! Character entity model and DTOs.

use kafra_core::query::SearchableCharacter;
use kafra_core::roster::CharacterRecord;
use kafra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub account_id: DbId,
    pub name: String,
    /// Canonical job-class spelling.
    pub class: String,
    pub lvl: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a character.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCharacter {
    pub account_id: DbId,
    pub name: String,
    pub class: String,
    pub lvl: i32,
}

/// DTO for updating a character. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCharacter {
    pub account_id: Option<DbId>,
    pub name: Option<String>,
    pub class: Option<String>,
    pub lvl: Option<i32>,
}

impl From<Character> for CharacterRecord {
    fn from(character: Character) -> Self {
        Self {
            id: character.id,
            account_id: character.account_id,
            name: character.name,
            class: character.class,
            lvl: character.lvl,
        }
    }
}

impl SearchableCharacter for Character {
    fn character_id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> DbId {
        self.account_id
    }

    fn character_name(&self) -> &str {
        &self.name
    }

    fn job_class(&self) -> &str {
        &self.class
    }

    fn level(&self) -> i32 {
        self.lvl
    }
}

//! Account entity model and DTOs.

use kafra_core::query::SearchableAccount;
use kafra_core::roster::AccountRecord;
use kafra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `accounts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: DbId,
    pub name: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccount {
    pub name: String,
    /// Appended after the last account if omitted.
    pub sort_order: Option<i32>,
}

/// DTO for updating an account. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccount {
    pub name: Option<String>,
    pub sort_order: Option<i32>,
}

/// Body of a reorder request: account IDs in their new display order.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountOrder {
    pub ids: Vec<DbId>,
}

impl From<Account> for AccountRecord {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            sort_order: account.sort_order,
        }
    }
}

impl SearchableAccount for Account {
    fn account_id(&self) -> DbId {
        self.id
    }

    fn account_name(&self) -> &str {
        &self.name
    }
}

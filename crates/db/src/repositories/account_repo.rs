//! Repository for the `accounts` table.

use kafra_core::types::DbId;
use sqlx::PgPool;

use crate::models::account::{Account, CreateAccount, UpdateAccount};

const COLUMNS: &str = "id, name, sort_order, created_at, updated_at";

/// CRUD and ordering for accounts.
pub struct AccountRepo;

impl AccountRepo {
    /// Insert a new account, returning the created row.
    ///
    /// If `sort_order` is `None`, the account is placed after the current last one.
    pub async fn create(pool: &PgPool, input: &CreateAccount) -> Result<Account, sqlx::Error> {
        let query = format!(
            "INSERT INTO accounts (name, sort_order)
             VALUES ($1, COALESCE($2, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM accounts)))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(&input.name)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every account in display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts ORDER BY sort_order, id");
        sqlx::query_as::<_, Account>(&query).fetch_all(pool).await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts")
            .fetch_one(pool)
            .await
    }

    /// Update an account. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAccount,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "UPDATE accounts SET
                name = COALESCE($2, name),
                sort_order = COALESCE($3, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete an account and, by cascade, its characters.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assign `sort_order` from each ID's position in `ids`.
    ///
    /// Returns the first ID that does not exist, in which case nothing is
    /// changed. Accounts missing from `ids` keep their current position.
    pub async fn reorder(pool: &PgPool, ids: &[DbId]) -> Result<Option<DbId>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM accounts WHERE id = ANY($1) FOR UPDATE")
                .bind(ids)
                .fetch_all(&mut *tx)
                .await?;
        if let Some(missing) = ids.iter().find(|id| !existing.contains(*id)) {
            return Ok(Some(*missing));
        }

        sqlx::query(
            "UPDATE accounts AS a SET sort_order = (o.pos - 1)::int
             FROM UNNEST($1::bigint[]) WITH ORDINALITY AS o(id, pos)
             WHERE a.id = o.id",
        )
        .bind(ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(None)
    }
}

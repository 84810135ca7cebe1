//! Whole-roster operations: export, import and clear.
//!
//! Import runs inside a caller-owned transaction so the pure reconciler in
//! `kafra_core::transfer` can sit between the snapshot read and the inserts
//! while both tables stay locked.

use std::collections::HashSet;

use kafra_core::roster::{AccountRecord, CharacterRecord};
use kafra_core::transfer::{ImportPlan, RosterExport, RosterSnapshot};
use kafra_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

const ACCOUNTS_SEQUENCE: &str = "accounts_id_seq";
const CHARACTERS_SEQUENCE: &str = "characters_id_seq";

/// Export, import and bulk-delete helpers.
pub struct TransferRepo;

impl TransferRepo {
    /// Read every account and character from one consistent snapshot.
    pub async fn export(pool: &PgPool) -> Result<RosterExport, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let accounts: Vec<(DbId, String, i32)> =
            sqlx::query_as("SELECT id, name, sort_order FROM accounts ORDER BY sort_order, id")
                .fetch_all(&mut *tx)
                .await?;
        let characters: Vec<(DbId, DbId, String, String, i32)> = sqlx::query_as(
            "SELECT id, account_id, name, class, lvl FROM characters ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(RosterExport {
            accounts: accounts
                .into_iter()
                .map(|(id, name, sort_order)| AccountRecord { id, name, sort_order })
                .collect(),
            characters: characters
                .into_iter()
                .map(|(id, account_id, name, class, lvl)| CharacterRecord {
                    id,
                    account_id,
                    name,
                    class,
                    lvl,
                })
                .collect(),
        })
    }

    /// Lock both tables against concurrent writers and read what the
    /// reconciler needs to allocate IDs.
    ///
    /// High-water marks include the sequence position, so IDs of deleted rows
    /// are never reused.
    pub async fn lock_snapshot(
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<RosterSnapshot, sqlx::Error> {
        sqlx::query("LOCK TABLE accounts, characters IN EXCLUSIVE MODE")
            .execute(&mut **tx)
            .await?;

        let account_ids: Vec<DbId> = sqlx::query_scalar("SELECT id FROM accounts")
            .fetch_all(&mut **tx)
            .await?;
        let max_character_id: Option<DbId> = sqlx::query_scalar("SELECT MAX(id) FROM characters")
            .fetch_one(&mut **tx)
            .await?;

        let account_sequence = Self::sequence_position(tx, ACCOUNTS_SEQUENCE).await?;
        let character_sequence = Self::sequence_position(tx, CHARACTERS_SEQUENCE).await?;

        let max_account_id = account_ids.iter().copied().max().unwrap_or(0);
        let snapshot = RosterSnapshot {
            account_high_water: max_account_id.max(account_sequence),
            character_high_water: max_character_id.unwrap_or(0).max(character_sequence),
            account_ids: account_ids.into_iter().collect::<HashSet<_>>(),
        };
        tracing::debug!(
            account_high_water = snapshot.account_high_water,
            character_high_water = snapshot.character_high_water,
            "Roster locked for import",
        );
        Ok(snapshot)
    }

    /// Insert every planned record with its allocated ID and move the
    /// sequences past them.
    pub async fn insert_plan(
        tx: &mut Transaction<'_, Postgres>,
        plan: &ImportPlan,
    ) -> Result<(), sqlx::Error> {
        if !plan.accounts.is_empty() {
            let ids: Vec<DbId> = plan.accounts.iter().map(|a| a.id).collect();
            let names: Vec<&str> = plan.accounts.iter().map(|a| a.name.as_str()).collect();
            let orders: Vec<i32> = plan.accounts.iter().map(|a| a.sort_order).collect();
            sqlx::query(
                "INSERT INTO accounts (id, name, sort_order)
                 SELECT * FROM UNNEST($1::bigint[], $2::text[], $3::int[])",
            )
            .bind(&ids)
            .bind(&names)
            .bind(&orders)
            .execute(&mut **tx)
            .await?;
        }

        if !plan.characters.is_empty() {
            let ids: Vec<DbId> = plan.characters.iter().map(|c| c.id).collect();
            let account_ids: Vec<DbId> = plan.characters.iter().map(|c| c.account_id).collect();
            let names: Vec<&str> = plan.characters.iter().map(|c| c.name.as_str()).collect();
            let classes: Vec<&str> = plan.characters.iter().map(|c| c.class.as_str()).collect();
            let levels: Vec<i32> = plan.characters.iter().map(|c| c.lvl).collect();
            sqlx::query(
                "INSERT INTO characters (id, account_id, name, class, lvl)
                 SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::text[], $4::text[], $5::int[])",
            )
            .bind(&ids)
            .bind(&account_ids)
            .bind(&names)
            .bind(&classes)
            .bind(&levels)
            .execute(&mut **tx)
            .await?;
        }

        if let Some(max) = plan.max_account_id() {
            Self::advance_sequence(tx, ACCOUNTS_SEQUENCE, max).await?;
        }
        if let Some(max) = plan.max_character_id() {
            Self::advance_sequence(tx, CHARACTERS_SEQUENCE, max).await?;
        }
        Ok(())
    }

    /// Delete every account and character. Returns the number of accounts removed.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM characters")
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM accounts")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Last value handed out by `sequence`, or 0 if it has never been used.
    async fn sequence_position(
        tx: &mut Transaction<'_, Postgres>,
        sequence: &str,
    ) -> Result<DbId, sqlx::Error> {
        let (last_value, is_called): (DbId, bool) =
            sqlx::query_as(&format!("SELECT last_value, is_called FROM {sequence}"))
                .fetch_one(&mut **tx)
                .await?;
        Ok(if is_called { last_value } else { last_value - 1 })
    }

    async fn advance_sequence(
        tx: &mut Transaction<'_, Postgres>,
        sequence: &str,
        value: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT setval($1::text::regclass, $2)")
            .bind(sequence)
            .bind(value)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

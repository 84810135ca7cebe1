//! Integration tests for whole-roster export, import and clear.

use kafra_core::transfer::{plan_import, sample_roster};
use kafra_db::models::account::CreateAccount;
use kafra_db::models::character::CreateCharacter;
use kafra_db::repositories::{AccountRepo, CharacterRepo, TransferRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn import(pool: &PgPool, payload: &serde_json::Value) -> kafra_core::transfer::ImportPlan {
    let mut tx = pool.begin().await.unwrap();
    let snapshot = TransferRepo::lock_snapshot(&mut tx).await.unwrap();
    let plan = plan_import(payload, &snapshot).unwrap();
    TransferRepo::insert_plan(&mut tx, &plan).await.unwrap();
    tx.commit().await.unwrap();
    plan
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_import_allocates_above_existing_ids(pool: PgPool) {
    let existing = AccountRepo::create(
        &pool,
        &CreateAccount {
            name: "Existing".to_string(),
            sort_order: None,
        },
    )
    .await
    .unwrap();

    let plan = import(
        &pool,
        &json!({
            "accounts": [{ "id": existing.id, "name": "Imported" }],
            "characters": [{ "accountId": existing.id, "name": "X", "class": "Novice", "lvl": 10 }]
        }),
    )
    .await;

    let imported = &plan.accounts[0];
    assert!(imported.id > existing.id);
    assert_eq!(plan.characters[0].account_id, imported.id);

    let stored = CharacterRepo::list(&pool, Some(imported.id)).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(CharacterRepo::list(&pool, Some(existing.id)).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sequences_advance_past_imported_ids(pool: PgPool) {
    let plan = import(&pool, &sample_roster()).await;
    let max_account = plan.max_account_id().unwrap();
    let max_character = plan.max_character_id().unwrap();

    let account = AccountRepo::create(
        &pool,
        &CreateAccount {
            name: "After".to_string(),
            sort_order: None,
        },
    )
    .await
    .unwrap();
    assert!(account.id > max_account);

    let character = CharacterRepo::create(
        &pool,
        &CreateCharacter {
            account_id: account.id,
            name: "Next".to_string(),
            class: "Novice".to_string(),
            lvl: 1,
        },
    )
    .await
    .unwrap();
    assert!(character.id > max_character);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_ids_are_not_reused(pool: PgPool) {
    let first = AccountRepo::create(
        &pool,
        &CreateAccount {
            name: "Temp".to_string(),
            sort_order: None,
        },
    )
    .await
    .unwrap();
    AccountRepo::delete(&pool, first.id).await.unwrap();

    let plan = import(&pool, &json!([{ "name": "Fresh" }])).await;
    assert!(plan.accounts[0].id > first.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_export_round_trip(pool: PgPool) {
    import(&pool, &sample_roster()).await;
    let exported = TransferRepo::export(&pool).await.unwrap();
    assert_eq!(exported.accounts.len(), 3);
    assert_eq!(exported.characters.len(), 2);

    TransferRepo::delete_all(&pool).await.unwrap();
    let payload = serde_json::to_value(&exported).unwrap();
    import(&pool, &payload).await;

    let again = TransferRepo::export(&pool).await.unwrap();
    let mut before: Vec<_> = exported
        .characters
        .iter()
        .map(|c| (c.name.clone(), c.class.clone(), c.lvl))
        .collect();
    let mut after: Vec<_> = again
        .characters
        .iter()
        .map(|c| (c.name.clone(), c.class.clone(), c.lvl))
        .collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_all_clears_both_tables(pool: PgPool) {
    import(&pool, &sample_roster()).await;
    let removed = TransferRepo::delete_all(&pool).await.unwrap();
    assert_eq!(removed, 3);
    assert_eq!(AccountRepo::count(&pool).await.unwrap(), 0);
    assert!(CharacterRepo::list(&pool, None).await.unwrap().is_empty());
}

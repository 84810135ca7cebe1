//! Integration tests for account and character persistence.
//!
//! - Create / update / delete round-trips
//! - Display order and reordering
//! - Cascade delete from account to characters

use kafra_db::models::account::{CreateAccount, UpdateAccount};
use kafra_db::models::character::{CreateCharacter, UpdateCharacter};
use kafra_db::repositories::{AccountRepo, CharacterRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_account(name: &str) -> CreateAccount {
    CreateAccount {
        name: name.to_string(),
        sort_order: None,
    }
}

fn new_character(account_id: i64, name: &str, class: &str, lvl: i32) -> CreateCharacter {
    CreateCharacter {
        account_id,
        name: name.to_string(),
        class: class.to_string(),
        lvl,
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_account_appends_sort_order(pool: PgPool) {
    let a = AccountRepo::create(&pool, &new_account("Kolanthes")).await.unwrap();
    let b = AccountRepo::create(&pool, &new_account("Kuma")).await.unwrap();
    let c = AccountRepo::create(&pool, &new_account("akeruh")).await.unwrap();

    assert_eq!(a.sort_order, 0);
    assert_eq!(b.sort_order, 1);
    assert_eq!(c.sort_order, 2);

    let names: Vec<String> = AccountRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, vec!["Kolanthes", "Kuma", "akeruh"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_account_partial(pool: PgPool) {
    let account = AccountRepo::create(&pool, &new_account("Old")).await.unwrap();

    let updated = AccountRepo::update(
        &pool,
        account.id,
        &UpdateAccount {
            name: Some("New".to_string()),
            sort_order: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "New");
    assert_eq!(updated.sort_order, account.sort_order);
    assert!(AccountRepo::update(&pool, 9999, &UpdateAccount::default())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_accounts(pool: PgPool) {
    let a = AccountRepo::create(&pool, &new_account("A")).await.unwrap();
    let b = AccountRepo::create(&pool, &new_account("B")).await.unwrap();
    let c = AccountRepo::create(&pool, &new_account("C")).await.unwrap();

    let missing = AccountRepo::reorder(&pool, &[c.id, a.id, b.id]).await.unwrap();
    assert!(missing.is_none());

    let ids: Vec<i64> = AccountRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec![c.id, a.id, b.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_with_unknown_id_changes_nothing(pool: PgPool) {
    let a = AccountRepo::create(&pool, &new_account("A")).await.unwrap();
    let b = AccountRepo::create(&pool, &new_account("B")).await.unwrap();

    let missing = AccountRepo::reorder(&pool, &[b.id, 424242, a.id]).await.unwrap();
    assert_eq!(missing, Some(424242));

    let ids: Vec<i64> = AccountRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec![a.id, b.id]);
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_character_crud(pool: PgPool) {
    let account = AccountRepo::create(&pool, &new_account("Kolanthes")).await.unwrap();
    let character = CharacterRepo::create(&pool, &new_character(account.id, "SalmonHaki", "Biolo", 250))
        .await
        .unwrap();

    let found = CharacterRepo::find_by_id(&pool, character.id).await.unwrap().unwrap();
    assert_eq!(found.name, "SalmonHaki");
    assert_eq!(found.lvl, 250);

    let updated = CharacterRepo::update(
        &pool,
        character.id,
        &UpdateCharacter {
            lvl: Some(251),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.lvl, 251);
    assert_eq!(updated.class, "Biolo");

    assert!(CharacterRepo::delete(&pool, character.id).await.unwrap());
    assert!(!CharacterRepo::delete(&pool, character.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_characters_by_account(pool: PgPool) {
    let a = AccountRepo::create(&pool, &new_account("A")).await.unwrap();
    let b = AccountRepo::create(&pool, &new_account("B")).await.unwrap();
    CharacterRepo::create(&pool, &new_character(a.id, "one", "Novice", 1)).await.unwrap();
    CharacterRepo::create(&pool, &new_character(b.id, "two", "Novice", 2)).await.unwrap();
    CharacterRepo::create(&pool, &new_character(a.id, "three", "Novice", 3)).await.unwrap();

    assert_eq!(CharacterRepo::list(&pool, None).await.unwrap().len(), 3);

    let of_a = CharacterRepo::list(&pool, Some(a.id)).await.unwrap();
    let names: Vec<&str> = of_a.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["one", "three"]);

    let ids = CharacterRepo::ids_by_account(&pool, b.id).await.unwrap();
    assert_eq!(ids.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_account_delete_cascades(pool: PgPool) {
    let account = AccountRepo::create(&pool, &new_account("Gone")).await.unwrap();
    let character = CharacterRepo::create(&pool, &new_character(account.id, "X", "Thief", 50))
        .await
        .unwrap();

    assert!(AccountRepo::delete(&pool, account.id).await.unwrap());
    assert!(CharacterRepo::find_by_id(&pool, character.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_character_requires_existing_account(pool: PgPool) {
    let result = CharacterRepo::create(&pool, &new_character(777, "Orphan", "Novice", 1)).await;
    let err = result.unwrap_err();
    let db_err = err.as_database_error().expect("expected a database error");
    assert_eq!(db_err.code().as_deref(), Some("23503"));
}

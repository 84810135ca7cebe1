//! HTTP-level tests for account and character CRUD.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_account, create_character, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_account_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/accounts", json!({ "name": "  Kolanthes " })).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Kolanthes");
    assert_eq!(json["sort_order"], 0);
    assert!(json["id"].is_number());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_account_name_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/accounts", json!({ "name": "   " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete_account(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_account(app.clone(), "Old").await;

    let response = put_json(app.clone(), &format!("/api/v1/accounts/{id}"), json!({ "name": "New" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "New");

    let response = delete(app.clone(), &format!("/api/v1/accounts/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/accounts/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_account_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = put_json(app.clone(), "/api/v1/accounts/999999", json!({ "name": "X" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(app, "/api/v1/accounts/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_accounts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let a = create_account(app.clone(), "A").await;
    let b = create_account(app.clone(), "B").await;
    let c = create_account(app.clone(), "C").await;

    let response = put_json(app.clone(), "/api/v1/accounts/order", json!({ "ids": [b, c, a] })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(app.clone(), "/api/v1/accounts").await).await;
    let ids: Vec<i64> = json.as_array().unwrap().iter().map(|a| a["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![b, c, a]);

    let response = put_json(app.clone(), "/api/v1/accounts/order", json!({ "ids": [a, a] })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(app, "/api/v1/accounts/order", json!({ "ids": [a, 999999] })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_character_canonicalises_class(pool: PgPool) {
    let app = common::build_test_app(pool);
    let account = create_account(app.clone(), "Kolanthes").await;

    let response = post_json(
        app,
        "/api/v1/characters",
        json!({ "account_id": account, "name": "SalmonHaki", "class": "biolo", "lvl": 250 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["class"], "Biolo");
    assert_eq!(json["account_id"], account);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_character_validation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let account = create_account(app.clone(), "A").await;

    for body in [
        json!({ "account_id": account, "name": "X", "class": "Gunslinger", "lvl": 10 }),
        json!({ "account_id": account, "name": "X", "class": "Novice", "lvl": 0 }),
        json!({ "account_id": account, "name": "X", "class": "Novice", "lvl": 1000 }),
        json!({ "account_id": account, "name": "", "class": "Novice", "lvl": 10 }),
    ] {
        let response = post_json(app.clone(), "/api/v1/characters", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = post_json(
        app,
        "/api/v1/characters",
        json!({ "account_id": 999999, "name": "X", "class": "Novice", "lvl": 10 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_character_update(pool: PgPool) {
    let app = common::build_test_app(pool);
    let a = create_account(app.clone(), "A").await;
    let b = create_account(app.clone(), "B").await;
    let id = create_character(app.clone(), a, "Mover", "Thief", 50).await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/characters/{id}"),
        json!({ "lvl": 99, "account_id": b }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["lvl"], 99);
    assert_eq!(json["account_id"], b);
    assert_eq!(json["class"], "Thief");

    let response = put_json(
        app,
        &format!("/api/v1/characters/{id}"),
        json!({ "account_id": 999999 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_characters_filtered(pool: PgPool) {
    let app = common::build_test_app(pool);
    let a = create_account(app.clone(), "A").await;
    let b = create_account(app.clone(), "B").await;
    create_character(app.clone(), a, "one", "Novice", 1).await;
    create_character(app.clone(), b, "two", "Novice", 1).await;

    let all = body_json(get(app.clone(), "/api/v1/characters").await).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let of_b = body_json(get(app, &format!("/api/v1/characters?account_id={b}")).await).await;
    assert_eq!(of_b.as_array().unwrap().len(), 1);
    assert_eq!(of_b[0]["name"], "two");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_account_cascades_to_characters(pool: PgPool) {
    let app = common::build_test_app(pool);
    let account = create_account(app.clone(), "Gone").await;
    let character = create_character(app.clone(), account, "X", "Novice", 1).await;

    delete(app.clone(), &format!("/api/v1/accounts/{account}")).await;
    let response = get(app, &format!("/api/v1/characters/{character}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

//! HTTP-level integration tests for registration, login and token refresh.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, register};
use notes_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registration returns 201 with the user summary and a token pair.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_success(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let json = register(app, "alice", "a@x.com", "pw123").await;

    assert!(json["id"].is_number());
    assert_eq!(json["username"], "alice");
    assert_eq!(json["email"], "a@x.com");
    assert!(json["tokens"]["access"].is_string());
    assert!(json["tokens"]["refresh"].is_string());
    assert!(json.get("password").is_none());
    assert!(json.get("password_hash").is_none());

    let user = UserRepo::find_by_username(&pool, "alice")
        .await
        .unwrap()
        .expect("user should be persisted");
    assert_ne!(user.password_hash, "pw123", "password must be stored hashed");

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 1, "registration persists exactly one user");
}

/// Missing or empty fields are a 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_requires_all_fields(pool: PgPool) {
    let app = common::build_test_app(pool);

    for body in [
        json!({ "email": "a@x.com", "password": "pw123" }),
        json!({ "username": "alice", "password": "pw123" }),
        json!({ "username": "alice", "email": "a@x.com", "password": "" }),
    ] {
        let response = post_json(app.clone(), "/register/", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["detail"], "username, email and password required");
    }
}

/// A taken username is rejected whatever the email and password are.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_username(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "alice", "a@x.com", "pw123").await;

    let body = json!({ "username": "alice", "email": "other@x.com", "password": "different" });
    let response = post_json(app, "/register/", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["detail"], "username already taken");
}

/// A taken email is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "alice", "a@x.com", "pw123").await;

    let body = json!({ "username": "bob", "email": "a@x.com", "password": "pw123" });
    let response = post_json(app, "/register/", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["detail"], "email already registered");
}

/// A body that is not JSON is a 400 in the standard error shape.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_malformed_body(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/register/", json!("not an object")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["detail"].is_string());
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Login by username and by email both resolve to the same user.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_with_username_or_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    let registered = register(app.clone(), "alice", "a@x.com", "pw123").await;

    let by_username = post_json(
        app.clone(),
        "/login/",
        json!({ "username": "alice", "password": "pw123" }),
    )
    .await;
    assert_eq!(by_username.status(), StatusCode::OK);
    let by_username = body_json(by_username).await;
    assert_eq!(by_username["id"], registered["id"]);
    assert!(by_username["tokens"]["access"].is_string());
    assert!(by_username["tokens"]["refresh"].is_string());

    let by_email_field = post_json(
        app.clone(),
        "/login/",
        json!({ "email": "a@x.com", "password": "pw123" }),
    )
    .await;
    assert_eq!(by_email_field.status(), StatusCode::OK);
    assert_eq!(body_json(by_email_field).await["id"], registered["id"]);

    // An email passed in the username field also resolves.
    let email_as_username = post_json(
        app,
        "/login/",
        json!({ "username": "a@x.com", "password": "pw123" }),
    )
    .await;
    assert_eq!(email_as_username.status(), StatusCode::OK);
    assert_eq!(body_json(email_as_username).await["id"], registered["id"]);
}

/// Wrong passwords and unknown users produce the same 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_failures_are_uniform(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "alice", "a@x.com", "pw123").await;

    let mut bodies = Vec::new();
    for body in [
        json!({ "username": "alice", "password": "wrong" }),
        json!({ "username": "a@x.com", "password": "wrong" }),
        json!({ "email": "a@x.com", "password": "wrong" }),
        json!({ "username": "ghost", "password": "pw123" }),
    ] {
        let response = post_json(app.clone(), "/login/", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(body_json(response).await);
    }

    assert!(bodies.iter().all(|b| *b == bodies[0]));
    assert_eq!(bodies[0]["detail"], "Invalid credentials");
}

/// Logging in, successfully or not, writes nothing.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_leaves_database_unchanged(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    register(app.clone(), "alice", "a@x.com", "pw123").await;
    let before = database_snapshot(&pool).await;

    for body in [
        json!({ "username": "alice", "password": "pw123" }),
        json!({ "email": "a@x.com", "password": "pw123" }),
        json!({ "username": "alice", "password": "wrong" }),
        json!({ "username": "ghost", "password": "pw123" }),
        json!({ "username": "alice", "password": "pw123" }),
    ] {
        post_json(app.clone(), "/login/", body).await;
    }

    assert_eq!(database_snapshot(&pool).await, before);
}

/// Every table in the schema with its row count, plus the users' rows.
async fn database_snapshot(pool: &PgPool) -> (Vec<(String, i64)>, Vec<String>) {
    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT table_name::text FROM information_schema.tables
         WHERE table_schema = current_schema() AND table_type = 'BASE TABLE'
           AND table_name <> '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(pool)
    .await
    .unwrap();

    let mut counts = Vec::new();
    for table in tables {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap();
        counts.push((table, count));
    }

    let users: Vec<String> = sqlx::query_scalar(
        "SELECT row_to_json(u)::text FROM users u ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .unwrap();

    (counts, users)
}

/// Missing identifier or password is a 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_requires_identifier_and_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app.clone(), "/login/", json!({ "password": "pw123" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(app, "/login/", json!({ "username": "alice" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// The access token from login authenticates note requests.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_token_authenticates(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "alice", "a@x.com", "pw123").await;

    let login = post_json(
        app.clone(),
        "/login/",
        json!({ "username": "alice", "password": "pw123" }),
    )
    .await;
    let json = body_json(login).await;
    let access = json["tokens"]["access"].as_str().unwrap();

    let response = get_auth(app, "/notes/", access).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

/// A refresh token yields a new pair for the same user.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_issues_new_pair(pool: PgPool) {
    let app = common::build_test_app(pool);
    let registered = register(app.clone(), "alice", "a@x.com", "pw123").await;
    let refresh = registered["tokens"]["refresh"].as_str().unwrap().to_string();

    let response = post_json(app.clone(), "/token/refresh/", json!({ "refresh": refresh })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], registered["id"]);
    assert_eq!(json["username"], "alice");
    assert_ne!(json["tokens"]["refresh"].as_str().unwrap(), refresh);

    let access = json["tokens"]["access"].as_str().unwrap();
    let notes = get_auth(app, "/notes/", access).await;
    assert_eq!(notes.status(), StatusCode::OK);
}

/// The two halves of a pair cannot stand in for each other.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_token_types_are_not_interchangeable(pool: PgPool) {
    let app = common::build_test_app(pool);
    let registered = register(app.clone(), "alice", "a@x.com", "pw123").await;
    let access = registered["tokens"]["access"].as_str().unwrap();
    let refresh = registered["tokens"]["refresh"].as_str().unwrap();

    let response = post_json(app.clone(), "/token/refresh/", json!({ "refresh": access })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/notes/", refresh).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Unknown refresh tokens are a 401; a missing one is a 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_with_invalid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/token/refresh/",
        json!({ "refresh": "not-a-real-token" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(app, "/token/refresh/", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

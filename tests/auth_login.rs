//! Login endpoint tests: unified failure message, disabled accounts, and
//! a token round trip against a protected route.

use axum::body::{Body, to_bytes};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use comptoir::db::models::{User, UserCreate, UserRole, UserUpdate};
use comptoir::db::repository::user;
use comptoir::{Config, ServerState, api};

async fn spawn_state() -> (TempDir, ServerState) {
    let dir = TempDir::new().expect("temp dir");
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await;
    (dir, state)
}

async fn post_login(state: &ServerState, email: &str, password: &str) -> (StatusCode, Value) {
    let app = api::build_app(state).with_state(state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": email, "password": password}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn seed_user(state: &ServerState, email: &str, password: &str) -> User {
    user::create(
        &state.pool,
        UserCreate {
            email: email.into(),
            password: password.into(),
            firstname: "Luc".into(),
            lastname: "Bernard".into(),
            role: Some(UserRole::Gestion),
        },
        User::hash_password(password).unwrap(),
    )
    .await
    .expect("seed user")
}

#[tokio::test]
async fn login_returns_usable_token() {
    let (_dir, state) = spawn_state().await;
    seed_user(&state, "luc@exemple.fr", "mot de passe tres sur").await;

    let (status, body) = post_login(&state, "Luc@Exemple.fr", "mot de passe tres sur").await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    assert_eq!(body["user"]["email"], "luc@exemple.fr");
    assert!(body["user"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap();
    let app = api::build_app(&state).with_state(state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let (_dir, state) = spawn_state().await;
    seed_user(&state, "luc@exemple.fr", "mot de passe tres sur").await;

    let (status, wrong_password) = post_login(&state, "luc@exemple.fr", "faux").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, unknown_user) = post_login(&state, "inconnu@exemple.fr", "faux").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Same code and message whether the account exists or not
    assert_eq!(wrong_password["code"], unknown_user["code"]);
    assert_eq!(wrong_password["message"], unknown_user["message"]);
}

#[tokio::test]
async fn disabled_accounts_cannot_login() {
    let (_dir, state) = spawn_state().await;
    let account = seed_user(&state, "luc@exemple.fr", "mot de passe tres sur").await;

    user::update(
        &state.pool,
        account.id,
        UserUpdate {
            is_active: Some(false),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();

    let (status, _) = post_login(&state, "luc@exemple.fr", "mot de passe tres sur").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

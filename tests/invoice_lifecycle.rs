//! End-to-end lifecycle test over the full HTTP stack.
//!
//! Drives the router the way a client would: create a draft invoice, move
//! it through its statuses, and check the numbering and totals behaviour
//! at every step.

use axum::body::Body;
use axum::{Router, body::to_bytes};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use comptoir::db::models::{UserCreate, UserRole};
use comptoir::db::repository::user;
use comptoir::{Config, ServerState, api};

struct TestApp {
    _dir: TempDir,
    app: Router,
    token: String,
}

async fn spawn_app() -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await;

    let account = user::create(
        &state.pool,
        UserCreate {
            email: "comptable@exemple.fr".into(),
            password: "un mot de passe solide".into(),
            firstname: "Jeanne".into(),
            lastname: "Martin".into(),
            role: Some(UserRole::Comptable),
        },
        comptoir::db::models::User::hash_password("un mot de passe solide").unwrap(),
    )
    .await
    .expect("test user");

    let token = state
        .get_jwt_service()
        .generate_token(account.id, &account.email, account.role)
        .expect("token");

    let app = api::build_app(&state).with_state(state);
    TestApp {
        _dir: dir,
        app,
        token,
    }
}

impl TestApp {
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create_client(&self) -> i64 {
        let (status, body) = self
            .request(
                "POST",
                "/api/clients",
                Some(json!({
                    "name": "Dupont SARL",
                    "email": "contact@dupont.fr",
                    "street": "12 rue de la Paix",
                    "city": "Lyon",
                    "zip_code": "69001",
                    "siret": "12345678900011"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "client creation failed: {body}");
        body["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn invoice_lifecycle_assigns_one_permanent_number() {
    let app = spawn_app().await;
    let client_id = app.create_client().await;

    // Draft: saved without a number, totals already computed
    let (status, invoice) = app
        .request(
            "POST",
            "/api/invoices",
            Some(json!({
                "client_id": client_id,
                "due_at": 1_790_000_000_000_i64,
                "items": [
                    {"description": "Développement", "quantity": 5, "unit_price": 500},
                    {"description": "Maintenance", "quantity": 2, "unit_price": 120}
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "invoice creation failed: {invoice}");
    assert_eq!(invoice["status"], "draft");
    assert_eq!(invoice["invoice_number"], Value::Null);
    assert_eq!(invoice["subtotal"], json!(2740.0));
    assert_eq!(invoice["tax_amount"], json!(548.0));
    assert_eq!(invoice["total"], json!(3288.0));
    let id = invoice["id"].as_i64().unwrap();

    // draft -> sent: exactly one number gets stamped
    let (status, sent) = app
        .request(
            "PATCH",
            &format!("/api/invoices/{id}/status"),
            Some(json!({"status": "sent"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let number = sent["invoice_number"].as_str().unwrap().to_string();
    assert!(number.starts_with("FAC-"), "unexpected number: {number}");
    assert!(number.ends_with("-0001"));

    // Editing items recomputes totals but never touches the number
    let (status, updated) = app
        .request(
            "PUT",
            &format!("/api/invoices/{id}"),
            Some(json!({
                "items": [{"description": "Développement", "quantity": 1, "unit_price": 100}]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["invoice_number"], json!(number));
    assert_eq!(updated["subtotal"], json!(100.0));
    assert_eq!(updated["total"], json!(120.0));

    // sent -> paid stamps paid_at and is terminal
    let (status, paid) = app
        .request(
            "PATCH",
            &format!("/api/invoices/{id}/status"),
            Some(json!({"status": "paid"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["invoice_number"], json!(number));
    assert!(paid["paid_at"].as_i64().is_some());

    let (status, body) = app
        .request(
            "PATCH",
            &format!("/api/invoices/{id}/status"),
            Some(json!({"status": "cancelled"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "got: {body}");
}

#[tokio::test]
async fn draft_numbers_are_sequential_per_kind() {
    let app = spawn_app().await;
    let client_id = app.create_client().await;

    let invoice = json!({
        "client_id": client_id,
        "due_at": 1_790_000_000_000_i64,
        "status": "sent",
        "items": [{"description": "Audit", "quantity": 1, "unit_price": 900}]
    });

    let (_, first) = app.request("POST", "/api/invoices", Some(invoice.clone())).await;
    let (_, second) = app.request("POST", "/api/invoices", Some(invoice)).await;
    let first = first["invoice_number"].as_str().unwrap();
    let second = second["invoice_number"].as_str().unwrap();
    assert!(first.ends_with("-0001"), "got {first}");
    assert!(second.ends_with("-0002"), "got {second}");

    // Quotes draw from their own counter
    let (status, quote) = app
        .request(
            "POST",
            "/api/quotes",
            Some(json!({
                "client_id": client_id,
                "status": "sent",
                "items": [{"description": "Audit", "quantity": 1, "unit_price": 900}]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "quote creation failed: {quote}");
    let quote_number = quote["quote_number"].as_str().unwrap();
    assert!(quote_number.starts_with("DEV-"), "got {quote_number}");
    assert!(quote_number.ends_with("-0001"), "got {quote_number}");
}

#[tokio::test]
async fn numbered_invoices_cannot_be_deleted() {
    let app = spawn_app().await;
    let client_id = app.create_client().await;

    let (_, invoice) = app
        .request(
            "POST",
            "/api/invoices",
            Some(json!({
                "client_id": client_id,
                "due_at": 1_790_000_000_000_i64,
                "status": "sent",
                "items": [{"description": "Conseil", "quantity": 1, "unit_price": 400}]
            })),
        )
        .await;
    let id = invoice["id"].as_i64().unwrap();

    let (status, _) = app
        .request("DELETE", &format!("/api/invoices/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Drafts go away cleanly
    let (_, draft) = app
        .request(
            "POST",
            "/api/invoices",
            Some(json!({
                "client_id": client_id,
                "due_at": 1_790_000_000_000_i64,
                "items": [{"description": "Conseil", "quantity": 1, "unit_price": 400}]
            })),
        )
        .await;
    let draft_id = draft["id"].as_i64().unwrap();
    let (status, _) = app
        .request("DELETE", &format!("/api/invoices/{draft_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_transitions_are_rejected() {
    let app = spawn_app().await;
    let client_id = app.create_client().await;

    let (_, invoice) = app
        .request(
            "POST",
            "/api/invoices",
            Some(json!({
                "client_id": client_id,
                "due_at": 1_790_000_000_000_i64,
                "items": [{"description": "Formation", "quantity": 1, "unit_price": 800}]
            })),
        )
        .await;
    let id = invoice["id"].as_i64().unwrap();

    // draft -> paid skips sent
    let (status, body) = app
        .request(
            "PATCH",
            &format!("/api/invoices/{id}/status"),
            Some(json!({"status": "paid"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0005");

    // sent -> draft would have to clear the number
    let (_, _) = app
        .request(
            "PATCH",
            &format!("/api/invoices/{id}/status"),
            Some(json!({"status": "sent"})),
        )
        .await;
    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/invoices/{id}/status"),
            Some(json!({"status": "draft"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/invoices")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Health stays public
    let response = app
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

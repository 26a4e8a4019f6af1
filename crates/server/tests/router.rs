use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{ServerOptions, ServerState};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::router(ServerState {
        engine: Arc::new(engine),
        options: ServerOptions::default(),
    })
}

fn basic(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/user/register",
        None,
        Some(json!({ "name": name, "email": email, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn befriend(app: &Router, a: (&str, &str), b: (&str, &str)) {
    let (status, _) = call(
        app,
        Method::POST,
        "/friendRequest/send",
        Some(&basic(a.1, "secret1")),
        Some(json!({ "receiver_id": b.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(
        app,
        Method::POST,
        "/friendRequest/accept",
        Some(&basic(b.1, "secret1")),
        Some(json!({ "sender_id": a.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_then_fetch_info() {
    let app = app().await;
    let id = register(&app, "alice", "Alice@Example.com").await;

    let (status, body) = call(
        &app,
        Method::GET,
        "/user/info",
        Some(&basic("alice@example.com", "secret1")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["id"], json!(id));
    assert_eq!(body["data"]["email"], json!("alice@example.com"));
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn private_routes_require_credentials() {
    let app = app().await;
    register(&app, "alice", "alice@example.com").await;

    let (status, body) = call(&app, Method::GET, "/friend/list", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));

    let (status, _) = call(
        &app,
        Method::GET,
        "/friend/list",
        Some(&basic("alice@example.com", "wrong-password")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = app().await;
    register(&app, "alice", "alice@example.com").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/user/register",
        None,
        Some(json!({ "name": "other", "email": "ALICE@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn split_then_settle_all_zeroes_the_balance() {
    let app = app().await;
    let alice = register(&app, "alice", "alice@example.com").await;
    let bob = register(&app, "bob", "bob@example.com").await;
    befriend(
        &app,
        (&alice, "alice@example.com"),
        (&bob, "bob@example.com"),
    )
    .await;

    let alice_auth = basic("alice@example.com", "secret1");
    let bob_auth = basic("bob@example.com", "secret1");

    let (status, body) = call(
        &app,
        Method::POST,
        "/splitExpense/create",
        Some(&alice_auth),
        Some(json!({
            "amount_minor": 10000,
            "description": "dinner",
            "category": "food",
            "splits": [{ "user_id": bob, "amount_minor": 6000 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["total_splitted_amount"], json!(6000));

    let uri = format!("/friend/balance?friend_id={bob}");
    let (_, body) = call(&app, Method::GET, &uri, Some(&alice_auth), None).await;
    assert_eq!(body["data"]["net"], json!(6000));

    let (status, body) = call(
        &app,
        Method::POST,
        "/settleExpense/send",
        Some(&bob_auth),
        Some(json!({ "receiver_id": alice, "is_settle_all": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    // Only the receiver may accept.
    let (status, _) = call(
        &app,
        Method::POST,
        "/settleExpense/accept",
        Some(&bob_auth),
        Some(json!({ "settle_expense_request_id": request_id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        Method::POST,
        "/settleExpense/accept",
        Some(&alice_auth),
        Some(json!({ "settle_expense_request_id": request_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["settled_rows"], json!(1));

    let (_, body) = call(&app, Method::GET, &uri, Some(&alice_auth), None).await;
    assert_eq!(body["data"]["net"], json!(0));
}

#[tokio::test]
async fn split_over_total_is_a_bad_request() {
    let app = app().await;
    let alice = register(&app, "alice", "alice@example.com").await;
    let bob = register(&app, "bob", "bob@example.com").await;
    befriend(
        &app,
        (&alice, "alice@example.com"),
        (&bob, "bob@example.com"),
    )
    .await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/splitExpense/create",
        Some(&basic("alice@example.com", "secret1")),
        Some(json!({
            "amount_minor": 1000,
            "description": "taxi",
            "splits": [{ "user_id": bob, "amount_minor": 1500 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn splitting_with_a_stranger_is_forbidden() {
    let app = app().await;
    register(&app, "alice", "alice@example.com").await;
    let carol = register(&app, "carol", "carol@example.com").await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/splitExpense/create",
        Some(&basic("alice@example.com", "secret1")),
        Some(json!({
            "amount_minor": 1000,
            "description": "taxi",
            "splits": [{ "user_id": carol, "amount_minor": 500 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn personal_expenses_are_listed_with_summary() {
    let app = app().await;
    register(&app, "alice", "alice@example.com").await;
    let auth = basic("alice@example.com", "secret1");

    for (amount, description) in [(1200, "groceries"), (800, "coffee")] {
        let (status, _) = call(
            &app,
            Method::POST,
            "/expense/create",
            Some(&auth),
            Some(json!({ "amount_minor": amount, "description": description })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(&app, Method::GET, "/expense/all", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["expenses"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["summary"]["count"]["personal"], json!(2));
    assert_eq!(body["data"]["summary"]["amount"]["total"], json!(2000));
}

#[tokio::test]
async fn malformed_input_still_gets_the_envelope() {
    let app = app().await;
    let alice = register(&app, "alice", "alice@example.com").await;
    let auth = basic("alice@example.com", "secret1");

    let (status, body) = call(
        &app,
        Method::POST,
        "/user/register",
        None,
        Some(json!({ "name": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].is_string());

    let (status, body) = call(
        &app,
        Method::GET,
        "/friend/balance?friend_id=nope",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    let (status, body) = call(
        &app,
        Method::POST,
        "/expense/create",
        Some(&auth),
        Some(json!({ "amount_minor": "ten", "description": "coffee" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    let (status, body) = call(&app, Method::GET, "/user/info", Some("Basic !!!"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));

    // Well-formed input on the same routes goes through.
    let (status, body) = call(&app, Method::GET, "/user/info", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!(alice));
}

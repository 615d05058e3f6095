//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use api::{AppState, Config};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            let handle = builder
                .install_recorder()
                .expect("failed to install Prometheus recorder");
            api::routes::metrics::describe();
            handle
        })
        .clone()
}

fn test_config() -> Config {
    Config {
        credential_rounds: 1_000,
        ..Config::default()
    }
}

async fn setup_with_state() -> (axum::Router, Arc<AppState>) {
    let state = api::build_state(&test_config()).await.unwrap();
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

async fn setup() -> axum::Router {
    setup_with_state().await.0
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create_user(app: &axum::Router, email: &str) -> Value {
    let (status, user) = send(
        app,
        "POST",
        "/users",
        Some(json!({ "name": "A", "email": email, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{user}");
    user
}

#[tokio::test]
async fn test_health_check() {
    let app = setup().await;

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["event_bus"], "local");
    assert_eq!(json["contracts"]["inventory"], "local");
    assert_eq!(json["contracts"]["users"], "local");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup().await;
    create_user(&app, "metrics@x.com").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("users_created_total"));
    assert!(text.contains("event_bus_published_total"));
}

#[tokio::test]
async fn test_catalog_is_seeded() {
    let app = setup().await;

    let (status, products) = send(&app, "GET", "/inventory", None).await;

    assert_eq!(status, StatusCode::OK);
    let skus: Vec<&str> = products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["sku"].as_str().unwrap())
        .collect();
    assert_eq!(skus, vec!["SKU-200", "SKU-100"]);
    assert_eq!(products[1]["price_cents"], 9900);
    assert_eq!(products[1]["stock"], 100);
}

#[tokio::test]
async fn test_create_product_and_duplicate_sku() {
    let app = setup().await;
    let product = json!({ "sku": "SKU-300", "name": "Starter Plan", "price_cents": 1900, "stock": 5 });

    let (status, created) = send(&app, "POST", "/inventory", Some(product.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["sku"], "SKU-300");

    let (status, body) = send(&app, "POST", "/inventory", Some(product)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().is_some());
}

/// Scenario A: a new user receives a paid welcome order.
#[tokio::test]
async fn test_user_creation_places_paid_welcome_order() {
    let app = setup().await;

    let user = create_user(&app, "a@x.com").await;
    assert_eq!(user["name"], "A");
    assert!(user.get("password").is_none());
    assert!(user.get("credential_hash").is_none());

    let (status, orders) = send(&app, "GET", "/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["user_id"], user["id"]);
    assert_eq!(orders[0]["product_sku"], "SKU-200");
    assert_eq!(orders[0]["quantity"], 1);
    assert_eq!(orders[0]["status"], "paid");

    let (_, payments) = send(&app, "GET", "/payments", None).await;
    let payments = payments.as_array().unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["order_id"], orders[0]["id"]);
    assert_eq!(payments[0]["amount_cents"], 49900);
    assert_eq!(payments[0]["status"], "completed");
    assert!(payments[0]["paid_at"].is_string());

    let (_, products) = send(&app, "GET", "/inventory", None).await;
    assert_eq!(products[0]["sku"], "SKU-200");
    assert_eq!(products[0]["stock"], 49);
}

/// Scenario B: over-reserving leaves stock untouched.
#[tokio::test]
async fn test_insufficient_stock() {
    let app = setup().await;

    let (status, fault) = send(
        &app,
        "POST",
        "/contracts/inventory/api/reserve",
        Some(json!({ "arguments": { "sku": "SKU-100", "quantity": 1000 } })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(fault["error"]["kind"], "insufficient_stock");
    assert_eq!(fault["error"]["available"], 100);

    let (status, body) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "user_id": "7b0f1c9e-9c61-4c39-9a64-0b4f3c1d2e5a",
            "product_sku": "SKU-100",
            "quantity": 1000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Insufficient stock"));

    let (_, products) = send(&app, "GET", "/inventory", None).await;
    assert_eq!(products[1]["sku"], "SKU-100");
    assert_eq!(products[1]["stock"], 100);

    let (_, orders) = send(&app, "GET", "/orders", None).await;
    assert!(orders.as_array().unwrap().is_empty());
}

/// Scenario C: an order is charged for its total and marked paid.
#[tokio::test]
async fn test_order_is_charged_and_paid() {
    let app = setup().await;

    let (status, order) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "user_id": "7b0f1c9e-9c61-4c39-9a64-0b4f3c1d2e5a",
            "product_sku": "SKU-100",
            "quantity": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["total_cents"], 19800);

    let order_id = order["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "paid");

    let (status, payment) = send(
        &app,
        "POST",
        "/contracts/payments/api/find_by_order",
        Some(json!({ "arguments": { "order_id": order_id } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment["amount_cents"], 19800);
    assert_eq!(payment["status"], "completed");

    let payment_id = payment["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/payments/{payment_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["order_id"], order_id);

    // The order already has its payment.
    let (status, _) = send(
        &app,
        "POST",
        "/payments",
        Some(json!({ "order_id": order_id, "amount_cents": 19800 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_user_errors() {
    let app = setup().await;
    create_user(&app, "a@x.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "name": "B", "email": "a@x.com", "password": "secret2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "name": "B", "email": "b@x.com", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "GET", "/users/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "GET",
        "/users/7b0f1c9e-9c61-4c39-9a64-0b4f3c1d2e5a",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("User not found"));
}

#[tokio::test]
async fn test_get_user() {
    let app = setup().await;
    let user = create_user(&app, "a@x.com").await;
    let user_id = user["id"].as_str().unwrap();

    let (status, fetched) = send(&app, "GET", &format!("/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, user);

    let (_, users) = send(&app, "GET", "/users", None).await;
    assert_eq!(users.as_array().unwrap().len(), 2, "admin account plus the new user");
}

#[tokio::test]
async fn test_welcome_order_needs_a_catalog() {
    let state = api::build_state(&Config {
        seed_catalog: false,
        ..test_config()
    })
    .await
    .unwrap();
    let app = api::create_app(state, get_metrics_handle());

    // The listener failure is logged; user creation itself succeeds.
    create_user(&app, "a@x.com").await;

    let (_, orders) = send(&app, "GET", "/orders", None).await;
    assert!(orders.as_array().unwrap().is_empty());

    let (status, fault) = send(
        &app,
        "POST",
        "/contracts/orders/api/create_from_user",
        Some(json!({ "arguments": { "user": {
            "id": "7b0f1c9e-9c61-4c39-9a64-0b4f3c1d2e5a",
            "name": "A",
            "email": "a@x.com",
            "created_at": "2026-01-01T00:00:00Z"
        } } })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(fault["error"]["kind"], "no_products_available");
}

#[tokio::test]
async fn test_contract_endpoint_errors() {
    let (app, state) = setup_with_state().await;

    let (status, fault) = send(
        &app,
        "POST",
        "/contracts/inventory/api/teleport",
        Some(json!({ "arguments": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(fault["error"]["kind"], "not_found");

    // An unknown contract is a routing failure: no fault body to decode.
    let (status, body) = send(
        &app,
        "POST",
        "/contracts/shipping/api/all",
        Some(json!({ "arguments": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Null);

    let (status, fault) = send(
        &app,
        "POST",
        "/contracts/inventory/api/reserve",
        Some(json!({ "arguments": { "sku": "SKU-100" } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(fault["error"]["kind"], "validation");

    let (status, _) = send(
        &app,
        "POST",
        "/contracts/orders/api/mark_as_paid",
        Some(json!({ "arguments": { "order_id": "7b0f1c9e-9c61-4c39-9a64-0b4f3c1d2e5a" } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(state.services.orders.list().await.unwrap().is_empty());
}

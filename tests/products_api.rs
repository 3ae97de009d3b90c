//! End-to-end tests for the catalog service router

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront_services::api::create_product_router;
use storefront_services::config::AuthConfig;
use storefront_services::domain::{User, UserId};
use storefront_services::infrastructure::auth::TokenIssuer;
use storefront_services::infrastructure::product::InMemoryProductRepository;
use storefront_services::{create_product_state_with_repository, create_token_issuer};

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "products-api-test-secret".to_string(),
        ..Default::default()
    }
}

fn create_app() -> Router {
    let state = create_product_state_with_repository(
        Arc::new(InMemoryProductRepository::new()),
        &auth_config(),
    )
    .unwrap();

    create_product_router(state)
}

/// Access token minted with the shared signing secret
fn access_token() -> String {
    let user = User::new(UserId::generate(), "seller@b.com", "hash");

    create_token_issuer(&auth_config())
        .unwrap()
        .issue_access(&user)
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

fn request(method: Method, uri: &str, body: Option<Value>, cookie_token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = cookie_token {
        builder = builder.header(header::COOKIE, format!("access_token={}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn widget(sku: &str) -> Value {
    json!({
        "name": "Widget",
        "description": "A useful widget",
        "price": 19.99,
        "stockQuantity": 5,
        "category": "Tools",
        "sku": sku
    })
}

async fn create_widget(app: &Router, token: &str, sku: &str) -> Value {
    let (status, body) = send(
        app,
        request(Method::POST, "/products", Some(widget(sku)), Some(token)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn create_requires_authentication() {
    let app = create_app();

    let (status, body) = send(
        &app,
        request(Method::POST, "/products", Some(widget("SKU-1")), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication failed");
}

#[tokio::test]
async fn create_and_fetch_product() {
    let app = create_app();
    let token = access_token();

    let created = create_widget(&app, &token, "SKU-1").await;

    assert_eq!(created["name"], "Widget");
    assert_eq!(created["price"], json!(19.99));
    assert_eq!(created["stockQuantity"], 5);
    assert_eq!(created["isActive"], true);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(
        &app,
        request(Method::GET, &format!("/products/{}", id), None, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn bearer_header_is_accepted() {
    let app = create_app();
    let token = access_token();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/products")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(widget("SKU-1").to_string()))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn duplicate_sku_is_rejected() {
    let app = create_app();
    let token = access_token();
    create_widget(&app, &token, "SKU-1").await;

    let (status, body) = send(
        &app,
        request(Method::POST, "/products", Some(widget("SKU-1")), Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"]["sku"],
        json!(["A product with this SKU already exists."])
    );
}

#[tokio::test]
async fn invalid_fields_are_reported_together() {
    let app = create_app();
    let token = access_token();

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/products",
            Some(json!({"name": " ", "price": "1.999", "stockQuantity": -2})),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation error");
    assert_eq!(body["details"]["name"], json!(["Product name cannot be empty."]));
    assert_eq!(
        body["details"]["price"],
        json!(["Ensure that there are no more than 2 decimal places."])
    );
    assert_eq!(
        body["details"]["stockQuantity"],
        json!(["Ensure this value is greater than or equal to 0."])
    );
    assert_eq!(body["details"]["category"], json!(["This field is required."]));
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let app = create_app();

    for uri in ["/products/not-a-uuid", "/products/7d1c2f3e-5b4a-4c3d-9e8f-0a1b2c3d4e5f"] {
        let (status, body) = send(&app, request(Method::GET, uri, None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }
}

#[tokio::test]
async fn put_and_patch_update_product() {
    let app = create_app();
    let token = access_token();
    let created = create_widget(&app, &token, "SKU-1").await;
    let uri = format!("/products/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        request(Method::PUT, &uri, Some(json!({"name": "Gadget"})), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("price").is_some());

    let mut replacement = widget("SKU-1");
    replacement["name"] = json!("Gadget");
    let (status, body) = send(
        &app,
        request(Method::PUT, &uri, Some(replacement), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Gadget");

    let (status, body) = send(
        &app,
        request(Method::PATCH, &uri, Some(json!({"stockQuantity": 0})), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stockQuantity"], 0);
    assert_eq!(body["name"], "Gadget");
}

#[tokio::test]
async fn delete_is_soft_and_hides_stock() {
    let app = create_app();
    let token = access_token();
    let created = create_widget(&app, &token, "SKU-1").await;
    let id = created["id"].as_str().unwrap();

    let (status, stock) = send(
        &app,
        request(Method::GET, &format!("/products/{}/stock", id), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stock,
        json!({"product_id": id, "stock_quantity": 5, "in_stock": true, "available": true})
    );

    let (status, _) = send(
        &app,
        request(Method::DELETE, &format!("/products/{}", id), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        request(Method::DELETE, &format!("/products/{}", id), None, Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/products/{}", id), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isActive"], false);

    let (status, _) = send(
        &app,
        request(Method::GET, &format!("/products/{}/stock", id), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let app = create_app();
    let token = access_token();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/products")
        .header(header::COOKIE, format!("access_token={}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation error");
    assert!(body["details"].as_str().unwrap().starts_with("Invalid JSON syntax"));
}

#[tokio::test]
async fn health_reports_service_name() {
    let app = create_app();

    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "product-service");
}

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use film_booking::config::{BookingConfig, JwtConfig};
use film_booking::middleware::{issue_token, ADMIN_ROLE};
use film_booking::store::{FilmStore, MemoryStore};
use film_booking::AppState;

pub fn jwt() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        expires_in_hours: 1,
    }
}

pub fn admin_token() -> String {
    issue_token(&jwt(), "admin@cinema.test", &[ADMIN_ROLE]).unwrap()
}

pub fn user_token(subject: &str) -> String {
    issue_token(&jwt(), subject, &["User"]).unwrap()
}

pub fn app_over(store: Arc<dyn FilmStore>, max_retries: u32) -> Router {
    let state = AppState::with_store(store, jwt(), &BookingConfig { max_retries });
    film_booking::app(state)
}

pub fn app() -> Router {
    app_over(Arc::new(MemoryStore::new()), BookingConfig::default().max_retries)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
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
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };

    TestResponse { status, headers, body }
}

pub async fn get(app: &Router, uri: &str, token: &str) -> TestResponse {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post(app: &Router, uri: &str, token: &str, body: Value) -> TestResponse {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub const SLOT_DATE: &str = "2026-11-02";

pub fn film_body(name: &str, genre: &str, rows: i32, seats_per_row: i32) -> Value {
    json!({
        "name": name,
        "description": format!("{} description", name),
        "genre": genre,
        "duration": 120,
        "amount": 10.0,
        "slots": [
            { "showCategory": "Evening", "slotDate": SLOT_DATE, "rows": rows, "seatsPerRow": seats_per_row }
        ]
    })
}

/// Creates a film as admin and returns its id parsed from `Location`.
pub async fn create_film(app: &Router, body: Value) -> i32 {
    let response = post(app, "/api/film/add", &admin_token(), body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let location = response.headers.get(header::LOCATION).unwrap().to_str().unwrap();
    location.rsplit('/').next().unwrap().parse().unwrap()
}

pub fn booking_body(film_id: i32, quantity: u32) -> Value {
    json!({ "filmId": film_id, "category": "Evening", "date": SLOT_DATE, "quantity": quantity })
}

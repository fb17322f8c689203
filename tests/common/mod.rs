#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use seat_booking::{models::Layout, services::ReservationStore, AppState};

pub fn test_store(rows: usize, seats_per_row: usize) -> ReservationStore {
    ReservationStore::new(Layout::new(rows, seats_per_row).unwrap())
}

/// Router over a fresh store with the reference 11x7 layout.
pub fn test_app() -> Router {
    app_with_store(test_store(11, 7))
}

pub fn app_with_store(store: ReservationStore) -> Router {
    seat_booking::router(AppState::new(store))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_owned())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn book(app: &Router, count: i64) -> (StatusCode, Value) {
    send(app, Method::POST, "/book", Some(&format!(r#"{{"count": {count}}}"#))).await
}

pub async fn list(app: &Router) -> Value {
    let (status, body) = send(app, Method::GET, "/seats", None).await;
    assert_eq!(status, StatusCode::OK);
    body
}

pub fn assigned(body: &Value) -> Vec<u64> {
    body["assigned"]
        .as_array()
        .expect("assigned array")
        .iter()
        .map(|v| v.as_u64().unwrap())
        .collect()
}

pub fn booked_numbers(seats: &Value) -> Vec<u64> {
    seats
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["status"] == "booked")
        .map(|s| s["index"].as_u64().unwrap())
        .collect()
}

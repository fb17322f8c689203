pub mod allocator;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
pub mod services;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::services::ReservationStore;

// Shared state for every request handler
#[derive(Clone)]
pub struct AppState {
    pub store: ReservationStore,
}

impl AppState {
    pub fn new(store: ReservationStore) -> Arc<Self> {
        Arc::new(Self { store })
    }
}

/// Full HTTP surface: seat routes plus banner and health check.
pub fn router(state: Arc<AppState>) -> Router {
    // The booking client is a browser app served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(|| async { "Seat Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .merge(controllers::routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

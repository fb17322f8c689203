use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, BookingError};
use crate::models::SeatState;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seats", get(list_seats))
        .route("/book", post(book_seats))
        .route("/reset", post(reset_seats))
}

/* ---------- SEATS ---------- */

// GET /seats
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatResponse {
    /// 1-based seat number.
    pub index: usize,
    pub status: SeatState,
}

async fn list_seats(State(state): State<Arc<AppState>>) -> Json<Vec<SeatResponse>> {
    let seats = state.store.list_seats().await;
    let payload = seats
        .into_iter()
        .map(|seat| SeatResponse {
            index: seat.index + 1,
            status: seat.state,
        })
        .collect();
    Json(payload)
}

/* ---------- BOOKING ---------- */

// POST /book
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    /// 1-based seat numbers.
    pub assigned: Vec<usize>,
}

async fn book_seats(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BookRequest>, JsonRejection>,
) -> Result<Json<BookResponse>, ApiError> {
    // Missing, fractional or non-numeric counts are the caller's mistake too.
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!("book body rejected: {}", rejection.body_text());
        BookingError::InvalidRequest
    })?;

    let plan = state.store.book(req.count).await?;
    Ok(Json(BookResponse {
        assigned: plan.seat_numbers(),
    }))
}

// POST /reset
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub ok: bool,
}

async fn reset_seats(State(state): State<Arc<AppState>>) -> Result<Json<ResetResponse>, ApiError> {
    state.store.reset().await?;
    Ok(Json(ResetResponse { ok: true }))
}

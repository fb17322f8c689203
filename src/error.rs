use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failures a booking call can return. None of them leave the seat map
/// partially modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("seat count must be a positive integer")]
    InvalidRequest,

    #[error("not enough seats available: requested {requested}, available {available}")]
    InsufficientCapacity { requested: usize, available: usize },

    #[error("seat map is busy, retry the request")]
    TransientUnavailable,
}

impl BookingError {
    /// Stable name reported to clients in the `error` field.
    pub fn kind(&self) -> &'static str {
        match self {
            BookingError::InvalidRequest => "InvalidRequest",
            BookingError::InsufficientCapacity { .. } => "InsufficientCapacity",
            BookingError::TransientUnavailable => "TransientUnavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BookingError::InvalidRequest => StatusCode::BAD_REQUEST,
            BookingError::InsufficientCapacity { .. } => StatusCode::CONFLICT,
            BookingError::TransientUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout must have at least one row and one seat per row (got {rows}x{seats_per_row})")]
    Empty { rows: usize, seats_per_row: usize },

    #[error("layout {rows}x{seats_per_row} has more seats than can be addressed")]
    TooLarge { rows: usize, seats_per_row: usize },

    #[error("stored seat map has {found} seats, layout expects {expected}")]
    SizeMismatch { expected: usize, found: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("unknown LOG_FORMAT {0:?}, expected \"pretty\" or \"json\"")]
    LogFormat(String),
}

/// Error body returned by the HTTP layer.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// Wrapper turning a [`BookingError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub BookingError);

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::warn!(error = %self.0, "request rejected");
        }

        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

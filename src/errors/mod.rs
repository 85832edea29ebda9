//! Error handling module for the seat allocation backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const ALREADY_ALLOCATED: &str = "ALREADY_ALLOCATED";
    pub const NO_PARTICIPANTS: &str = "NO_PARTICIPANTS";
    pub const NO_SEATS_AVAILABLE: &str = "NO_SEATS_AVAILABLE";
    pub const SEAT_TAKEN: &str = "SEAT_TAKEN";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Authentication required
    Unauthorized(String),
    /// Resource not found
    NotFound(String),
    /// Validation error
    Validation(String),
    /// Team already holds a seat; not retryable without an explicit release
    AlreadyAllocated(String),
    /// Team has no checked-in participants
    NoParticipants(String),
    /// Neither placement strategy found a candidate seat
    NoSeatsAvailable(String),
    /// Another allocation won the candidate seat; retry for a fresh candidate
    SeatTaken(String),
    /// Database error
    Database(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyAllocated(_) => StatusCode::CONFLICT,
            AppError::NoParticipants(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NoSeatsAvailable(_) => StatusCode::CONFLICT,
            AppError::SeatTaken(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::AlreadyAllocated(_) => codes::ALREADY_ALLOCATED,
            AppError::NoParticipants(_) => codes::NO_PARTICIPANTS,
            AppError::NoSeatsAvailable(_) => codes::NO_SEATS_AVAILABLE,
            AppError::SeatTaken(_) => codes::SEAT_TAKEN,
            AppError::Database(_) => codes::DATABASE_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::AlreadyAllocated(msg)
            | AppError::NoParticipants(msg)
            | AppError::NoSeatsAvailable(msg)
            | AppError::SeatTaken(msg)
            | AppError::Database(msg) => msg,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message().to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant is a distinct failure category with its own HTTP status and
/// stable machine-readable code, so callers can tell a declined card apart
/// from an unreachable processor or an unavailable database.
///
/// # Error Categories
///
/// - **Validation**: request fields failed validation (bad tier, malformed expiry)
/// - **CardDeclined**: the processor refused to tokenize or charge the card
/// - **ProcessorUnavailable**: the processor could not be reached or errored
/// - **Database**: a storage operation failed
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The processor rejected the card or the charge did not succeed.
    ///
    /// Returns HTTP 402 Payment Required.
    /// The String carries the processor's message when one was given.
    #[error("Card declined: {0}")]
    CardDeclined(String),

    /// The processor was unreachable, timed out, or returned a server error.
    ///
    /// Returns HTTP 502 Bad Gateway.
    #[error("Payment processor unavailable: {0}")]
    ProcessorUnavailable(String),

    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    ///
    /// Returns HTTP 503 Service Unavailable; details are not sent to clients.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `Validation` → 400 Bad Request
/// - `CardDeclined` → 402 Payment Required
/// - `ProcessorUnavailable` → 502 Bad Gateway
/// - `Database` → 503 Service Unavailable (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::Validation(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::CardDeclined(ref msg) => {
                (StatusCode::PAYMENT_REQUIRED, "card_declined", msg.clone())
            }
            AppError::ProcessorUnavailable(_) => (
                StatusCode::BAD_GATEWAY,
                "processor_unavailable",
                "The payment processor could not be reached".to_string(),
            ),
            AppError::Database(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "storage_unavailable",
                "Payment storage is currently unavailable".to_string(),
            ),
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("unknown tier code".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_card_declined_maps_to_402() {
        let response = AppError::CardDeclined("insufficient funds".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn test_processor_unavailable_maps_to_502() {
        let response =
            AppError::ProcessorUnavailable("connection timed out".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_database_error_maps_to_503_without_details() {
        let response = AppError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

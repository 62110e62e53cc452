//! Payment HTTP handler.
//!
//! Implements the single intake endpoint:
//! - POST /pay - charge a card for a reward tier and record the payment

use crate::{
    error::AppError,
    models::payment::{PayRequest, PaymentResponse},
    services::payment_service,
    state::AppState,
};
use axum::{Json, extract::State};

/// Charge a card for the requested reward tier.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "card_number": "4242424242424242",
///   "expiry_date": "12/25",
///   "cvc": "123",
///   "tty_of_points": "BRONZE"
/// }
/// ```
///
/// # Response (200)
///
/// ```json
/// {
///   "status": "success",
///   "payment_id": "770e8400-...",
///   "tier": "BRONZE",
///   "amount_cents": 2500,
///   "currency": "usd",
///   "created_at": "2026-08-07T16:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Failures are reported as distinct categories rather than a generic
/// failed status: 400 for validation, 402 for a declined card, 502 when the
/// processor is unreachable, 503 when the payment could not be stored.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<PayRequest>,
) -> Result<Json<PaymentResponse>, AppError> {
    let payment =
        payment_service::execute_payment(&state.pool, &state.processor, &state.currency, request)
            .await?;

    Ok(Json(payment.into()))
}

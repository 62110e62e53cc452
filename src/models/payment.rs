//! Payment data models and API request/response types.
//!
//! This module defines:
//! - `Payment`: Database entity representing a recorded payment
//! - `PayRequest`: Request body accepted by POST /pay
//! - `ValidatedPayment`: A request that has passed field validation
//! - `PaymentResponse`: Response body returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::tier::Tier;

/// Represents a payment record from the database.
///
/// # Database Table
///
/// Maps to the `payments` table. One row is written per succeeded charge,
/// and rows are never updated or deleted through this service. Card data
/// is deliberately absent: it is sent to the processor for tokenization
/// and never persisted.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Payment {
    /// Unique identifier, generated server-side
    pub id: Uuid,

    /// Payer email the receipt was sent to
    pub email: String,

    /// Tier wire code ("BRONZE", "SILVER", "GOLD")
    pub tier: String,

    /// Charged amount in minor currency units
    pub amount_cents: i64,

    /// Currency code (ISO 4217)
    pub currency: String,

    /// Processor charge identifier, kept so a recorded payment can be tied
    /// back to the charge it came from
    pub charge_id: String,

    /// When the payment was recorded
    pub created_at: DateTime<Utc>,
}

/// Request body for POST /pay.
///
/// # JSON Example
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
/// A client-supplied `id` field is accepted and ignored: the payment
/// identifier is always generated server-side and returned as `payment_id`.
#[derive(Debug, Deserialize)]
pub struct PayRequest {
    /// Cardholder name, passed to the processor when present
    pub name: Option<String>,

    /// Payer email; also used as the receipt address
    pub email: String,

    /// Card number as printed, digits only (spaces are not accepted)
    pub card_number: String,

    /// Card expiry in "MM/YY" form
    pub expiry_date: String,

    /// Card verification code, 3 or 4 digits
    pub cvc: String,

    /// Reward tier wire code, matched exactly against BRONZE/SILVER/GOLD
    #[serde(rename = "tty_of_points")]
    pub tier: String,
}

/// Card fields forwarded to the processor for tokenization.
#[derive(Debug, Clone)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u8,
    pub cvc: String,
    pub name: Option<String>,
}

/// A `PayRequest` whose fields have all passed validation.
///
/// Constructing this is the only path from raw request to the charge
/// pipeline, so the service code downstream never re-checks field shape.
#[derive(Debug)]
pub struct ValidatedPayment {
    pub tier: Tier,
    pub amount_cents: i64,
    pub email: String,
    pub card: CardDetails,
}

impl PayRequest {
    /// Validate field shape and resolve the tier to its charge amount.
    ///
    /// # Checks
    ///
    /// - tier code must be one of BRONZE/SILVER/GOLD (exact match)
    /// - expiry must be "MM/YY" with a month in 1..=12
    /// - card number must be 12 to 19 digits
    /// - CVC must be 3 or 4 digits
    /// - email must be non-empty and contain "@"
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the offending field. Nothing is
    /// sent to the processor for a request that fails here; in particular an
    /// unknown tier is rejected instead of producing a zero-value charge.
    pub fn validate(self) -> Result<ValidatedPayment, AppError> {
        let tier: Tier = self
            .tier
            .parse()
            .map_err(|_| AppError::Validation(format!("unknown tier code {:?}", self.tier)))?;

        let (exp_month, exp_year) = parse_expiry(&self.expiry_date)?;

        if self.card_number.is_empty()
            || !self.card_number.chars().all(|c| c.is_ascii_digit())
            || !(12..=19).contains(&self.card_number.len())
        {
            return Err(AppError::Validation(
                "card_number must be 12 to 19 digits".to_string(),
            ));
        }

        if !self.cvc.chars().all(|c| c.is_ascii_digit()) || !(3..=4).contains(&self.cvc.len()) {
            return Err(AppError::Validation("cvc must be 3 or 4 digits".to_string()));
        }

        if self.email.is_empty() || !self.email.contains('@') {
            return Err(AppError::Validation(
                "email must be a valid address".to_string(),
            ));
        }

        Ok(ValidatedPayment {
            tier,
            amount_cents: tier.amount_cents(),
            email: self.email,
            card: CardDetails {
                number: self.card_number,
                exp_month,
                exp_year,
                cvc: self.cvc,
                name: self.name,
            },
        })
    }
}

/// Split an "MM/YY" expiry string into numeric month and two-digit year.
///
/// A string without exactly one "/" separator, non-numeric components, or a
/// month outside 1..=12 is a validation error, never a panic.
fn parse_expiry(raw: &str) -> Result<(u8, u8), AppError> {
    let invalid = || AppError::Validation(format!("expiry_date {:?} is not in MM/YY form", raw));

    let mut parts = raw.split('/');
    let (month_part, year_part) = match (parts.next(), parts.next(), parts.next()) {
        (Some(month), Some(year), None) => (month, year),
        _ => return Err(invalid()),
    };

    let month: u8 = month_part.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    if year_part.len() != 2 {
        return Err(invalid());
    }
    let year: u8 = year_part.parse().map_err(|_| invalid())?;

    Ok((month, year))
}

/// Response returned for a successful payment.
///
/// # JSON Example
///
/// ```json
/// {
///   "status": "success",
///   "payment_id": "770e8400-e29b-41d4-a716-446655440002",
///   "tier": "BRONZE",
///   "amount_cents": 2500,
///   "currency": "usd",
///   "created_at": "2026-08-07T16:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub status: String,
    pub payment_id: Uuid,
    pub tier: String,
    pub amount_cents: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Convert a recorded Payment into the API response.
///
/// The processor charge id stays internal; clients only see the payment id.
impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            status: "success".to_string(),
            payment_id: payment.id,
            tier: payment.tier,
            amount_cents: payment.amount_cents,
            currency: payment.currency,
            created_at: payment.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tier: &str) -> PayRequest {
        PayRequest {
            name: Some("Ada Lovelace".to_string()),
            email: "ada@example.com".to_string(),
            card_number: "4242424242424242".to_string(),
            expiry_date: "12/25".to_string(),
            cvc: "123".to_string(),
            tier: tier.to_string(),
        }
    }

    #[test]
    fn test_valid_request_resolves_tier_amount() {
        let validated = request("BRONZE").validate().unwrap();
        assert_eq!(validated.tier, Tier::Bronze);
        assert_eq!(validated.amount_cents, 2500);
        assert_eq!(validated.card.exp_month, 12);
        assert_eq!(validated.card.exp_year, 25);
    }

    #[test]
    fn test_unknown_tier_rejected() {
        let result = request("DIAMOND").validate();
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_expiry_splits_on_single_slash() {
        assert_eq!(parse_expiry("12/25").unwrap(), (12, 25));
        assert_eq!(parse_expiry("01/30").unwrap(), (1, 30));
    }

    #[test]
    fn test_expiry_without_slash_is_validation_error() {
        assert!(parse_expiry("1225").is_err());
        assert!(parse_expiry("").is_err());
    }

    #[test]
    fn test_expiry_with_extra_separator_is_rejected() {
        assert!(parse_expiry("12/25/26").is_err());
    }

    #[test]
    fn test_expiry_month_out_of_range_is_rejected() {
        assert!(parse_expiry("13/25").is_err());
        assert!(parse_expiry("00/25").is_err());
    }

    #[test]
    fn test_expiry_non_numeric_is_rejected() {
        assert!(parse_expiry("ab/cd").is_err());
        assert!(parse_expiry("12/202b").is_err());
    }

    #[test]
    fn test_card_number_must_be_digits() {
        let mut bad = request("GOLD");
        bad.card_number = "4242-4242-4242-4242".to_string();
        assert!(bad.validate().is_err());

        let mut short = request("GOLD");
        short.card_number = "42424242".to_string();
        assert!(short.validate().is_err());
    }

    #[test]
    fn test_cvc_must_be_three_or_four_digits() {
        let mut bad = request("SILVER");
        bad.cvc = "12".to_string();
        assert!(bad.validate().is_err());

        let mut four = request("SILVER");
        four.cvc = "1234".to_string();
        assert!(four.validate().is_ok());
    }

    #[test]
    fn test_email_must_contain_at_sign() {
        let mut bad = request("BRONZE");
        bad.email = "not-an-address".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_client_supplied_id_is_ignored_on_deserialization() {
        let body = serde_json::json!({
            "id": "client-chosen-id",
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "card_number": "4242424242424242",
            "expiry_date": "12/25",
            "cvc": "123",
            "tty_of_points": "GOLD"
        });

        let request: PayRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.tier, "GOLD");
    }
}

//! Payment processor client.
//!
//! Thin client for a Stripe-shaped card API: tokenize card details, create a
//! charge against the token, and refund a charge. All calls are form-encoded
//! POSTs authenticated with a bearer secret key.
//!
//! # Error Mapping
//!
//! - Transport failures (DNS, connect, timeout) → `ProcessorUnavailable`
//! - HTTP 4xx → `CardDeclined`, carrying the processor's message when the
//!   error body has one
//! - HTTP 5xx or an unparseable body → `ProcessorUnavailable`
//!
//! A charge that comes back with a non-"succeeded" status is not mapped
//! here; the payment service decides what a created-but-unsucceeded charge
//! means.

use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;
use crate::models::payment::CardDetails;

/// Timeout applied to every processor call, so a stalled processor surfaces
/// as `ProcessorUnavailable` instead of hanging the request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Single-use token the processor exchanges card details for.
#[derive(Debug, Clone, Deserialize)]
pub struct CardToken {
    pub id: String,
}

/// A charge created at the processor.
#[derive(Debug, Clone, Deserialize)]
pub struct Charge {
    pub id: String,
    pub status: String,
}

impl Charge {
    /// Whether the processor reports this charge as captured successfully.
    pub fn succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}

/// A refund issued for a charge (used only as a compensating action).
#[derive(Debug, Clone, Deserialize)]
pub struct Refund {
    pub id: String,
    pub status: String,
}

/// Error envelope the processor returns for rejected requests.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// HTTP client for the payment processor.
///
/// Built once at startup and cloned into application state; the underlying
/// `reqwest::Client` reuses connections across requests.
#[derive(Debug, Clone)]
pub struct ProcessorClient {
    base_url: String,
    secret_key: String,
    http: reqwest::Client,
}

impl ProcessorClient {
    /// Create a client for the processor at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str, secret_key: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
            http,
        })
    }

    /// Exchange card details for a single-use token.
    ///
    /// `POST {base}/v1/tokens` with `card[...]` form fields. The card data
    /// exists only in this request; nothing is retained afterwards.
    pub async fn tokenize_card(&self, card: &CardDetails) -> Result<CardToken, AppError> {
        let mut form = vec![
            ("card[number]", card.number.clone()),
            ("card[exp_month]", card.exp_month.to_string()),
            ("card[exp_year]", card.exp_year.to_string()),
            ("card[cvc]", card.cvc.clone()),
        ];
        if let Some(ref name) = card.name {
            form.push(("card[name]", name.clone()));
        }

        let response = self
            .http
            .post(self.endpoint("/v1/tokens"))
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;

        parse_response(response).await
    }

    /// Charge a previously created token.
    ///
    /// `POST {base}/v1/charges` with the amount in minor currency units.
    /// The returned charge may still carry a non-"succeeded" status.
    pub async fn create_charge(
        &self,
        token_id: &str,
        amount_cents: i64,
        currency: &str,
        description: &str,
        receipt_email: &str,
    ) -> Result<Charge, AppError> {
        let form = [
            ("amount", amount_cents.to_string()),
            ("currency", currency.to_string()),
            ("source", token_id.to_string()),
            ("description", description.to_string()),
            ("receipt_email", receipt_email.to_string()),
        ];

        let response = self
            .http
            .post(self.endpoint("/v1/charges"))
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;

        parse_response(response).await
    }

    /// Refund a charge in full.
    ///
    /// `POST {base}/v1/refunds`. Only called to compensate a succeeded
    /// charge whose payment row could not be written.
    pub async fn refund_charge(&self, charge_id: &str) -> Result<Refund, AppError> {
        let form = [("charge", charge_id.to_string())];

        let response = self
            .http
            .post(self.endpoint("/v1/refunds"))
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;

        parse_response(response).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Map a reqwest transport error (connect, DNS, timeout) to the processor
/// error category.
fn transport_error(err: reqwest::Error) -> AppError {
    AppError::ProcessorUnavailable(err.to_string())
}

/// Turn a processor HTTP response into a typed result.
async fn parse_response<T>(response: reqwest::Response) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();

    if status.is_success() {
        return response.json::<T>().await.map_err(|err| {
            AppError::ProcessorUnavailable(format!("malformed processor response: {err}"))
        });
    }

    let body = response.text().await.unwrap_or_default();

    if status.is_client_error() {
        // The processor rejected the card or the request; surface its own
        // message when the error body carries one.
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.error.message)
            .unwrap_or_else(|| format!("processor rejected the request ({status})"));
        return Err(AppError::CardDeclined(message));
    }

    Err(AppError::ProcessorUnavailable(format!(
        "processor returned {status}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_deserializes() {
        let body = r#"{"id": "tok_1Mpc0P", "object": "token", "used": false}"#;
        let token: CardToken = serde_json::from_str(body).unwrap();
        assert_eq!(token.id, "tok_1Mpc0P");
    }

    #[test]
    fn test_charge_response_deserializes_and_reports_success() {
        let body = r#"{
            "id": "ch_3Mpc0P",
            "object": "charge",
            "amount": 2500,
            "currency": "usd",
            "status": "succeeded"
        }"#;
        let charge: Charge = serde_json::from_str(body).unwrap();
        assert_eq!(charge.id, "ch_3Mpc0P");
        assert!(charge.succeeded());
    }

    #[test]
    fn test_pending_charge_is_not_succeeded() {
        let charge = Charge {
            id: "ch_pending".to_string(),
            status: "pending".to_string(),
        };
        assert!(!charge.succeeded());
    }

    #[test]
    fn test_error_body_message_extracted() {
        let body = r#"{
            "error": {
                "type": "card_error",
                "code": "card_declined",
                "message": "Your card was declined."
            }
        }"#;
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.error.message.as_deref(),
            Some("Your card was declined.")
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ProcessorClient::new("https://api.stripe.com/", "sk_test_abc").unwrap();
        assert_eq!(
            client.endpoint("/v1/tokens"),
            "https://api.stripe.com/v1/tokens"
        );
    }
}

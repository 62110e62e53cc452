//! Payment service - the charge-then-record pipeline behind POST /pay.
//!
//! # Sequence
//!
//! 1. Validate the request and resolve the tier to its fixed amount
//! 2. Tokenize the card at the processor
//! 3. Charge the token
//! 4. Insert the payment row, only after a succeeded charge
//!
//! # Compensation
//!
//! Money must never be taken without a row recording it. If the insert fails
//! after the charge succeeded, the charge is refunded; if the refund itself
//! fails, the orphaned charge id is logged at error level for manual
//! reconciliation. The caller sees the storage error category either way.

use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::payment::{PayRequest, Payment, ValidatedPayment};
use crate::services::processor::{Charge, ProcessorClient};

/// Run the full payment pipeline for one request.
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `processor` - Payment processor client
/// * `currency` - ISO 4217 code charges are made in
/// * `request` - Raw request body from POST /pay
///
/// # Returns
///
/// The recorded payment row.
///
/// # Errors
///
/// - `Validation`: a request field failed validation; nothing was charged
/// - `CardDeclined`: the processor refused the card, or the charge was
///   created with a non-succeeded status
/// - `ProcessorUnavailable`: the processor could not be reached
/// - `Database`: the payment row could not be written (the charge has been
///   refunded, or flagged for reconciliation if the refund failed too)
pub async fn execute_payment(
    pool: &DbPool,
    processor: &ProcessorClient,
    currency: &str,
    request: PayRequest,
) -> Result<Payment, AppError> {
    // Validate first; invalid requests never reach the processor
    let validated = request.validate()?;

    let token = processor.tokenize_card(&validated.card).await?;

    let charge = processor
        .create_charge(
            &token.id,
            validated.amount_cents,
            currency,
            &charge_description(&validated.email),
            &validated.email,
        )
        .await?;

    ensure_succeeded(&charge)?;

    // The charge has settled; from here on a write failure must not lose it
    match record_payment(pool, &validated, currency, &charge.id).await {
        Ok(payment) => {
            tracing::info!(
                "recorded payment {} for charge {} ({} {})",
                payment.id,
                charge.id,
                payment.amount_cents,
                payment.currency
            );
            Ok(payment)
        }
        Err(insert_err) => {
            compensate_unrecorded_charge(processor, &charge.id).await;
            Err(insert_err)
        }
    }
}

/// Build the description attached to the processor charge.
fn charge_description(email: &str) -> String {
    format!("Charge for {email}")
}

/// Treat any charge the processor did not mark "succeeded" as a decline.
fn ensure_succeeded(charge: &Charge) -> Result<(), AppError> {
    if charge.succeeded() {
        return Ok(());
    }

    tracing::warn!(
        "charge {} was created but has status {:?}",
        charge.id,
        charge.status
    );
    Err(AppError::CardDeclined(format!(
        "charge was not completed (status {:?})",
        charge.status
    )))
}

/// Insert the payment row for a succeeded charge.
///
/// The id is generated here, server-side; any identifier the client sent is
/// not part of the record.
async fn record_payment(
    pool: &DbPool,
    validated: &ValidatedPayment,
    currency: &str,
    charge_id: &str,
) -> Result<Payment, AppError> {
    let payment = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (id, email, tier, amount_cents, currency, charge_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&validated.email)
    .bind(validated.tier.as_str())
    .bind(validated.amount_cents)
    .bind(currency)
    .bind(charge_id)
    .fetch_one(pool)
    .await?;

    Ok(payment)
}

/// Refund a succeeded charge whose payment row could not be written.
///
/// Never returns an error: the insert failure is what the caller reports,
/// and the refund outcome is logged either way.
async fn compensate_unrecorded_charge(processor: &ProcessorClient, charge_id: &str) {
    match processor.refund_charge(charge_id).await {
        Ok(refund) => {
            tracing::warn!(
                "payment row for charge {} could not be written; refunded as {}",
                charge_id,
                refund.id
            );
        }
        Err(err) => {
            tracing::error!(
                "payment row for charge {} could not be written and the refund failed ({}); charge requires manual reconciliation",
                charge_id,
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_succeeded_charge_passes() {
        let charge = Charge {
            id: "ch_1".to_string(),
            status: "succeeded".to_string(),
        };
        assert!(ensure_succeeded(&charge).is_ok());
    }

    #[test]
    fn test_non_succeeded_charge_is_a_decline() {
        for status in ["pending", "failed", ""] {
            let charge = Charge {
                id: "ch_1".to_string(),
                status: status.to_string(),
            };
            let result = ensure_succeeded(&charge);
            assert!(matches!(result, Err(AppError::CardDeclined(_))));
        }
    }

    #[test]
    fn test_charge_description_includes_payer_email() {
        assert_eq!(
            charge_description("ada@example.com"),
            "Charge for ada@example.com"
        );
    }
}

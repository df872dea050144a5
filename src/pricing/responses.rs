//! Response DTOs: the computed totals as handed back to the caller.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{InvariantViolation, PricingError};
use crate::pricing::calculators::round_money;
use crate::pricing::reconciler::ReservationAdjustment;
use crate::pricing::summary::QuoteOutcome;

/// Money value for JSON responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount: round_money(amount, 2),
            currency: currency.to_string(),
        }
    }
}

/// Original vs. adjusted totals for booking-derived drafts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationAdjustmentResponse {
    pub client_final_total: MoneyResponse,
    pub adjusted_total: MoneyResponse,
    pub difference: MoneyResponse,
    pub reserved_payment_total: MoneyResponse,
}

impl ReservationAdjustmentResponse {
    fn new(adjustment: &ReservationAdjustment, currency: &str) -> Self {
        Self {
            client_final_total: MoneyResponse::new(adjustment.client_final_total, currency),
            adjusted_total: MoneyResponse::new(adjustment.adjusted_total, currency),
            difference: MoneyResponse::new(adjustment.difference, currency),
            reserved_payment_total: MoneyResponse::new(adjustment.reserved_payment_total, currency),
        }
    }
}

/// Response for a quote. Every figure is zero while `pending_reason` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub gross_total: MoneyResponse,
    pub venue_inclusions_total: MoneyResponse,
    pub provider_components_total: MoneyResponse,
    pub final_payable_total: MoneyResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<ReservationAdjustmentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invariant_violation: Option<InvariantViolation>,
}

impl QuoteResponse {
    pub fn from_outcome(outcome: &QuoteOutcome, currency: &str) -> Self {
        match outcome {
            QuoteOutcome::Ready(quote) => {
                let gross_total = MoneyResponse::new(quote.gross_total, currency);
                let venue_inclusions_total =
                    MoneyResponse::new(quote.venue_inclusions_total, currency);
                // Provider figure is the remainder of the rounded figures, so the two
                // sub-totals on the wire still add up to the gross total.
                let provider_components_total = gross_total
                    .amount
                    .checked_sub(venue_inclusions_total.amount)
                    .map(|amount| MoneyResponse::new(amount, currency))
                    .unwrap_or_else(|| {
                        MoneyResponse::new(quote.provider_components_total, currency)
                    });

                Self {
                    gross_total,
                    venue_inclusions_total,
                    provider_components_total,
                    final_payable_total: MoneyResponse::new(quote.final_payable_total, currency),
                    pending_reason: None,
                    reservation: quote
                        .reservation
                        .as_ref()
                        .map(|r| ReservationAdjustmentResponse::new(r, currency)),
                    invariant_violation: quote.invariant_violation.clone(),
                }
            }
            QuoteOutcome::Pending(reason) => {
                let zero = MoneyResponse::new(Decimal::ZERO, currency);
                Self {
                    gross_total: zero.clone(),
                    venue_inclusions_total: zero.clone(),
                    provider_components_total: zero.clone(),
                    final_payable_total: zero,
                    pending_reason: Some(reason.to_string()),
                    reservation: None,
                    invariant_violation: None,
                }
            }
        }
    }
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
}

impl From<&PricingError> for PricingErrorResponse {
    fn from(err: &PricingError) -> Self {
        let error_type = match err {
            PricingError::Validation(_) => "validation_error",
            PricingError::Serialization(_) => "malformed_request",
        };
        Self {
            error_type: error_type.to_string(),
            message: err.to_string(),
        }
    }
}

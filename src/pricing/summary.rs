//! Summary projection and the full pricing pipeline.
//!
//! All sub-totals are derived from the same [`GrossBreakdown`] in one pass, so
//! `venue_inclusions_total + provider_components_total == gross_total` holds by
//! construction and `final_payable_total` is always the reconciled figure.

use rust_decimal::Decimal;

use crate::error::{InvariantViolation, ValidationError};
use crate::pricing::aggregator::{
    compute_gross_total, GrossBreakdown, GrossTotal, PendingReason, PricingTerms,
};
use crate::pricing::models::EventDraft;
use crate::pricing::reconciler::{reconcile, ReservationAdjustment};

/// Computed totals for a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub gross_total: Decimal,
    pub venue_inclusions_total: Decimal,
    pub provider_components_total: Decimal,
    pub final_payable_total: Decimal,
    pub reservation: Option<ReservationAdjustment>,
    pub invariant_violation: Option<InvariantViolation>,
}

impl Quote {
    fn zeroed(violation: InvariantViolation) -> Self {
        Self {
            gross_total: Decimal::ZERO,
            venue_inclusions_total: Decimal::ZERO,
            provider_components_total: Decimal::ZERO,
            final_payable_total: Decimal::ZERO,
            reservation: None,
            invariant_violation: Some(violation),
        }
    }
}

/// Result of running the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteOutcome {
    Ready(Quote),
    /// Required package data has not arrived; no figure is shown.
    Pending(PendingReason),
}

impl QuoteOutcome {
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            QuoteOutcome::Ready(quote) => Some(quote),
            QuoteOutcome::Pending(_) => None,
        }
    }

    pub fn pending_reason(&self) -> Option<PendingReason> {
        match self {
            QuoteOutcome::Ready(_) => None,
            QuoteOutcome::Pending(reason) => Some(*reason),
        }
    }
}

/// Venue-inclusion sub-total: the overage in package mode, the venue item otherwise.
pub fn venue_inclusions_total(breakdown: &GrossBreakdown) -> Decimal {
    match &breakdown.terms {
        PricingTerms::Package(terms) => terms.overage(),
        PricingTerms::Scratch(terms) => terms.venue_total,
    }
}

/// Provider/component sub-total: everything in the gross total that is not venue inclusion.
pub fn provider_components_total(breakdown: &GrossBreakdown) -> Decimal {
    match &breakdown.terms {
        PricingTerms::Package(terms) => terms.components_total,
        PricingTerms::Scratch(terms) => terms.components_total,
    }
}

/// Run the full pipeline on a draft snapshot.
///
/// Pure and idempotent: the same draft always yields the same outcome.
pub fn quote_draft(draft: &EventDraft) -> Result<QuoteOutcome, ValidationError> {
    draft.validate()?;

    let venue_items = draft.venue_inclusion_count();
    if venue_items > 1 {
        let violation = InvariantViolation::MultipleVenueInclusions { count: venue_items };
        tracing::error!(%violation, "invariant violated, quoting zero");
        return Ok(QuoteOutcome::Ready(Quote::zeroed(violation)));
    }

    let breakdown = match compute_gross_total(draft)? {
        GrossTotal::Ready(breakdown) => breakdown,
        GrossTotal::Pending(reason) => {
            tracing::warn!(%reason, "quote pending");
            return Ok(QuoteOutcome::Pending(reason));
        }
    };

    let gross_total = breakdown.gross_total;
    let mut final_payable_total = reconcile(
        gross_total,
        draft.reservation.as_ref(),
        draft.is_booking_derived(),
    )?;

    let mut invariant_violation = None;
    if final_payable_total < Decimal::ZERO {
        let violation = InvariantViolation::NegativeBalance {
            amount: final_payable_total,
        };
        tracing::error!(%violation, %gross_total, "invariant violated, final payable set to zero");
        final_payable_total = Decimal::ZERO;
        invariant_violation = Some(violation);
    }

    let reservation = draft
        .reservation
        .as_ref()
        .map(|r| ReservationAdjustment::new(r, gross_total))
        .transpose()?;

    Ok(QuoteOutcome::Ready(Quote {
        gross_total,
        venue_inclusions_total: venue_inclusions_total(&breakdown),
        provider_components_total: provider_components_total(&breakdown),
        final_payable_total,
        reservation,
        invariant_violation,
    }))
}

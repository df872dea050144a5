//! Deposit reconciliation for drafts that descend from a prior booking.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::pricing::calculators::sub_money;
use crate::pricing::models::ReservationContext;

/// Guest count used for venue pricing once a deposit has been taken.
///
/// A locked reservation never prices below its reserved guest count, so shrinking
/// the party after paying cannot refund fees already collected. Growing it
/// prices at the new, larger count.
pub fn effective_guest_count(guest_count: u32, reservation: Option<&ReservationContext>) -> u32 {
    match reservation {
        Some(r) if r.locks_guest_count() => guest_count.max(r.reserved_guest_count),
        _ => guest_count,
    }
}

/// Credit the collected deposit against the gross total.
///
/// The result is not clamped. A negative remainder means the gross total is
/// inconsistent and is flagged by the summary stage.
pub fn reconcile(
    gross_total: Decimal,
    reservation: Option<&ReservationContext>,
    is_booking_derived: bool,
) -> Result<Decimal, ValidationError> {
    if !is_booking_derived {
        return Ok(gross_total);
    }

    let deposit = reservation
        .map(|r| r.reserved_payment_total)
        .unwrap_or(Decimal::ZERO);

    tracing::debug!(%gross_total, %deposit, "crediting reservation deposit");
    sub_money("final_payable_total", gross_total, deposit)
}

/// Original agreed total next to the recomputed one, for "original vs. adjusted" display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationAdjustment {
    pub client_final_total: Decimal,
    /// Gross total captured before the deposit is credited.
    pub adjusted_total: Decimal,
    pub difference: Decimal,
    pub reserved_payment_total: Decimal,
}

impl ReservationAdjustment {
    pub fn new(
        reservation: &ReservationContext,
        gross_total: Decimal,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            client_final_total: reservation.client_final_total,
            adjusted_total: gross_total,
            difference: sub_money(
                "reservation.difference",
                gross_total,
                reservation.client_final_total,
            )?,
            reserved_payment_total: reservation.reserved_payment_total,
        })
    }
}

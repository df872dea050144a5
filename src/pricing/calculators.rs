//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no draft mutation, no I/O.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::pricing::models::VenueRecord;

/// Guests covered by a venue's base price in a from-scratch build.
pub const FREE_GUEST_THRESHOLD: u32 = 100;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use event_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Reject a negative amount, naming the offending field.
pub fn ensure_non_negative(field: &str, amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::negative(field, amount));
    }
    Ok(amount)
}

/// `a + b`, or `AmountOutOfRange` naming `field` when the sum does not fit a `Decimal`.
pub fn add_money(field: &str, a: Decimal, b: Decimal) -> Result<Decimal, ValidationError> {
    a.checked_add(b).ok_or_else(|| ValidationError::out_of_range(field))
}

pub fn sub_money(field: &str, a: Decimal, b: Decimal) -> Result<Decimal, ValidationError> {
    a.checked_sub(b).ok_or_else(|| ValidationError::out_of_range(field))
}

/// Per-guest rate times a head count.
pub fn per_guest_cost(
    field: &str,
    rate: Decimal,
    guests: u32,
) -> Result<Decimal, ValidationError> {
    rate.checked_mul(Decimal::from(guests))
        .ok_or_else(|| ValidationError::out_of_range(field))
}

/// Breakdown of venue overage against a package's buffer fee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueOverageResult {
    pub guest_count: u32,
    pub actual_venue_cost: Decimal,
    pub buffer_fee: Decimal,
    /// Never negative: a buffer larger than the venue cost is not refunded.
    pub overage: Decimal,
}

/// Calculate the venue cost not already absorbed into the package price.
///
/// `guest_count` is taken as given; the guest-count lock is applied by the caller
/// (see `reconciler::effective_guest_count`).
pub fn compute_venue_overage(
    venue: &VenueRecord,
    guest_count: u32,
    buffer_fee: Decimal,
) -> Result<VenueOverageResult, ValidationError> {
    let rate = ensure_non_negative("venue.per_guest_overage_rate", venue.per_guest_overage_rate)?;
    let buffer_fee = ensure_non_negative("package.venue_buffer_fee", buffer_fee)?;

    let actual_venue_cost = per_guest_cost("venue.actual_venue_cost", rate, guest_count)?;
    // Both operands are non-negative, so the difference cannot overflow.
    let overage = (actual_venue_cost - buffer_fee).max(Decimal::ZERO);

    Ok(VenueOverageResult {
        guest_count,
        actual_venue_cost,
        buffer_fee,
        overage,
    })
}

/// Breakdown of a venue's price in a from-scratch build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchVenuePrice {
    pub base_price: Decimal,
    pub extra_guests: u32,
    pub overage: Decimal,
    pub total: Decimal,
}

/// Price a venue without a package: base price covers the first
/// [`FREE_GUEST_THRESHOLD`] guests, every guest beyond pays the overage rate.
pub fn scratch_venue_price(
    venue: &VenueRecord,
    guest_count: u32,
) -> Result<ScratchVenuePrice, ValidationError> {
    let base_price = ensure_non_negative("venue.base_price", venue.base_price)?;
    let rate = ensure_non_negative("venue.per_guest_overage_rate", venue.per_guest_overage_rate)?;

    let extra_guests = guest_count.saturating_sub(FREE_GUEST_THRESHOLD);
    let overage = per_guest_cost("venue.overage", rate, extra_guests)?;

    Ok(ScratchVenuePrice {
        base_price,
        extra_guests,
        overage,
        total: add_money("venue.total", base_price, overage)?,
    })
}

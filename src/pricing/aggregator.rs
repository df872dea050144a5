//! Budget aggregation: base package price, venue overage and line-item deltas
//! combined into the gross total.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ValidationError;
use crate::pricing::calculators::{
    add_money, compute_venue_overage, sub_money, VenueOverageResult,
};
use crate::pricing::models::{Category, EventDraft, LineItem};
use crate::pricing::reconciler::effective_guest_count;

/// Why a total cannot be computed yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingReason {
    /// Package selected, venue buffer fee still loading.
    BufferFeeNotLoaded,
    /// Package selected, base price still loading.
    BasePriceNotLoaded,
}

impl fmt::Display for PendingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingReason::BufferFeeNotLoaded => {
                f.write_str("Waiting for the package venue buffer fee to load")
            }
            PendingReason::BasePriceNotLoaded => {
                f.write_str("Waiting for the package base price to load")
            }
        }
    }
}

/// Pricing terms for a draft with a package selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTerms {
    pub base_price: Decimal,
    /// `None` when no venue is selected.
    pub venue_overage: Option<VenueOverageResult>,
    /// Sum of opted-out package inclusions.
    pub opted_out_total: Decimal,
    /// Sum of included items outside the package and the venue category.
    pub additions_total: Decimal,
    /// Package price after opt-outs, plus non-venue additions.
    pub components_total: Decimal,
}

impl PackageTerms {
    pub fn overage(&self) -> Decimal {
        self.venue_overage
            .as_ref()
            .map(|o| o.overage)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Pricing terms for a from-scratch build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchTerms {
    /// Included venue inclusion item(s).
    pub venue_total: Decimal,
    /// Every other included item.
    pub components_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingTerms {
    Package(PackageTerms),
    Scratch(ScratchTerms),
}

/// Gross total with the terms it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrossBreakdown {
    pub terms: PricingTerms,
    pub gross_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrossTotal {
    Ready(GrossBreakdown),
    Pending(PendingReason),
}

impl GrossTotal {
    /// The gross figure, `0` while pending.
    pub fn amount(&self) -> Decimal {
        match self {
            GrossTotal::Ready(breakdown) => breakdown.gross_total,
            GrossTotal::Pending(_) => Decimal::ZERO,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, GrossTotal::Pending(_))
    }
}

/// Compute the gross total before any deposit is credited.
pub fn compute_gross_total(draft: &EventDraft) -> Result<GrossTotal, ValidationError> {
    let terms = match &draft.package {
        Some(package) => {
            let Some(buffer_fee) = package.venue_buffer_fee else {
                return Ok(GrossTotal::Pending(PendingReason::BufferFeeNotLoaded));
            };
            let Some(base_price) = package.base_price else {
                return Ok(GrossTotal::Pending(PendingReason::BasePriceNotLoaded));
            };

            let venue_overage = match &draft.venue {
                Some(venue) => {
                    let guests = effective_guest_count(draft.guest_count, draft.reservation.as_ref());
                    Some(compute_venue_overage(venue, guests, buffer_fee)?)
                }
                None => None,
            };

            let opted_out_total = sum_prices(
                "package.opted_out_total",
                draft
                    .line_items
                    .iter()
                    .filter(|item| item.is_package_item() && !item.included),
            )?;
            let additions_total = sum_prices(
                "package.additions_total",
                draft.included_items().filter(|item| {
                    !matches!(item.category(), Category::Package | Category::Venue)
                }),
            )?;
            let components_total = add_money(
                "provider_components_total",
                sub_money("provider_components_total", base_price, opted_out_total)?,
                additions_total,
            )?;

            PricingTerms::Package(PackageTerms {
                base_price,
                venue_overage,
                opted_out_total,
                additions_total,
                components_total,
            })
        }
        None => PricingTerms::Scratch(ScratchTerms {
            venue_total: sum_prices(
                "venue_inclusions_total",
                draft.included_items().filter(|item| item.is_venue_inclusion()),
            )?,
            components_total: sum_prices(
                "provider_components_total",
                draft.included_items().filter(|item| !item.is_venue_inclusion()),
            )?,
        }),
    };

    let gross_total = match &terms {
        PricingTerms::Package(t) => add_money("gross_total", t.components_total, t.overage())?,
        PricingTerms::Scratch(t) => add_money("gross_total", t.venue_total, t.components_total)?,
    };

    tracing::debug!(%gross_total, package_mode = draft.is_package_mode(), "gross total computed");

    Ok(GrossTotal::Ready(GrossBreakdown { terms, gross_total }))
}

fn sum_prices<'a>(
    field: &str,
    mut items: impl Iterator<Item = &'a LineItem>,
) -> Result<Decimal, ValidationError> {
    items.try_fold(Decimal::ZERO, |total, item| add_money(field, total, item.price))
}

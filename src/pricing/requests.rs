//! Request DTOs: the draft snapshot as the surrounding application sends it.
//!
//! Fields are loosely typed here and tightened into [`EventDraft`] by `TryFrom`,
//! which is where malformed items are rejected. Amounts may be JSON numbers or
//! decimal strings.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ValidationError;
use crate::pricing::calculators::ensure_non_negative;
use crate::pricing::line_items::parse_guest_count;
use crate::pricing::models::{
    Category, EventDraft, LineItem, LineItemKind, PackageContext, ReservationContext, VenueRecord,
};

/// Draft snapshot
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraftRequest {
    #[serde(default)]
    pub line_items: Vec<LineItemRequest>,
    #[serde(default)]
    pub package: Option<PackageRequest>,
    #[serde(default)]
    pub venue: Option<VenueRequest>,
    #[serde(default)]
    pub reservation: Option<ReservationRequest>,
    pub guest_count: i64,
}

/// A line item in the request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    pub price: Decimal,
    #[serde(default = "default_included")]
    pub included: bool,
    #[serde(default)]
    pub is_venue_inclusion: bool,
}

fn default_included() -> bool {
    true
}

/// Selected package
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRequest {
    pub package_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_price: Option<Decimal>,
    #[serde(default)]
    pub venue_buffer_fee: Option<Decimal>,
}

/// Selected venue
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueRequest {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_price: Option<Decimal>,
    pub per_guest_overage_rate: Decimal,
}

/// Prior booking deposit
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub reserved_payment_total: Decimal,
    #[serde(default)]
    pub reserved_guest_count: i64,
    #[serde(default)]
    pub client_final_total: Option<Decimal>,
}

impl TryFrom<EventDraftRequest> for EventDraft {
    type Error = ValidationError;

    fn try_from(request: EventDraftRequest) -> Result<Self, Self::Error> {
        let venue = request.venue.map(VenueRecord::try_from).transpose()?;

        let line_items = request
            .line_items
            .into_iter()
            .enumerate()
            .map(|(i, item)| line_item(i, item, venue.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let package = request
            .package
            .map(|p| PackageContext {
                package_id: p.package_id,
                name: p.name,
                base_price: p.base_price,
                venue_buffer_fee: p.venue_buffer_fee,
            });

        let reservation = request
            .reservation
            .map(ReservationContext::try_from)
            .transpose()?;

        let draft = EventDraft {
            line_items,
            package,
            venue,
            reservation,
            guest_count: parse_guest_count(request.guest_count)?,
        };
        draft.validate()?;
        Ok(draft)
    }
}

impl TryFrom<VenueRequest> for VenueRecord {
    type Error = ValidationError;

    fn try_from(venue: VenueRequest) -> Result<Self, Self::Error> {
        Ok(VenueRecord {
            base_price: ensure_non_negative(
                "venue.basePrice",
                venue.base_price.unwrap_or(Decimal::ZERO),
            )?,
            per_guest_overage_rate: ensure_non_negative(
                "venue.perGuestOverageRate",
                venue.per_guest_overage_rate,
            )?,
            id: venue.id,
            name: venue.name,
        })
    }
}

impl TryFrom<ReservationRequest> for ReservationContext {
    type Error = ValidationError;

    fn try_from(reservation: ReservationRequest) -> Result<Self, Self::Error> {
        let reserved_guest_count = u32::try_from(reservation.reserved_guest_count)
            .map_err(|_| ValidationError::InvalidGuestCount(reservation.reserved_guest_count))?;

        Ok(ReservationContext {
            reserved_payment_total: ensure_non_negative(
                "reservation.reservedPaymentTotal",
                reservation.reserved_payment_total,
            )?,
            reserved_guest_count,
            client_final_total: ensure_non_negative(
                "reservation.clientFinalTotal",
                reservation.client_final_total.unwrap_or(Decimal::ZERO),
            )?,
        })
    }
}

fn line_item(
    index: usize,
    item: LineItemRequest,
    venue: Option<&VenueRecord>,
) -> Result<LineItem, ValidationError> {
    let id = item
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or(ValidationError::MissingField { field: "id" })?;
    let category: Category = item
        .category
        .as_deref()
        .ok_or(ValidationError::MissingField { field: "category" })?
        .parse()?;
    let price = ensure_non_negative(&format!("lineItems[{}].price", index), item.price)?;

    let kind = match (category, item.is_venue_inclusion) {
        (Category::Venue, true) => LineItemKind::VenueInclusion {
            venue_id: venue
                .map(|v| v.id.clone())
                .ok_or(ValidationError::MissingField { field: "venue" })?,
        },
        (Category::Venue, false) => LineItemKind::Venue,
        (other, true) => {
            return Err(ValidationError::InconsistentVenueFlag {
                id,
                category: other.to_string(),
            })
        }
        (Category::Package, false) => LineItemKind::Package,
        (Category::Extras, false) => LineItemKind::Extras,
        (Category::Custom, false) => LineItemKind::Custom,
    };

    Ok(LineItem {
        id,
        name: item.name,
        description: item.description,
        kind,
        price,
        included: item.included,
    })
}

//! Domain models for event draft pricing.
//!
//! An [`EventDraft`] is the full snapshot the pricing pipeline reads. It is owned
//! by the caller and mutated through the operations in `line_items` and `venue`.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Coarse category of a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Package,
    Venue,
    Extras,
    Custom,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Package => "package",
            Category::Venue => "venue",
            Category::Extras => "extras",
            Category::Custom => "custom",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "package" => Ok(Category::Package),
            "venue" => Ok(Category::Venue),
            "extras" => Ok(Category::Extras),
            "custom" => Ok(Category::Custom),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

/// What a line item is, and therefore which pricing rules apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineItemKind {
    /// Inclusion that came with the selected package. Opting out subtracts its price.
    Package,
    /// The synthetic item created by venue selection. At most one per draft.
    VenueInclusion { venue_id: String },
    /// Venue-category item entered by hand in a from-scratch build.
    Venue,
    /// Catalog add-on.
    Extras,
    /// Free-form item entered by the user.
    Custom,
}

impl LineItemKind {
    pub fn category(&self) -> Category {
        match self {
            LineItemKind::Package => Category::Package,
            LineItemKind::VenueInclusion { .. } | LineItemKind::Venue => Category::Venue,
            LineItemKind::Extras => Category::Extras,
            LineItemKind::Custom => Category::Custom,
        }
    }
}

/// One component of the event budget
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: LineItemKind,
    /// Face price, before any delta logic.
    pub price: Decimal,
    /// `false` means present but excluded from the total (package opt-outs).
    pub included: bool,
}

impl LineItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: LineItemKind,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind,
            price,
            included: true,
        }
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn is_venue_inclusion(&self) -> bool {
        matches!(self.kind, LineItemKind::VenueInclusion { .. })
    }

    pub fn is_package_item(&self) -> bool {
        matches!(self.kind, LineItemKind::Package)
    }
}

/// Venue as resolved by the venue catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VenueRecord {
    pub id: String,
    pub name: String,
    /// Rental price for the first 100 guests. Only used in from-scratch builds.
    #[serde(default)]
    pub base_price: Decimal,
    pub per_guest_overage_rate: Decimal,
}

/// Pricing of the selected package.
///
/// Both figures arrive from the package catalog and may still be loading
/// (`None`) right after the package is picked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageContext {
    pub package_id: String,
    #[serde(default)]
    pub name: String,
    pub base_price: Option<Decimal>,
    /// Venue cost already absorbed into `base_price`.
    pub venue_buffer_fee: Option<Decimal>,
}

/// Deposit collected against the upstream booking this draft came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationContext {
    pub reserved_payment_total: Decimal,
    /// Guest count at reservation time. `0` means not locked.
    #[serde(default)]
    pub reserved_guest_count: u32,
    /// Total the client agreed to at reservation time. Display only.
    #[serde(default)]
    pub client_final_total: Decimal,
}

impl ReservationContext {
    pub fn locks_guest_count(&self) -> bool {
        self.reserved_guest_count > 0
    }
}

/// Aggregate root: everything the pricing pipeline reads
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventDraft {
    pub line_items: Vec<LineItem>,
    pub package: Option<PackageContext>,
    pub venue: Option<VenueRecord>,
    pub reservation: Option<ReservationContext>,
    pub guest_count: u32,
}

impl EventDraft {
    /// An empty draft with a single guest
    pub fn new() -> Self {
        Self {
            line_items: Vec::new(),
            package: None,
            venue: None,
            reservation: None,
            guest_count: 1,
        }
    }

    pub fn is_package_mode(&self) -> bool {
        self.package.is_some()
    }

    pub fn is_booking_derived(&self) -> bool {
        self.reservation.is_some()
    }

    pub fn item(&self, id: &str) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.id == id)
    }

    pub fn venue_inclusion(&self) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.is_venue_inclusion())
    }

    pub fn venue_inclusion_count(&self) -> usize {
        self.line_items
            .iter()
            .filter(|item| item.is_venue_inclusion())
            .count()
    }

    pub fn included_items(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter().filter(|item| item.included)
    }
}

impl Default for EventDraft {
    fn default() -> Self {
        Self::new()
    }
}

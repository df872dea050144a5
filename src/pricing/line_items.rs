//! Line-item store: every mutation the caller can apply to an [`EventDraft`].
//!
//! Each operation leaves the draft self-consistent (venue item re-priced, at most
//! one venue inclusion) so the pipeline can run right after it returns.

use std::collections::HashSet;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::pricing::calculators::ensure_non_negative;
use crate::pricing::models::{
    EventDraft, LineItem, LineItemKind, PackageContext, ReservationContext,
};

/// A package inclusion as listed by the package catalog
#[derive(Debug, Clone)]
pub struct PackageInclusion {
    pub id: String,
    pub name: String,
    pub price: Decimal,
}

/// An item the user adds by hand
#[derive(Debug, Clone)]
pub struct NewLineItem {
    /// Generated when absent.
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub kind: LineItemKind,
    pub price: Decimal,
}

impl EventDraft {
    /// Select a package, replacing any previously selected one and all its inclusions.
    pub fn select_package(
        &mut self,
        package: PackageContext,
        inclusions: Vec<PackageInclusion>,
    ) -> Result<(), ValidationError> {
        validate_package(&package)?;

        let mut seen: HashSet<&str> = self
            .line_items
            .iter()
            .filter(|item| !item.is_package_item())
            .map(|item| item.id.as_str())
            .collect();
        for (i, inclusion) in inclusions.iter().enumerate() {
            if inclusion.id.trim().is_empty() {
                return Err(ValidationError::MissingField { field: "id" });
            }
            ensure_non_negative(&format!("inclusions[{}].price", i), inclusion.price)?;
            if !seen.insert(inclusion.id.as_str()) {
                return Err(ValidationError::DuplicateItemId(inclusion.id.clone()));
            }
        }

        tracing::info!(
            package_id = %package.package_id,
            inclusions = inclusions.len(),
            "package selected"
        );

        self.line_items.retain(|item| !item.is_package_item());
        self.line_items.extend(
            inclusions
                .into_iter()
                .map(|inc| LineItem::new(inc.id, inc.name, LineItemKind::Package, inc.price)),
        );
        self.package = Some(package);
        self.reprice_venue_item()
    }

    /// Fill in package pricing that arrived after the package was selected.
    ///
    /// `None` leaves the corresponding figure unchanged.
    pub fn load_package_pricing(
        &mut self,
        base_price: Option<Decimal>,
        venue_buffer_fee: Option<Decimal>,
    ) -> Result<(), ValidationError> {
        if let Some(base) = base_price {
            ensure_non_negative("package.base_price", base)?;
        }
        if let Some(buffer) = venue_buffer_fee {
            ensure_non_negative("package.venue_buffer_fee", buffer)?;
        }

        let package = self.package.as_mut().ok_or(ValidationError::NoPackageSelected)?;
        if base_price.is_some() {
            package.base_price = base_price;
        }
        if venue_buffer_fee.is_some() {
            package.venue_buffer_fee = venue_buffer_fee;
        }
        self.reprice_venue_item()
    }

    /// Drop the package and its inclusions, switching the draft to a from-scratch build.
    pub fn clear_package(&mut self) -> Result<(), ValidationError> {
        if self.package.take().is_none() {
            return Ok(());
        }
        self.line_items.retain(|item| !item.is_package_item());
        tracing::info!("package cleared");
        self.reprice_venue_item()
    }

    /// Add a custom, extras or hand-entered venue item. Returns its id.
    pub fn add_item(&mut self, new_item: NewLineItem) -> Result<String, ValidationError> {
        match new_item.kind {
            LineItemKind::Package => return Err(ValidationError::ManagedItemKind("package")),
            LineItemKind::VenueInclusion { .. } => {
                return Err(ValidationError::ManagedItemKind("venue_inclusion"))
            }
            LineItemKind::Venue | LineItemKind::Extras | LineItemKind::Custom => {}
        }
        ensure_non_negative("price", new_item.price)?;

        let id = match new_item.id {
            Some(id) if id.trim().is_empty() => {
                return Err(ValidationError::MissingField { field: "id" })
            }
            Some(id) => id,
            None => Uuid::new_v4().to_string(),
        };
        if self.item(&id).is_some() {
            return Err(ValidationError::DuplicateItemId(id));
        }

        let mut item = LineItem::new(id.clone(), new_item.name, new_item.kind, new_item.price);
        item.description = new_item.description;
        self.line_items.push(item);
        Ok(id)
    }

    /// Opt a package inclusion in or out.
    pub fn set_included(&mut self, id: &str, included: bool) -> Result<(), ValidationError> {
        let item = self
            .line_items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| ValidationError::ItemNotFound(id.to_string()))?;

        if !item.is_package_item() {
            return Err(ValidationError::NotToggleable {
                id: id.to_string(),
                category: item.category().to_string(),
            });
        }
        item.included = included;
        Ok(())
    }

    /// Remove a non-package item. Removing the venue inclusion clears the venue.
    pub fn remove_item(&mut self, id: &str) -> Result<LineItem, ValidationError> {
        let index = self
            .line_items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| ValidationError::ItemNotFound(id.to_string()))?;

        if self.line_items[index].is_package_item() {
            return Err(ValidationError::NotRemovable { id: id.to_string() });
        }

        let removed = self.line_items.remove(index);
        if removed.is_venue_inclusion() {
            self.clear_venue();
        }
        Ok(removed)
    }

    /// Change the guest count and re-price the venue item.
    pub fn set_guest_count(&mut self, guest_count: i64) -> Result<(), ValidationError> {
        self.guest_count = parse_guest_count(guest_count)?;
        self.reprice_venue_item()
    }

    /// Mark the draft as descending from a booking with a collected deposit.
    pub fn attach_reservation(
        &mut self,
        reservation: ReservationContext,
    ) -> Result<(), ValidationError> {
        validate_reservation(&reservation)?;
        self.reservation = Some(reservation);
        self.reprice_venue_item()
    }

    pub fn detach_reservation(&mut self) -> Result<(), ValidationError> {
        self.reservation = None;
        self.reprice_venue_item()
    }

    /// Check the draft for structurally invalid input.
    ///
    /// More than one venue inclusion is not a validation failure; the pipeline
    /// reports it as an invariant violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.guest_count < 1 {
            return Err(ValidationError::InvalidGuestCount(i64::from(self.guest_count)));
        }

        let mut seen = HashSet::with_capacity(self.line_items.len());
        for (i, item) in self.line_items.iter().enumerate() {
            if item.id.trim().is_empty() {
                return Err(ValidationError::MissingField { field: "id" });
            }
            if !seen.insert(item.id.as_str()) {
                return Err(ValidationError::DuplicateItemId(item.id.clone()));
            }
            ensure_non_negative(&format!("line_items[{}].price", i), item.price)?;
        }

        if let Some(package) = &self.package {
            validate_package(package)?;
        }
        if let Some(venue) = &self.venue {
            ensure_non_negative("venue.base_price", venue.base_price)?;
            ensure_non_negative("venue.per_guest_overage_rate", venue.per_guest_overage_rate)?;
        }
        if let Some(reservation) = &self.reservation {
            validate_reservation(reservation)?;
        }
        Ok(())
    }
}

/// Guest counts arrive as signed integers from forms.
pub fn parse_guest_count(guest_count: i64) -> Result<u32, ValidationError> {
    u32::try_from(guest_count)
        .ok()
        .filter(|count| *count >= 1)
        .ok_or(ValidationError::InvalidGuestCount(guest_count))
}

fn validate_package(package: &PackageContext) -> Result<(), ValidationError> {
    if let Some(base) = package.base_price {
        ensure_non_negative("package.base_price", base)?;
    }
    if let Some(buffer) = package.venue_buffer_fee {
        ensure_non_negative("package.venue_buffer_fee", buffer)?;
    }
    Ok(())
}

fn validate_reservation(reservation: &ReservationContext) -> Result<(), ValidationError> {
    ensure_non_negative("reservation.reserved_payment_total", reservation.reserved_payment_total)?;
    ensure_non_negative("reservation.client_final_total", reservation.client_final_total)?;
    Ok(())
}

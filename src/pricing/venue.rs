//! Venue selection pricer.
//!
//! Runs when a venue is picked (and whenever guest count, package or reservation
//! change afterwards), producing the single venue inclusion line item.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::pricing::calculators::{
    compute_venue_overage, round_money, scratch_venue_price, FREE_GUEST_THRESHOLD,
};
use crate::pricing::models::{EventDraft, LineItem, LineItemKind, VenueRecord};
use crate::pricing::reconciler::effective_guest_count;

const VENUE_ITEM_PREFIX: &str = "venue-inclusion:";

impl EventDraft {
    /// Select a venue, replacing the previous venue item if there was one.
    pub fn select_venue(&mut self, venue: VenueRecord) -> Result<(), ValidationError> {
        let item = venue_line_item(self, &venue)?;
        tracing::info!(
            venue_id = %venue.id,
            package_mode = self.is_package_mode(),
            price = %item.price,
            "venue selected"
        );
        self.install_venue_item(item);
        self.venue = Some(venue);
        Ok(())
    }

    /// Remove the venue and its line item.
    pub fn clear_venue(&mut self) {
        self.line_items.retain(|item| !item.is_venue_inclusion());
        self.venue = None;
    }

    /// Rebuild the venue item from the current draft state.
    pub(crate) fn reprice_venue_item(&mut self) -> Result<(), ValidationError> {
        let Some(venue) = self.venue.as_ref() else {
            return Ok(());
        };
        let item = venue_line_item(self, venue)?;
        self.install_venue_item(item);
        Ok(())
    }

    /// Put `item` where the previous venue item was, dropping every existing one.
    fn install_venue_item(&mut self, item: LineItem) {
        let position = self.line_items.iter().position(LineItem::is_venue_inclusion);
        self.line_items.retain(|existing| !existing.is_venue_inclusion());
        match position {
            Some(index) => self.line_items.insert(index, item),
            None => self.line_items.push(item),
        }
    }
}

/// Build the venue inclusion item for `venue` under the draft's current mode.
///
/// Package mode: price `0`, the real cost flows through the overage calculation;
/// the description spells out buffer fee, venue cost and the net additional fee.
/// From-scratch mode: price is base price plus overage beyond the free threshold.
pub fn venue_line_item(
    draft: &EventDraft,
    venue: &VenueRecord,
) -> Result<LineItem, ValidationError> {
    let guests = effective_guest_count(draft.guest_count, draft.reservation.as_ref());

    let (price, description) = match &draft.package {
        Some(package) => match package.venue_buffer_fee {
            Some(buffer_fee) => {
                let overage = compute_venue_overage(venue, guests, buffer_fee)?;
                let description = format!(
                    "Venue cost for {} guests at {}/guest: {}. Covered by package: {}. Additional fee: {}",
                    guests,
                    money(venue.per_guest_overage_rate),
                    money(overage.actual_venue_cost),
                    money(overage.buffer_fee),
                    money(overage.overage),
                );
                (Decimal::ZERO, description)
            }
            None => {
                // Still validates the rate; the buffer is unknown so no fee is quoted.
                let cost = compute_venue_overage(venue, guests, Decimal::ZERO)?;
                let description = format!(
                    "Venue cost for {} guests at {}/guest: {}. Additional fee pending package pricing",
                    guests,
                    money(venue.per_guest_overage_rate),
                    money(cost.actual_venue_cost),
                );
                (Decimal::ZERO, description)
            }
        },
        None => {
            let priced = scratch_venue_price(venue, guests)?;
            let description = format!(
                "Base price for up to {} guests: {}. Extra guests: {} at {}/guest: {}",
                FREE_GUEST_THRESHOLD,
                money(priced.base_price),
                priced.extra_guests,
                money(venue.per_guest_overage_rate),
                money(priced.overage),
            );
            (priced.total, description)
        }
    };

    let mut item = LineItem::new(
        format!("{}{}", VENUE_ITEM_PREFIX, venue.id),
        venue.name.clone(),
        LineItemKind::VenueInclusion {
            venue_id: venue.id.clone(),
        },
        price,
    );
    item.description = description;
    Ok(item)
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount, 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::line_items::NewLineItem;
    use crate::pricing::models::{PackageContext, ReservationContext};
    use rust_decimal_macros::dec;

    fn garden() -> VenueRecord {
        VenueRecord {
            id: "garden".to_string(),
            name: "Garden Hall".to_string(),
            base_price: dec!(25000),
            per_guest_overage_rate: dec!(200),
        }
    }

    fn ballroom() -> VenueRecord {
        VenueRecord {
            id: "ballroom".to_string(),
            name: "Grand Ballroom".to_string(),
            base_price: dec!(40000),
            per_guest_overage_rate: dec!(300),
        }
    }

    fn package_draft(buffer: Option<Decimal>) -> EventDraft {
        let mut draft = EventDraft::new();
        draft
            .select_package(
                PackageContext {
                    package_id: "gold".to_string(),
                    name: "Gold".to_string(),
                    base_price: Some(dec!(50000)),
                    venue_buffer_fee: buffer,
                },
                vec![],
            )
            .unwrap();
        draft
    }

    #[test]
    fn test_package_mode_venue_item_is_display_only() {
        let mut draft = package_draft(Some(dec!(10000)));
        draft.set_guest_count(150).unwrap();
        draft.select_venue(garden()).unwrap();

        let item = draft.venue_inclusion().unwrap();
        assert_eq!(item.price, dec!(0));
        assert!(item.description.contains("30000.00"));
        assert!(item.description.contains("10000.00"));
        assert!(item.description.contains("Additional fee: 20000.00"));
    }

    #[test]
    fn test_package_mode_without_buffer_describes_pending() {
        let mut draft = package_draft(None);
        draft.select_venue(garden()).unwrap();
        let item = draft.venue_inclusion().unwrap();
        assert_eq!(item.price, dec!(0));
        assert!(item.description.contains("pending"));
    }

    #[test]
    fn test_scratch_mode_venue_price() {
        let mut draft = EventDraft::new();
        draft.set_guest_count(120).unwrap();
        draft.select_venue(garden()).unwrap();
        // 25000 + 20 * 200
        assert_eq!(draft.venue_inclusion().unwrap().price, dec!(29000));
    }

    #[test]
    fn test_replacing_venue_keeps_single_item() {
        let mut draft = EventDraft::new();
        draft
            .add_item(NewLineItem {
                id: Some("cake".to_string()),
                name: "Cake".to_string(),
                description: String::new(),
                kind: LineItemKind::Custom,
                price: dec!(5000),
            })
            .unwrap();
        draft.select_venue(garden()).unwrap();
        draft.select_venue(ballroom()).unwrap();
        draft.select_venue(garden()).unwrap();

        assert_eq!(draft.venue_inclusion_count(), 1);
        assert_eq!(draft.line_items.len(), 2);
        assert_eq!(draft.venue.as_ref().unwrap().id, "garden");
    }

    #[test]
    fn test_guest_count_change_reprices_scratch_venue() {
        let mut draft = EventDraft::new();
        draft.select_venue(garden()).unwrap();
        assert_eq!(draft.venue_inclusion().unwrap().price, dec!(25000));

        draft.set_guest_count(110).unwrap();
        assert_eq!(draft.venue_inclusion().unwrap().price, dec!(27000));
    }

    #[test]
    fn test_reservation_lock_applies_to_scratch_venue() {
        let mut draft = EventDraft::new();
        draft.set_guest_count(130).unwrap();
        draft.select_venue(garden()).unwrap();
        draft
            .attach_reservation(ReservationContext {
                reserved_payment_total: dec!(5000),
                reserved_guest_count: 130,
                client_final_total: dec!(31000),
            })
            .unwrap();

        draft.set_guest_count(90).unwrap();
        // Still priced for 130 guests.
        assert_eq!(draft.venue_inclusion().unwrap().price, dec!(31000));
    }

    #[test]
    fn test_clearing_package_reprices_venue_for_scratch() {
        let mut draft = package_draft(Some(dec!(10000)));
        draft.select_venue(garden()).unwrap();
        assert_eq!(draft.venue_inclusion().unwrap().price, dec!(0));

        draft.clear_package().unwrap();
        assert_eq!(draft.venue_inclusion().unwrap().price, dec!(25000));
    }

    #[test]
    fn test_remove_venue_item_clears_venue() {
        let mut draft = EventDraft::new();
        draft.select_venue(garden()).unwrap();
        let id = draft.venue_inclusion().unwrap().id.clone();
        draft.remove_item(&id).unwrap();
        assert!(draft.venue.is_none());
        assert_eq!(draft.venue_inclusion_count(), 0);
    }

    #[test]
    fn test_select_venue_rejects_negative_rate() {
        let mut draft = EventDraft::new();
        let mut venue = garden();
        venue.per_guest_overage_rate = dec!(-10);
        assert!(draft.select_venue(venue).is_err());
        assert!(draft.venue.is_none());
    }
}

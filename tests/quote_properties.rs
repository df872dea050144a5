//! Properties that must hold for every draft the line-item store can produce.

use event_pricing::pricing::{
    quote_draft, EventDraft, LineItemKind, NewLineItem, PackageContext, PackageInclusion,
    QuoteOutcome, ReservationContext, VenueRecord,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn money() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn venue_record() -> impl Strategy<Value = VenueRecord> {
    ("[a-z]{1,6}", money(), (0i64..50_000).prop_map(|c| Decimal::new(c, 2))).prop_map(
        |(id, base_price, rate)| VenueRecord {
            name: id.to_uppercase(),
            id,
            base_price,
            per_guest_overage_rate: rate,
        },
    )
}

fn added_kind() -> impl Strategy<Value = LineItemKind> {
    prop_oneof![
        Just(LineItemKind::Custom),
        Just(LineItemKind::Extras),
        Just(LineItemKind::Venue),
    ]
}

#[derive(Debug, Clone)]
struct DraftSpec {
    guests: i64,
    package: Option<(Decimal, Decimal)>,
    inclusions: Vec<(Decimal, bool)>,
    added: Vec<(LineItemKind, Decimal)>,
    venue: Option<VenueRecord>,
    reservation: Option<(Decimal, u32)>,
}

prop_compose! {
    fn draft_spec()(
        guests in 1i64..400,
        package in proptest::option::of((money(), money())),
        inclusions in proptest::collection::vec((money(), any::<bool>()), 0..5),
        added in proptest::collection::vec((added_kind(), money()), 0..5),
        venue in proptest::option::of(venue_record()),
        reservation in proptest::option::of((money(), 0u32..400)),
    ) -> DraftSpec {
        DraftSpec { guests, package, inclusions, added, venue, reservation }
    }
}

fn build(spec: &DraftSpec) -> EventDraft {
    let mut draft = EventDraft::new();
    draft.set_guest_count(spec.guests).unwrap();

    if let Some((base, buffer)) = spec.package {
        let inclusions = spec
            .inclusions
            .iter()
            .enumerate()
            .map(|(i, (price, _))| PackageInclusion {
                id: format!("pkg-{i}"),
                name: format!("Inclusion {i}"),
                price: *price,
            })
            .collect();
        draft
            .select_package(
                PackageContext {
                    package_id: "pkg".to_string(),
                    name: "Package".to_string(),
                    base_price: Some(base),
                    venue_buffer_fee: Some(buffer),
                },
                inclusions,
            )
            .unwrap();
        for (i, (_, included)) in spec.inclusions.iter().enumerate() {
            draft.set_included(&format!("pkg-{i}"), *included).unwrap();
        }
    }

    for (i, (kind, price)) in spec.added.iter().enumerate() {
        draft
            .add_item(NewLineItem {
                id: Some(format!("item-{i}")),
                name: format!("Item {i}"),
                description: String::new(),
                kind: kind.clone(),
                price: *price,
            })
            .unwrap();
    }

    if let Some(venue) = &spec.venue {
        draft.select_venue(venue.clone()).unwrap();
    }
    if let Some((paid, locked)) = spec.reservation {
        draft
            .attach_reservation(ReservationContext {
                reserved_payment_total: paid,
                reserved_guest_count: locked,
                client_final_total: Decimal::ZERO,
            })
            .unwrap();
    }
    draft
}

fn gross(draft: &EventDraft) -> Decimal {
    match quote_draft(draft).unwrap() {
        QuoteOutcome::Ready(quote) => quote.gross_total,
        QuoteOutcome::Pending(reason) => panic!("unexpected pending: {reason}"),
    }
}

proptest! {
    #[test]
    fn prop_quote_is_idempotent(spec in draft_spec()) {
        let draft = build(&spec);
        let first = quote_draft(&draft).unwrap();
        let second = quote_draft(&draft).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_at_most_one_venue_item(
        spec in draft_spec(),
        venues in proptest::collection::vec(venue_record(), 1..6),
        guest_changes in proptest::collection::vec(1i64..400, 0..4),
    ) {
        let mut draft = build(&spec);
        for venue in venues {
            draft.select_venue(venue).unwrap();
            prop_assert!(draft.venue_inclusion_count() <= 1);
        }
        for guests in guest_changes {
            draft.set_guest_count(guests).unwrap();
            prop_assert!(draft.venue_inclusion_count() <= 1);
        }
        prop_assert_eq!(draft.venue_inclusion_count(), 1);
    }

    #[test]
    fn prop_guest_count_lock(
        base in money(),
        buffer in money(),
        venue in venue_record(),
        locked in 1u32..400,
        shrink in 0u32..400,
    ) {
        let guests = locked.saturating_sub(shrink).max(1);
        let spec = DraftSpec {
            guests: i64::from(guests),
            package: Some((base, buffer)),
            inclusions: vec![],
            added: vec![],
            venue: Some(venue.clone()),
            reservation: Some((Decimal::ZERO, locked)),
        };
        let draft = build(&spec);

        let locked_overage = (venue.per_guest_overage_rate * Decimal::from(locked) - buffer)
            .max(Decimal::ZERO);
        prop_assert_eq!(gross(&draft), base + locked_overage);
    }

    #[test]
    fn prop_package_toggle_conserves_total(spec in draft_spec(), pick in any::<prop::sample::Index>()) {
        prop_assume!(spec.package.is_some() && !spec.inclusions.is_empty());
        let mut draft = build(&spec);
        let id = format!("pkg-{}", pick.index(spec.inclusions.len()));
        let included = draft.item(&id).unwrap().included;
        let before = gross(&draft);

        draft.set_included(&id, !included).unwrap();
        draft.set_included(&id, included).unwrap();

        prop_assert_eq!(gross(&draft), before);
    }

    #[test]
    fn prop_subtotals_sum_to_gross(spec in draft_spec()) {
        let draft = build(&spec);
        if let QuoteOutcome::Ready(quote) = quote_draft(&draft).unwrap() {
            prop_assert_eq!(
                quote.venue_inclusions_total + quote.provider_components_total,
                quote.gross_total
            );
            prop_assert!(quote.final_payable_total >= Decimal::ZERO);
        }
    }
}

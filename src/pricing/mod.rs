//! Pricing engine for event drafts.
//!
//! The pipeline runs one way over an [`EventDraft`] snapshot:
//! line items -> venue overage -> gross total -> deposit reconciliation -> summary.
//! Every stage is a pure function of the draft.

pub mod aggregator;
pub mod calculators;
pub mod line_items;
pub mod models;
pub mod reconciler;
pub mod requests;
pub mod responses;
pub mod services;
pub mod summary;
pub mod venue;

// Re-export commonly used items
pub use aggregator::{compute_gross_total, GrossTotal, PendingReason};
pub use calculators::{
    compute_venue_overage, round_money, scratch_venue_price, FREE_GUEST_THRESHOLD,
};
pub use line_items::{NewLineItem, PackageInclusion};
pub use models::{
    Category, EventDraft, LineItem, LineItemKind, PackageContext, ReservationContext,
    VenueRecord,
};
pub use reconciler::{effective_guest_count, reconcile};
pub use requests::EventDraftRequest;
pub use responses::{MoneyResponse, QuoteResponse};
pub use services::Quoter;
pub use summary::{quote_draft, Quote, QuoteOutcome};

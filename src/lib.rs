//! Budget engine for event drafts.
//!
//! Turns a package, a venue, an editable list of line items and an optional
//! reservation deposit into one authoritative amount owed, plus the venue,
//! provider and payable sub-totals that must agree with it.

pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;
pub mod telemetry;

pub use config::Config;
pub use error::{InvariantViolation, PricingError, ValidationError};
pub use pricing::{quote_draft, EventDraft, QuoteOutcome, Quoter};

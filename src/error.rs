//! Error handling for the pricing engine

use rust_decimal::Decimal;
use serde::Serialize;

/// Structurally invalid input. Raised immediately, never coerced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: String, value: Decimal },

    #[error("Guest count must be at least 1 (got {0})")]
    InvalidGuestCount(i64),

    #[error("Line item is missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("Unknown line item category '{0}'")]
    UnknownCategory(String),

    #[error("Duplicate line item id '{0}'")]
    DuplicateItemId(String),

    #[error("Line item '{0}' not found")]
    ItemNotFound(String),

    #[error("Line item '{id}' ({category}) cannot be opted out; only package items can")]
    NotToggleable { id: String, category: String },

    #[error("Line item '{id}' is a package inclusion; opt it out instead of removing it")]
    NotRemovable { id: String },

    #[error("No package is selected")]
    NoPackageSelected,

    #[error("Line items of kind '{0}' are created by package or venue selection")]
    ManagedItemKind(&'static str),

    #[error("Line item '{id}' is flagged as the venue inclusion but has category '{category}'")]
    InconsistentVenueFlag { id: String, category: String },

    #[error("{field} is too large to price")]
    AmountOutOfRange { field: String },
}

impl ValidationError {
    pub(crate) fn negative(field: impl Into<String>, value: Decimal) -> Self {
        ValidationError::NegativeAmount {
            field: field.into(),
            value,
        }
    }

    pub(crate) fn out_of_range(field: impl Into<String>) -> Self {
        ValidationError::AmountOutOfRange {
            field: field.into(),
        }
    }
}

/// Internal consistency failure. Should never happen for a correct caller.
///
/// Never returned as an `Err`: the pipeline logs it, zeroes the affected
/// figure and carries the violation on the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvariantViolation {
    #[error("Draft holds {count} venue inclusion items (at most one allowed)")]
    MultipleVenueInclusions { count: usize },

    #[error("Balance after deposit is negative ({amount})")]
    NegativeBalance {
        #[serde(with = "rust_decimal::serde::str")]
        amount: Decimal,
    },
}

/// Top-level error type
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PricingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::negative("line_items[0].price", dec!(-5));
        assert!(err.to_string().contains("line_items[0].price"));
        assert!(err.to_string().contains("-5"));

        let err = ValidationError::InvalidGuestCount(0);
        assert!(err.to_string().contains("at least 1"));

        let err = ValidationError::NotRemovable { id: "pkg-1".to_string() };
        assert!(err.to_string().contains("pkg-1"));

        let err = ValidationError::out_of_range("gross_total");
        assert_eq!(err.to_string(), "gross_total is too large to price");
    }

    #[test]
    fn test_pricing_error_wraps_validation() {
        let err: PricingError = ValidationError::MissingField { field: "id" }.into();
        assert!(matches!(err, PricingError::Validation(_)));
        assert!(err.to_string().starts_with("Validation error"));
    }

    #[test]
    fn test_invariant_violation_serializes_tagged() {
        let json = serde_json::to_value(InvariantViolation::NegativeBalance {
            amount: dec!(-100.50),
        })
        .unwrap();
        assert_eq!(json["kind"], "negative_balance");
        assert_eq!(json["amount"], "-100.50");
    }
}

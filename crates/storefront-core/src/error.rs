//! # Core Errors
//!
//! Error types owned by the domain layer. Two kinds live here:
//!
//! * [`CoreError`] for rule violations the domain itself detects, such as an
//!   illegal order-status transition.
//! * [`ValidationError`] for caller input that parses but breaks a business
//!   rule. These are produced by [`crate::validation`] before any database
//!   work begins.
//!
//! Higher layers fold both into their own error types. The checkout crate
//! wraps them (alongside `DbError` from the storage crate) into the
//! `CheckoutError` and `PaymentError` enums its callers actually match on,
//! so nothing outside this crate needs to handle a `CoreError` directly.
//!
//! All of it is `thiserror` derives. Messages carry the identifiers and
//! values a support engineer would grep the logs for.

use thiserror::Error;

use crate::lifecycle::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// A domain rule was violated.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The order lifecycle table has no edge from `from` to `to`. Raised
    /// for things like shipping a cancelled order or paying twice.
    #[error("Illegal order transition: {from} -> {to}")]
    InvalidStateTransition { from: OrderStatus, to: OrderStatus },

    /// Caller input failed a business-rule check.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Caller input that parsed correctly but breaks a rule.
///
/// Variant per failure shape rather than per field; the `field` member names
/// which input was at fault.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Blank or missing where a value is mandatory.
    #[error("{field} is required")]
    Required { field: String },

    /// Above the length cap for this field.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Outside the numeric range for this field.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Zero or negative where only positive values make sense.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Wrong shape, e.g. an email without an `@`.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Result alias for domain operations.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

//! # Order Lifecycle
//!
//! The order state machine: which states exist, which transitions are legal,
//! and which states are terminal.
//!
//! ## State Diagram
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │                ┌─────────┐                                              │
//! │   checkout ──► │ PENDING │──────────────┐                               │
//! │                └────┬────┘              │                               │
//! │                     │ pay_order         │ cancel                        │
//! │                     ▼                   ▼                               │
//! │                ┌─────────┐        ┌───────────┐                         │
//! │                │  PAID   │        │ CANCELLED │ (terminal)              │
//! │                └────┬────┘        └───────────┘                         │
//! │                     │ ship                                              │
//! │                     ▼                                                   │
//! │                ┌─────────┐                                              │
//! │                │ SHIPPED │                                              │
//! │                └────┬────┘                                              │
//! │                     │ complete                                          │
//! │                     ▼                                                   │
//! │                ┌───────────┐                                            │
//! │                │ COMPLETED │ (terminal)                                 │
//! │                └───────────┘                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the PENDING → PAID transition has a trigger in this workspace (the
//! payment processor). Shipping and completion belong to fulfillment tooling;
//! the legal-transition table already covers them so that tooling cannot
//! invent its own rules.
//!
//! ## Persistence
//! The status round-trips through a TEXT column as its uppercase name
//! (`'PENDING'`, `'PAID'`, ...). Guarded UPDATEs in the database layer compare
//! against these strings, so the serde/sqlx renames here and the SQL literals
//! there must stay in sync.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

// =============================================================================
// Order Status
// =============================================================================

/// The lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Placed, not yet paid. The only state payment accepts.
    Pending,
    /// Payment captured.
    Paid,
    /// Handed to fulfillment.
    Shipped,
    /// Delivered and closed. Terminal.
    Completed,
    /// Abandoned before payment. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// The uppercase name used in the database and on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Returns true if the given transition is legal.
    ///
    /// The full table:
    ///
    /// | from     | allowed next        |
    /// |----------|---------------------|
    /// | PENDING  | PAID, CANCELLED     |
    /// | PAID     | SHIPPED             |
    /// | SHIPPED  | COMPLETED           |
    /// | COMPLETED| (none, terminal)    |
    /// | CANCELLED| (none, terminal)    |
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Shipped)
                | (OrderStatus::Shipped, OrderStatus::Completed)
        )
    }

    /// Attempts the transition, returning the new state or a typed error.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::lifecycle::OrderStatus;
    ///
    /// let paid = OrderStatus::Pending.transition_to(OrderStatus::Paid).unwrap();
    /// assert_eq!(paid, OrderStatus::Paid);
    ///
    /// // Skipping states is rejected
    /// assert!(OrderStatus::Pending
    ///     .transition_to(OrderStatus::Shipped)
    ///     .is_err());
    /// ```
    pub fn transition_to(self, next: OrderStatus) -> Result<OrderStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidStateTransition { from: self, to: next })
        }
    }

    /// Returns true for states with no outgoing transitions.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// New orders always start as `Pending`.
impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # storefront-core
//!
//! Domain layer of the storefront: the types and rules that checkout and
//! payment are built from, with no I/O of any kind. Everything here is a
//! plain function or a plain value, which is what makes the interesting
//! invariants (exact totals, legal status transitions, bounded quantities)
//! unit-testable without a database.
//!
//! ## Crate stack
//! ```text
//!        storefront-checkout        CheckoutEngine, PaymentProcessor
//!              │      │
//!              ▼      ▼
//!   ┌─► storefront-core (this)      Money, Product/Order/User, OrderStatus,
//!   │          │                    validation rules
//!   │          ▼
//!   └── storefront-db               SQLite pool, repositories, migrations
//!       (depends on core for the row types it maps)
//! ```
//!
//! ## What lives where
//!
//! - [`money`]: integer-cent [`Money`], the only representation prices and
//!   totals ever take.
//! - [`types`]: [`Product`], [`Order`], [`OrderItem`], [`User`], and the
//!   [`CartLine`] checkout input.
//! - [`lifecycle`]: [`OrderStatus`] and its transition table. PENDING is the
//!   only state that can become PAID.
//! - [`validation`]: the pre-transaction input checks.
//! - [`error`]: [`CoreError`] and [`ValidationError`].
//!
//! ```rust
//! use storefront_core::{Money, OrderStatus};
//!
//! let line_total = Money::from_cents(28_500_000).multiply_quantity(2);
//! assert_eq!(line_total.cents(), 57_000_000);
//!
//! assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Paid));
//! assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Paid));
//! ```

pub mod error;
pub mod lifecycle;
pub mod money;
pub mod types;
pub mod validation;

// Flat re-exports so call sites can write `storefront_core::Money`.
pub use error::{CoreError, CoreResult, ValidationError};
pub use lifecycle::OrderStatus;
pub use money::Money;
pub use types::*;

/// Largest quantity a single cart line may order.
///
/// Catches fat-fingered quantities (1000 where 10 was meant) before they
/// reach the stock guard, and keeps `price × quantity` far from i64 overflow
/// at any catalog price.
pub const MAX_ITEM_QUANTITY: i64 = 999;

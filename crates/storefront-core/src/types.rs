//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Product     │   │      Order      │   │    OrderItem    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  user_id (FK)   │   │  order_id (FK)  │       │
//! │  │  price_cents    │   │  status         │   │  product_id(FK) │       │
//! │  │  stock          │   │  total_cents    │   │  unit_price ❄   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐        ❄ = frozen           │
//! │  │      User       │   │    CartLine     │            snapshot,        │
//! │  │  ─────────────  │   │  ─────────────  │            never re-read    │
//! │  │  id (UUID)      │   │  product_id     │            from the catalog │
//! │  │  email (unique) │   │  quantity       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `OrderItem.unit_price_cents` is copied from `Product.price_cents` inside
//! the checkout transaction. Later catalog price changes never alter what a
//! past order charged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lifecycle::OrderStatus;
use crate::money::Money;

// =============================================================================
// User
// =============================================================================

/// A registered buyer.
///
/// Identity and authentication live outside this system; a `User` row is the
/// durable anchor that orders reference by foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// UUID v4 primary key.
    pub id: String,

    /// Login/contact address, unique across the store.
    pub email: String,

    /// Name shown on receipts.
    pub name: String,

    /// Registration time.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for purchase, including its live stock counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// UUID v4 primary key.
    pub id: String,

    /// Catalog display name.
    pub name: String,

    /// Optional long-form description.
    pub description: Option<String>,

    /// Current catalog price in cents. Checkout snapshots this into the
    /// line item; changing it later never reprices existing orders.
    pub price_cents: i64,

    /// Units currently available. Never negative; every decrement runs as
    /// `stock = stock - n WHERE stock >= n` at the database.
    pub stock: i64,

    /// Catalog entry creation time.
    pub created_at: DateTime<Utc>,

    /// Last modification time, stock movements included.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether at least `quantity` units are available.
    ///
    /// This is the advisory read-side check; the authoritative check is the
    /// guarded UPDATE that performs the decrement.
    #[inline]
    pub fn has_stock(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Order
// =============================================================================

/// A checkout result: one row per successful checkout, carrying the
/// lifecycle status and the total computed from price snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    /// UUID v4 primary key.
    pub id: String,

    /// The buyer who placed this order.
    pub user_id: String,

    /// Sum of all line totals, in cents. Fixed at checkout.
    pub total_cents: i64,

    /// Current lifecycle state. New orders start as `Pending`.
    pub status: OrderStatus,

    /// Placement time.
    pub created_at: DateTime<Utc>,

    /// Last state-change time.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
/// Uses the snapshot pattern to freeze the unit price at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    /// UUID v4 primary key.
    pub id: String,

    /// Parent order.
    pub order_id: String,

    /// The product this line refers to. The row itself stays valid even if
    /// the catalog entry changes later.
    pub product_id: String,

    /// Quantity purchased. Always positive.
    pub quantity: i64,

    /// Unit price in cents at checkout time (frozen).
    pub unit_price_cents: i64,

    /// Position of this line within the order, for stable display order.
    pub line_index: i64,
}

impl OrderItem {
    /// Returns the unit price snapshot as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total (unit price × quantity) as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One requested line of a checkout: which product, how many.
///
/// This is the wire shape callers submit; it is deliberately minimal.
/// Prices are NEVER accepted from the caller, they are read from the
/// catalog inside the checkout transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog id of the product to purchase.
    pub product_id: String,

    /// Number of units requested. Must be positive.
    pub quantity: i64,
}

impl CartLine {
    /// Convenience constructor, mostly for tests and seeds.
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        CartLine {
            product_id: product_id.into(),
            quantity,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

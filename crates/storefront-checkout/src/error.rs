//! # Checkout and Payment Errors
//!
//! Error taxonomy for the two money-touching flows. Each variant maps to a
//! distinct caller-visible failure so the UI layer can branch on kind
//! instead of parsing messages:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        CheckoutError                             │
//! │                                                                  │
//! │  EmptyCart          rejected before any database work            │
//! │  InvalidQuantity    rejected before any database work            │
//! │  ProductNotFound    transaction aborted, stock untouched         │
//! │  InsufficientStock  transaction aborted, stock untouched         │
//! │  UserNotFound       transaction aborted, stock untouched         │
//! │  Persistence        infrastructure failure (wraps DbError)       │
//! └──────────────────────────────────────────────────────────────────┘
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        PaymentError                              │
//! │                                                                  │
//! │  OrderNotFound      no such order                                │
//! │  Unauthorized       order belongs to someone else                │
//! │  AlreadyPaid        order is already PAID                        │
//! │  InvalidState       order is in a non-payable state              │
//! │  Gateway            charge attempt failed, order left PENDING    │
//! │  Persistence        infrastructure failure (wraps DbError)       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::OrderStatus;
use storefront_db::DbError;
use thiserror::Error;

/// Errors returned by [`CheckoutEngine::checkout`](crate::CheckoutEngine::checkout).
///
/// Business-rule variants (`EmptyCart` through `UserNotFound`) always leave
/// the database exactly as it was before the call. Only `Persistence` can
/// surface while the outcome is indeterminate (e.g. a commit that fails
/// mid-flight).
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart contained no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart line carried a non-positive or absurdly large quantity.
    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: String, quantity: i64 },

    /// A cart line referenced a product id that does not exist.
    #[error("Product {0} not found")]
    ProductNotFound(String),

    /// A cart line asked for more units than are on hand.
    ///
    /// `available` is the stock level observed inside the aborted
    /// transaction, after any earlier lines of the same cart were applied.
    #[error("Insufficient stock for product {name}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        name: String,
        available: i64,
        requested: i64,
    },

    /// The buyer id does not exist.
    #[error("User not found")]
    UserNotFound(String),

    /// Database failure unrelated to any business rule.
    #[error("Checkout persistence error: {0}")]
    Persistence(#[from] DbError),
}

/// Errors returned by [`PaymentProcessor::pay_order`](crate::PaymentProcessor::pay_order).
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No order with this id exists.
    #[error("Order {0} not found")]
    OrderNotFound(String),

    /// The order exists but belongs to a different user.
    ///
    /// Deliberately carries no order details so a caller probing ids
    /// learns nothing about other users' orders.
    #[error("Not authorized to pay for this order")]
    Unauthorized,

    /// The order was already paid. Paying twice is never silently ignored.
    #[error("Order {0} has already been paid")]
    AlreadyPaid(String),

    /// The order is in a state other than PENDING or PAID
    /// (shipped, completed or cancelled orders cannot be paid).
    #[error("Order {order_id} cannot be paid in state {status}")]
    InvalidState {
        order_id: String,
        status: OrderStatus,
    },

    /// The gateway refused or failed the charge. The order stays PENDING
    /// and the call can be retried.
    #[error("Payment gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Database failure unrelated to any business rule.
    #[error("Payment persistence error: {0}")]
    Persistence(#[from] DbError),
}

/// Failure surfaced by a [`PaymentGateway`](crate::PaymentGateway)
/// implementation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The provider processed the request and said no.
    #[error("charge declined: {0}")]
    Declined(String),

    /// The provider could not be reached or errored out.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

/// Convenience alias for checkout results.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Convenience alias for payment results.
pub type PaymentResult<T> = Result<T, PaymentError>;

// =============================================================================
// Tests
// =============================================================================

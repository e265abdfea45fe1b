//! # storefront-checkout: Checkout and Payment Engine
//!
//! The orchestration layer of the storefront. Everything that moves money
//! or stock goes through this crate, inside explicit transaction
//! boundaries.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Caller surface (API, CLI, tests)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           ★ storefront-checkout (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────────┐   ┌───────────────────┐                 │   │
//! │  │   │  CheckoutEngine  │   │ PaymentProcessor  │                 │   │
//! │  │   │  cart → PENDING  │   │ PENDING → PAID    │                 │   │
//! │  │   │  order, atomic   │   │ via gateway seam  │                 │   │
//! │  │   └────────┬─────────┘   └─────────┬─────────┘                 │   │
//! │  │            │                       │                           │   │
//! │  │            │             ┌─────────▼─────────┐                 │   │
//! │  │            │             │ dyn PaymentGateway│                 │   │
//! │  │            │             │ (SimulatedGateway)│                 │   │
//! │  │            │             └───────────────────┘                 │   │
//! │  └────────────┼─────────────────────────────────────────────────── ┘  │
//! │               │                                                        │
//! │  ┌────────────▼────────────────────────────────────────────────────┐  │
//! │  │   storefront-db: repositories, guarded UPDATEs, transactions    │  │
//! │  │   storefront-core: Money, OrderStatus FSM, validation           │  │
//! │  └─────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - The checkout transaction engine
//! - [`payment`] - The payment processor
//! - [`gateway`] - The pluggable gateway seam and the simulated provider
//! - [`error`] - Checkout, payment and gateway error taxonomies
//!
//! ## Guarantees
//!
//! 1. **No oversell**: stock decrements are guarded single statements
//! 2. **No partial checkouts**: one transaction per cart, commit or nothing
//! 3. **Frozen prices**: order items snapshot the unit price at checkout
//! 4. **No silent double-pay**: paying a PAID order is always an error

pub mod engine;
pub mod error;
pub mod gateway;
pub mod payment;

pub use engine::{CheckoutEngine, CheckoutReceipt};
pub use error::{CheckoutError, CheckoutResult, GatewayError, PaymentError, PaymentResult};
pub use gateway::{ChargeOutcome, ChargeRequest, PaymentGateway, SimulatedGateway};
pub use payment::{PaymentConfirmation, PaymentProcessor};

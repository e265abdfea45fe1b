//! # Payment Processor
//!
//! Drives a PENDING order through the charge step and flips it to PAID.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     pay_order(user_id, order_id)                        │
//! │                                                                         │
//! │  1. read order            → OrderNotFound                               │
//! │  2. ownership check       → Unauthorized (no details leaked)            │
//! │  3. status check          → AlreadyPaid | InvalidState                  │
//! │  4. gateway.charge()      → Gateway error, order stays PENDING          │
//! │  5. guarded flip to PAID:                                               │
//! │       UPDATE orders SET status = 'PAID'                                 │
//! │       WHERE id = ? AND status = 'PENDING'                               │
//! │     └── 0 rows? someone beat us between read and write:                 │
//! │         re-read and reclassify (AlreadyPaid / InvalidState)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The flip is deliberately a guarded single statement rather than a blind
//! UPDATE. Two racing payments for the same order both pass step 3 against
//! a PENDING read; the guard makes exactly one of them win and the loser
//! reports AlreadyPaid instead of silently double-confirming.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::OrderStatus;
use storefront_db::Database;
use tracing::{debug, info, warn};

use crate::error::{PaymentError, PaymentResult};
use crate::gateway::{ChargeRequest, PaymentGateway};

/// Confirmation returned to the caller after a successful payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    /// The order that was paid.
    pub order_id: String,

    /// Provider reference for the captured charge.
    pub reference: String,

    /// When the payment completed.
    pub paid_at: DateTime<Utc>,
}

/// The payment processor.
///
/// Stateless apart from its handles; cheap to clone and share.
///
/// ## Example
/// ```rust,ignore
/// let processor = PaymentProcessor::new(db.clone(), Arc::new(SimulatedGateway::new()));
/// let confirmation = processor.pay_order(&user.id, &order_id).await?;
/// println!("paid, reference {}", confirmation.reference);
/// ```
#[derive(Clone)]
pub struct PaymentProcessor {
    db: Database,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentProcessor {
    /// Creates a processor over the given database and gateway.
    pub fn new(db: Database, gateway: Arc<dyn PaymentGateway>) -> Self {
        PaymentProcessor { db, gateway }
    }

    /// Pays a PENDING order on behalf of `user_id`.
    ///
    /// ## Arguments
    /// * `user_id` - Must be the order's owner
    /// * `order_id` - The order to pay
    ///
    /// ## Returns
    /// * `Ok(PaymentConfirmation)` - order is now PAID
    /// * `Err(PaymentError)` - see variants; on `Gateway` errors the order
    ///   is still PENDING and the call can be retried
    pub async fn pay_order(
        &self,
        user_id: &str,
        order_id: &str,
    ) -> PaymentResult<PaymentConfirmation> {
        debug!(user_id = %user_id, order_id = %order_id, "Processing payment");

        let orders = self.db.orders();

        let order = orders
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| PaymentError::OrderNotFound(order_id.to_string()))?;

        if order.user_id != user_id {
            warn!(order_id = %order.id, "Payment attempt by non-owner");
            return Err(PaymentError::Unauthorized);
        }

        match order.status {
            OrderStatus::Pending => {}
            OrderStatus::Paid => return Err(PaymentError::AlreadyPaid(order.id)),
            status => {
                return Err(PaymentError::InvalidState {
                    order_id: order.id,
                    status,
                })
            }
        }

        // Charge before flipping the status. A gateway failure here leaves
        // the order PENDING; nothing to undo.
        let outcome = self
            .gateway
            .charge(&ChargeRequest {
                order_id: order.id.clone(),
                amount: order.total(),
            })
            .await?;

        // Guarded flip. Zero rows means the status changed between our read
        // and this write; reclassify from a fresh read instead of guessing.
        let flipped = orders.mark_paid(&order.id).await?;
        if !flipped {
            return match orders.get_by_id(&order.id).await? {
                None => Err(PaymentError::OrderNotFound(order.id)),
                Some(current) if current.status == OrderStatus::Paid => {
                    Err(PaymentError::AlreadyPaid(order.id))
                }
                Some(current) => Err(PaymentError::InvalidState {
                    order_id: order.id,
                    status: current.status,
                }),
            };
        }

        let confirmation = PaymentConfirmation {
            order_id: order.id.clone(),
            reference: outcome.reference,
            paid_at: Utc::now(),
        };

        info!(
            order_id = %confirmation.order_id,
            reference = %confirmation.reference,
            amount = %order.total(),
            "Order paid"
        );

        Ok(confirmation)
    }
}

// =============================================================================
// Tests
// =============================================================================

//! # Payment Gateway Seam
//!
//! The processor never talks to a provider directly. It goes through the
//! [`PaymentGateway`] trait so the charge step can be swapped out:
//!
//! ```text
//! ┌───────────────────┐      charge()      ┌─────────────────────────┐
//! │ PaymentProcessor  │ ─────────────────> │  dyn PaymentGateway     │
//! │                   │ <───────────────── │                         │
//! └───────────────────┘   ChargeOutcome    │  • SimulatedGateway     │
//!                         or GatewayError  │  • (real provider, TBD) │
//!                                          └─────────────────────────┘
//! ```
//!
//! The bundled [`SimulatedGateway`] stands in for a real provider: it
//! waits a fixed latency and then approves every charge. Tests shrink the
//! latency to zero with [`SimulatedGateway::with_latency`].

use std::time::Duration;

use async_trait::async_trait;
use storefront_core::Money;
use tracing::debug;
use uuid::Uuid;

use crate::error::GatewayError;

/// What the processor hands to the gateway for a single charge attempt.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    /// Order being paid for, included for provider-side reconciliation.
    pub order_id: String,
    /// Amount to capture.
    pub amount: Money,
}

/// Successful charge result.
#[derive(Debug, Clone)]
pub struct ChargeOutcome {
    /// Provider-assigned reference for the captured charge.
    pub reference: String,
}

/// Abstraction over the external payment provider.
///
/// Implementations must be cheap to share (`Send + Sync`); the processor
/// holds one behind an `Arc`.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Attempt to capture `request.amount` for `request.order_id`.
    ///
    /// ## Returns
    /// * `Ok(ChargeOutcome)` - the provider captured the funds
    /// * `Err(GatewayError)` - declined or unreachable; nothing was captured
    async fn charge(&self, request: &ChargeRequest) -> Result<ChargeOutcome, GatewayError>;
}

/// Stand-in provider that waits a fixed latency and approves every charge.
///
/// The default latency mirrors a realistic round trip to a card network,
/// which keeps manual testing honest about how checkout feels.
///
/// ## Example
/// ```no_run
/// use std::time::Duration;
/// use storefront_checkout::SimulatedGateway;
///
/// let gateway = SimulatedGateway::new();                            // 1500ms
/// let instant = SimulatedGateway::with_latency(Duration::ZERO);     // tests
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    latency: Duration,
}

impl SimulatedGateway {
    /// Round-trip delay applied by [`SimulatedGateway::new`].
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1500);

    /// Create a gateway with the default latency.
    pub fn new() -> Self {
        Self {
            latency: Self::DEFAULT_LATENCY,
        }
    }

    /// Create a gateway with a custom latency.
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, request: &ChargeRequest) -> Result<ChargeOutcome, GatewayError> {
        debug!(
            order_id = %request.order_id,
            amount = %request.amount,
            latency_ms = self.latency.as_millis() as u64,
            "Simulated gateway charging"
        );

        tokio::time::sleep(self.latency).await;

        Ok(ChargeOutcome {
            reference: format!("sim_{}", Uuid::new_v4().simple()),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_latency_is_1500ms() {
        assert_eq!(SimulatedGateway::DEFAULT_LATENCY, Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_simulated_gateway_approves() {
        let gateway = SimulatedGateway::with_latency(Duration::ZERO);
        let request = ChargeRequest {
            order_id: "order-1".to_string(),
            amount: Money::from_cents(28_500_000),
        };

        let outcome = gateway.charge(&request).await.unwrap();
        assert!(outcome.reference.starts_with("sim_"));
    }

    #[tokio::test]
    async fn test_references_are_unique() {
        let gateway = SimulatedGateway::with_latency(Duration::ZERO);
        let request = ChargeRequest {
            order_id: "order-1".to_string(),
            amount: Money::from_cents(100),
        };

        let first = gateway.charge(&request).await.unwrap();
        let second = gateway.charge(&request).await.unwrap();
        assert_ne!(first.reference, second.reference);
    }
}

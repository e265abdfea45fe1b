//! # Checkout Engine
//!
//! Turns a validated cart into a durable PENDING order, all-or-nothing.
//!
//! ## Transaction Scope
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        checkout(user_id, lines)                         │
//! │                                                                         │
//! │  Phase 1: validation (NO database work)                                 │
//! │  ├── cart empty?          → EmptyCart                                   │
//! │  └── any qty <= 0 / >999? → InvalidQuantity                             │
//! │                                                                         │
//! │  Phase 2: single transaction ═══════════════════════════════╗          │
//! │  ║  for each cart line:                                     ║          │
//! │  ║  ├── read product            → ProductNotFound (abort)   ║          │
//! │  ║  ├── guarded stock decrement → InsufficientStock (abort) ║          │
//! │  ║  └── snapshot unit price, accumulate total               ║          │
//! │  ║  resolve buyer               → UserNotFound (abort)      ║          │
//! │  ║  insert order + order_items                              ║          │
//! │  ╚══════════════════════════════════════ commit ════════════╝          │
//! │                                                                         │
//! │  Any abort rolls back EVERY earlier decrement of the same call.        │
//! │  Partial checkouts do not exist.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Duplicate Lines
//! Reads inside the transaction see the transaction's own decrements, so two
//! lines for the same product behave exactly like one line with the summed
//! quantity. `[{X,2},{X,2}]` against stock 3 fails on the second line.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use storefront_core::validation::validate_quantity;
use storefront_core::{CartLine, Money, Order, OrderItem, OrderStatus};
use storefront_db::{Database, DbError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{CheckoutError, CheckoutResult};

/// Receipt returned to the caller after a committed checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    /// Id of the newly created PENDING order.
    pub order_id: String,

    /// Order total in cents, summed from frozen unit-price snapshots.
    pub total_cents: i64,

    /// Number of line items on the order.
    pub item_count: i64,
}

/// The checkout transaction engine.
///
/// Holds the database handle and owns the transaction boundary; the
/// repositories it calls never begin or commit on their own.
///
/// ## Example
/// ```rust,ignore
/// let engine = CheckoutEngine::new(db.clone());
/// let receipt = engine
///     .checkout(&user.id, &[CartLine::new(&product.id, 2)])
///     .await?;
/// println!("order {} for {} cents", receipt.order_id, receipt.total_cents);
/// ```
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    db: Database,
}

impl CheckoutEngine {
    /// Creates a new engine over the given database.
    pub fn new(db: Database) -> Self {
        CheckoutEngine { db }
    }

    /// Executes a checkout for `user_id` with the given cart lines.
    ///
    /// ## Arguments
    /// * `user_id` - The buyer placing the order
    /// * `lines` - Cart lines; prices are read from the catalog, never
    ///   from the caller
    ///
    /// ## Returns
    /// * `Ok(CheckoutReceipt)` - order committed as PENDING, stock decremented
    /// * `Err(CheckoutError)` - nothing was persisted (see [`CheckoutError`])
    ///
    /// ## Edge Cases
    /// - An empty cart or a bad quantity is rejected before any database
    ///   work starts.
    /// - A failure on line N rolls back the decrements of lines 0..N.
    /// - The buyer is resolved inside the same transaction, so a user
    ///   deleted mid-checkout aborts cleanly instead of tripping the
    ///   foreign key on insert.
    pub async fn checkout(
        &self,
        user_id: &str,
        lines: &[CartLine],
    ) -> CheckoutResult<CheckoutReceipt> {
        debug!(user_id = %user_id, lines = lines.len(), "Processing checkout");

        // ===== Phase 1: validate before touching the database =====

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        for line in lines {
            if validate_quantity(line.quantity).is_err() {
                return Err(CheckoutError::InvalidQuantity {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                });
            }
        }

        let products = self.db.products();
        let orders = self.db.orders();
        let users = self.db.users();

        // ===== Phase 2: one transaction for stock + order + items =====

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let order_id = Uuid::new_v4().to_string();
        let mut total = Money::zero();
        let mut items: Vec<OrderItem> = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            let product = match products.find(&mut *tx, &line.product_id).await? {
                Some(product) => product,
                None => {
                    if let Err(rollback_err) = tx.rollback().await {
                        warn!(error = %rollback_err, "Rollback failed after aborted checkout");
                    }
                    return Err(CheckoutError::ProductNotFound(line.product_id.clone()));
                }
            };

            // Advisory check against transaction-visible stock. Earlier
            // lines of this cart have already decremented, so duplicate
            // product ids are tallied cumulatively here.
            if !product.has_stock(line.quantity) {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed after aborted checkout");
                }
                return Err(CheckoutError::InsufficientStock {
                    product_id: product.id,
                    name: product.name,
                    available: product.stock,
                    requested: line.quantity,
                });
            }

            let decremented = products
                .try_decrement_stock(&mut *tx, &line.product_id, line.quantity)
                .await?;

            if !decremented {
                // The advisory read passed but the guard still refused.
                // Re-read for an accurate availability figure rather than
                // reporting the stale one.
                let available = products
                    .find(&mut *tx, &line.product_id)
                    .await?
                    .map(|p| p.stock)
                    .unwrap_or(0);

                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed after aborted checkout");
                }
                return Err(CheckoutError::InsufficientStock {
                    product_id: product.id,
                    name: product.name,
                    available,
                    requested: line.quantity,
                });
            }

            total += product.price().multiply_quantity(line.quantity);
            items.push(OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: product.id,
                quantity: line.quantity,
                unit_price_cents: product.price_cents,
                line_index: index as i64,
            });
        }

        let buyer = match users.find(&mut *tx, user_id).await? {
            Some(user) => user,
            None => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed after aborted checkout");
                }
                return Err(CheckoutError::UserNotFound(user_id.to_string()));
            }
        };

        let now = Utc::now();
        let order = Order {
            id: order_id,
            user_id: buyer.id,
            total_cents: total.cents(),
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        orders.create_with_items(&mut tx, &order, &items).await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total = %order.total(),
            items = items.len(),
            "Checkout committed"
        );

        Ok(CheckoutReceipt {
            order_id: order.id,
            total_cents: order.total_cents,
            item_count: items.len() as i64,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{Product, User};
    use storefront_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_user(db: &Database, email: &str) -> User {
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: "Test Buyer".to_string(),
            created_at: Utc::now(),
        };
        db.users().insert(&user).await.unwrap();
        user
    }

    async fn seed_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: None,
            price_cents,
            stock,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    #[tokio::test]
    async fn test_checkout_creates_pending_order_with_snapshots() {
        let db = test_db().await;
        let engine = CheckoutEngine::new(db.clone());

        let buyer = seed_user(&db, "buyer@example.com").await;
        let oven = seed_product(&db, "Reflow Oven", 12_500_000, 5).await;
        let printer = seed_product(&db, "Stencil Printer", 8_500_000, 8).await;

        let receipt = engine
            .checkout(
                &buyer.id,
                &[
                    CartLine::new(&oven.id, 2),
                    CartLine::new(&printer.id, 1),
                ],
            )
            .await
            .unwrap();

        assert_eq!(receipt.total_cents, 2 * 12_500_000 + 8_500_000);
        assert_eq!(receipt.item_count, 2);

        let order = db
            .orders()
            .get_by_id(&receipt.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id, buyer.id);
        assert_eq!(order.total_cents, receipt.total_cents);

        let items = db.orders().get_items(&receipt.order_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line_index, 0);
        assert_eq!(items[0].product_id, oven.id);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].unit_price_cents, 12_500_000);
        assert_eq!(items[1].line_index, 1);
        assert_eq!(items[1].unit_price_cents, 8_500_000);

        // Stock was decremented by the committed checkout
        let oven_after = db.products().get_by_id(&oven.id).await.unwrap().unwrap();
        let printer_after = db.products().get_by_id(&printer.id).await.unwrap().unwrap();
        assert_eq!(oven_after.stock, 3);
        assert_eq!(printer_after.stock, 7);
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let db = test_db().await;
        let engine = CheckoutEngine::new(db.clone());
        let buyer = seed_user(&db, "buyer@example.com").await;

        let err = engine.checkout(&buyer.id, &[]).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));

        let orders = db.orders().list_for_user(&buyer.id).await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_quantity_rejected_before_any_write() {
        let db = test_db().await;
        let engine = CheckoutEngine::new(db.clone());

        let buyer = seed_user(&db, "buyer@example.com").await;
        let product = seed_product(&db, "AOI System", 19_500_000, 4).await;

        for bad_quantity in [0, -1, 1000] {
            let err = engine
                .checkout(&buyer.id, &[CartLine::new(&product.id, bad_quantity)])
                .await
                .unwrap_err();
            match err {
                CheckoutError::InvalidQuantity {
                    product_id,
                    quantity,
                } => {
                    assert_eq!(product_id, product.id);
                    assert_eq!(quantity, bad_quantity);
                }
                other => panic!("expected InvalidQuantity, got {other:?}"),
            }
        }

        // A bad line anywhere in the cart rejects the whole cart, and the
        // valid line's stock is untouched
        let err = engine
            .checkout(
                &buyer.id,
                &[CartLine::new(&product.id, 1), CartLine::new("p-x", 0)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidQuantity { .. }));

        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 4);
    }

    #[tokio::test]
    async fn test_unknown_product_aborts_whole_checkout() {
        let db = test_db().await;
        let engine = CheckoutEngine::new(db.clone());

        let buyer = seed_user(&db, "buyer@example.com").await;
        let real = seed_product(&db, "Wave Solder", 18_500_000, 4).await;

        // The real product's decrement happens first, then the unknown id
        // aborts the transaction
        let err = engine
            .checkout(
                &buyer.id,
                &[
                    CartLine::new(&real.id, 2),
                    CartLine::new("no-such-product", 1),
                ],
            )
            .await
            .unwrap_err();

        match err {
            CheckoutError::ProductNotFound(id) => assert_eq!(id, "no-such-product"),
            other => panic!("expected ProductNotFound, got {other:?}"),
        }

        // Rollback restored the earlier decrement
        let after = db.products().get_by_id(&real.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 4);
        assert!(db.orders().list_for_user(&buyer.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insufficient_stock_aborts_and_reports_availability() {
        let db = test_db().await;
        let engine = CheckoutEngine::new(db.clone());

        let buyer = seed_user(&db, "buyer@example.com").await;
        let profiler = seed_product(&db, "Thermal Profiler", 4_500_000, 10).await;
        let xray = seed_product(&db, "X-Ray Inspector", 32_000_000, 1).await;

        let err = engine
            .checkout(
                &buyer.id,
                &[
                    CartLine::new(&profiler.id, 1),
                    CartLine::new(&xray.id, 3),
                ],
            )
            .await
            .unwrap_err();

        match err {
            CheckoutError::InsufficientStock {
                product_id,
                name,
                available,
                requested,
            } => {
                assert_eq!(product_id, xray.id);
                assert_eq!(name, "X-Ray Inspector");
                assert_eq!(available, 1);
                assert_eq!(requested, 3);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Neither product lost stock
        let profiler_after = db
            .products()
            .get_by_id(&profiler.id)
            .await
            .unwrap()
            .unwrap();
        let xray_after = db.products().get_by_id(&xray.id).await.unwrap().unwrap();
        assert_eq!(profiler_after.stock, 10);
        assert_eq!(xray_after.stock, 1);
    }

    #[tokio::test]
    async fn test_drained_stock_rejects_next_buyer() {
        let db = test_db().await;
        let engine = CheckoutEngine::new(db.clone());

        let first = seed_user(&db, "first@example.com").await;
        let second = seed_user(&db, "second@example.com").await;
        let product = seed_product(&db, "Thermal Profiler", 1000, 2).await;

        // First buyer takes the entire stock
        let receipt = engine
            .checkout(&first.id, &[CartLine::new(&product.id, 2)])
            .await
            .unwrap();
        assert_eq!(receipt.total_cents, 2000);

        let drained = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(drained.stock, 0);

        // Second buyer immediately after sees zero availability
        let err = engine
            .checkout(&second.id, &[CartLine::new(&product.id, 1)])
            .await
            .unwrap_err();

        match err {
            CheckoutError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 0);
                assert_eq!(requested, 1);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_lines_are_cumulative() {
        let db = test_db().await;
        let engine = CheckoutEngine::new(db.clone());

        let buyer = seed_user(&db, "buyer@example.com").await;
        let cleaner = seed_product(&db, "PCB Cleaner", 7_500_000, 3).await;

        // 2 + 2 against stock 3: the second line sees the first line's
        // decrement and fails with available = 1
        let err = engine
            .checkout(
                &buyer.id,
                &[CartLine::new(&cleaner.id, 2), CartLine::new(&cleaner.id, 2)],
            )
            .await
            .unwrap_err();

        match err {
            CheckoutError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 1);
                assert_eq!(requested, 2);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        let after = db.products().get_by_id(&cleaner.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 3, "aborted checkout must restore stock");

        // 1 + 2 against stock 3 fits exactly
        let receipt = engine
            .checkout(
                &buyer.id,
                &[CartLine::new(&cleaner.id, 1), CartLine::new(&cleaner.id, 2)],
            )
            .await
            .unwrap();
        assert_eq!(receipt.total_cents, 3 * 7_500_000);

        let drained = db.products().get_by_id(&cleaner.id).await.unwrap().unwrap();
        assert_eq!(drained.stock, 0);

        let items = db.orders().get_items(&receipt.order_id).await.unwrap();
        assert_eq!(items.len(), 2, "duplicate lines stay separate items");
    }

    #[tokio::test]
    async fn test_unknown_user_aborts_after_stock_writes() {
        let db = test_db().await;
        let engine = CheckoutEngine::new(db.clone());

        let product = seed_product(&db, "Coating Sprayer", 9_500_000, 7).await;

        let err = engine
            .checkout("no-such-user", &[CartLine::new(&product.id, 2)])
            .await
            .unwrap_err();

        match err {
            CheckoutError::UserNotFound(id) => assert_eq!(id, "no-such-user"),
            other => panic!("expected UserNotFound, got {other:?}"),
        }

        // The decrement ran before the buyer lookup; rollback undid it
        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 7);
    }

    #[tokio::test]
    async fn test_engine_stays_usable_after_every_abort_class() {
        let db = test_db().await;
        let engine = CheckoutEngine::new(db.clone());

        let buyer = seed_user(&db, "buyer@example.com").await;
        let mixer = seed_product(&db, "Solder Paste Mixer", 2_500_000, 2).await;

        // Every abort must finish its rollback and return the connection.
        // The in-memory pool holds a single connection, so a transaction
        // left open here would starve every call below.
        let unknown_product = engine
            .checkout(&buyer.id, &[CartLine::new("missing", 1)])
            .await;
        assert!(matches!(
            unknown_product,
            Err(CheckoutError::ProductNotFound(_))
        ));

        let oversell = engine
            .checkout(&buyer.id, &[CartLine::new(&mixer.id, 5)])
            .await;
        assert!(matches!(
            oversell,
            Err(CheckoutError::InsufficientStock { .. })
        ));

        let unknown_buyer = engine
            .checkout("missing-buyer", &[CartLine::new(&mixer.id, 1)])
            .await;
        assert!(matches!(unknown_buyer, Err(CheckoutError::UserNotFound(_))));

        // Three aborts later: stock untouched, engine still commits.
        let untouched = db.products().get_by_id(&mixer.id).await.unwrap().unwrap();
        assert_eq!(untouched.stock, 2);

        let receipt = engine
            .checkout(&buyer.id, &[CartLine::new(&mixer.id, 2)])
            .await
            .unwrap();
        assert_eq!(receipt.total_cents, 5_000_000);
    }

    #[tokio::test]
    async fn test_price_change_after_checkout_keeps_order_total() {
        let db = test_db().await;
        let engine = CheckoutEngine::new(db.clone());

        let buyer = seed_user(&db, "buyer@example.com").await;
        let spi = seed_product(&db, "SPI Inspector", 16_500_000, 6).await;

        let receipt = engine
            .checkout(&buyer.id, &[CartLine::new(&spi.id, 2)])
            .await
            .unwrap();
        assert_eq!(receipt.total_cents, 33_000_000);

        // Catalog price doubles after the sale
        db.products().update_price(&spi.id, 33_000_000).await.unwrap();

        let order = db
            .orders()
            .get_by_id(&receipt.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.total_cents, 33_000_000, "total is frozen at checkout");

        let items = db.orders().get_items(&receipt.order_id).await.unwrap();
        assert_eq!(items[0].unit_price_cents, 16_500_000, "snapshot is frozen");
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_for_last_unit() {
        let db = test_db().await;
        let engine = CheckoutEngine::new(db.clone());

        let buyer = seed_user(&db, "buyer@example.com").await;
        let last_unit = seed_product(&db, "Pick and Place", 28_500_000, 1).await;

        let first = {
            let engine = engine.clone();
            let user_id = buyer.id.clone();
            let product_id = last_unit.id.clone();
            tokio::spawn(async move {
                engine
                    .checkout(&user_id, &[CartLine::new(&product_id, 1)])
                    .await
            })
        };
        let second = {
            let engine = engine.clone();
            let user_id = buyer.id.clone();
            let product_id = last_unit.id.clone();
            tokio::spawn(async move {
                engine
                    .checkout(&user_id, &[CartLine::new(&product_id, 1)])
                    .await
            })
        };

        let outcomes = [first.await.unwrap(), second.await.unwrap()];
        let won = outcomes.iter().filter(|r| r.is_ok()).count();
        let lost = outcomes
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    Err(CheckoutError::InsufficientStock { available: 0, .. })
                )
            })
            .count();

        assert_eq!(won, 1, "exactly one checkout wins the last unit");
        assert_eq!(lost, 1, "the other fails with zero availability");

        let after = db
            .products()
            .get_by_id(&last_unit.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.stock, 0, "stock never goes negative");

        let orders = db.orders().list_for_user(&buyer.id).await.unwrap();
        assert_eq!(orders.len(), 1, "only the winning checkout created an order");
    }
}

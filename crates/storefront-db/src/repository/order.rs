//! # Order Repository
//!
//! Database operations for orders and their line items.
//!
//! ## Order Lifecycle in SQL
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (inside the checkout transaction)                            │
//! │     └── create_with_items() → orders row (status PENDING)              │
//! │                             → order_items rows (price snapshots)       │
//! │                                                                         │
//! │  2. PAY                                                                 │
//! │     └── mark_paid() → UPDATE ... WHERE status = 'PENDING'              │
//! │         The status guard makes payment idempotent-safe: a second       │
//! │         attempt matches zero rows and reports false.                   │
//! │                                                                         │
//! │  3. READ                                                                │
//! │     └── get_by_id() / get_items() / list_for_user()                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use storefront_core::{Order, OrderItem};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order and all of its items on one connection.
    ///
    /// ## Transaction Discipline
    /// This method does NOT begin or commit. The checkout engine owns the
    /// transaction; pass `&mut *tx` so the order appears atomically with
    /// the stock decrements when the engine commits.
    pub async fn create_with_items(
        &self,
        conn: &mut SqliteConnection,
        order: &Order,
        items: &[OrderItem],
    ) -> DbResult<()> {
        debug!(order_id = %order.id, items = items.len(), "Creating order with items");

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, total_cents, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.total_cents)
        .bind(order.status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *conn)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, quantity, unit_price_cents, line_index)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.line_index)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, total_cents, status, created_at, updated_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all items for an order, in the order they were added to the cart.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, quantity, unit_price_cents, line_index
            FROM order_items
            WHERE order_id = ?1
            ORDER BY line_index
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists a user's orders, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, total_cents, status, created_at, updated_at
            FROM orders
            WHERE user_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Flips an order from PENDING to PAID.
    ///
    /// ## Returns
    /// * `Ok(true)` - the order was PENDING and is now PAID
    /// * `Ok(false)` - no PENDING order with this id existed (missing,
    ///   already paid, or in another state); nothing was changed
    ///
    /// ## Why a status guard
    /// The guard makes the flip atomic with its precondition. Two racing
    /// payment attempts both reach this UPDATE; exactly one matches the
    /// PENDING row, the other reports false and is classified by the
    /// caller against a fresh read.
    pub async fn mark_paid(&self, order_id: &str) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'PAID', updated_at = ?2
            WHERE id = ?1 AND status = 'PENDING'
            "#,
        )
        .bind(order_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let paid = result.rows_affected() > 0;
        debug!(order_id = %order_id, paid, "Mark paid attempted");

        Ok(paid)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

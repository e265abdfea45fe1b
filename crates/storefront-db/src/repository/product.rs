//! # Product Repository
//!
//! Database operations for the catalog, including the stock decrement that
//! makes oversell impossible.
//!
//! ## The Guarded Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              How try_decrement_stock Prevents Oversell                  │
//! │                                                                         │
//! │  Two checkouts race for the last unit (stock outside the tx = 1):      │
//! │                                                                         │
//! │  Checkout A                          Checkout B                         │
//! │  UPDATE products                     UPDATE products                    │
//! │    SET stock = stock - 1               SET stock = stock - 1            │
//! │    WHERE id = X AND stock >= 1         WHERE id = X AND stock >= 1      │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  rows_affected = 1  ✓                rows_affected = 0  ✗               │
//! │  (stock is now 0)                    (guard failed, nothing changed)    │
//! │                                                                         │
//! │  The check and the write are ONE statement. There is no window          │
//! │  between "read stock" and "write stock" for the other checkout         │
//! │  to slip through.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// // Pool-based read
/// let product = repo.get_by_id("uuid-here").await?;
///
/// // Transaction-scoped read + decrement
/// let mut tx = db.pool().begin().await?;
/// let product = repo.find(&mut *tx, "uuid-here").await?;
/// let decremented = repo.try_decrement_stock(&mut *tx, "uuid-here", 2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Wraps a pool handle in a catalog view.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by ID from the pool.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        self.find(&self.pool, id).await
    }

    /// Gets a product by ID on the given executor.
    ///
    /// Pass `&mut *tx` to read inside an open transaction; the read then
    /// sees the transaction's own earlier decrements, which is what makes
    /// duplicate cart lines for the same product behave cumulatively.
    pub async fn find<'e, E>(&self, executor: E, id: &str) -> DbResult<Option<Product>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, stock, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(product)
    }

    /// Atomically decrements stock if enough units are available.
    ///
    /// ## Returns
    /// * `Ok(true)` - stock was decremented by `quantity`
    /// * `Ok(false)` - guard failed: fewer than `quantity` units available,
    ///   nothing was changed
    ///
    /// ## Why a conditional UPDATE
    /// The availability check and the decrement happen in a single SQL
    /// statement. Under concurrent checkouts SQLite serializes the writes,
    /// so exactly one of two racing decrements for the last unit succeeds.
    /// `rows_affected` is the success signal.
    pub async fn try_decrement_stock<'e, E>(
        &self,
        executor: E,
        id: &str,
        quantity: i64,
    ) -> DbResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - ?2, updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(executor)
        .await?;

        let decremented = result.rows_affected() > 0;
        debug!(product_id = %id, quantity, decremented, "Stock decrement attempted");

        Ok(decremented)
    }

    /// Adds a product to the catalog.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price_cents, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists products ordered by name.
    ///
    /// Backs the catalog view; also handy for seed verification.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, stock, created_at, updated_at
            FROM products
            ORDER BY name
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates the catalog price of a product.
    ///
    /// Past orders are unaffected: their items carry the unit price
    /// snapshot taken at checkout time.
    pub async fn update_price(&self, id: &str, price_cents: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET price_cents = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Sets the stock level of a product (restock / correction).
    pub async fn update_stock(&self, id: &str, stock: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

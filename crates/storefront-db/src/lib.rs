//! # storefront-db
//!
//! SQLite persistence for the storefront, built on sqlx. This crate owns the
//! schema, the connection pool, and the repositories; the checkout crate
//! layers its transaction logic on top.
//!
//! Three rules shape everything here:
//!
//! 1. **Repositories map rows, they don't decide.** A repository method runs
//!    one statement and reports what happened. The guarded stock decrement
//!    returns `bool` instead of erroring precisely so the engine can decide
//!    what insufficient stock means for the whole cart.
//! 2. **Writes that must be atomic take an executor.** Methods involved in
//!    checkout accept the caller's transaction connection, so order, items,
//!    and stock movements commit or vanish together.
//! 3. **The schema travels with the binary.** Migrations under
//!    `migrations/sqlite/` are embedded at compile time and applied on open.
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./storefront.db")).await?;
//!
//! let product = db.products().get_by_id(&product_id).await?;
//! let history = db.orders().list_for_user(&user_id).await?;
//!
//! // Atomic multi-statement work:
//! let mut tx = db.pool().begin().await?;
//! let took = db.products().try_decrement_stock(&mut *tx, &product_id, 2).await?;
//! ```
//!
//! Modules: [`pool`] (open/configure), [`repository`] (products, orders,
//! users), [`migrations`] (embedded schema), [`error`] ([`DbError`]).

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::user::UserRepository;

//! # Repositories
//!
//! One repository per aggregate, each a thin struct over a pool clone. All
//! SQL in the crate lives in these three files, which keeps the statements
//! reviewable in one sitting.
//!
//! Methods come in two flavors:
//!
//! * **Pool methods** like `get_by_id` and `list_for_user` run on the shared
//!   pool and stand alone.
//! * **Executor methods** like `find` and `try_decrement_stock` take any
//!   `sqlx` executor, so the checkout engine can point them at its open
//!   transaction and have every statement share one BEGIN..COMMIT scope.
//!
//! ```text
//! CheckoutEngine ── begin() ──► Transaction
//!      │                            │
//!      ├── products.find(&mut *tx, id)
//!      ├── products.try_decrement_stock(&mut *tx, id, qty)
//!      ├── users.find(&mut *tx, user_id)
//!      └── orders.create_with_items(&mut tx, ...)  ── commit ──► durable
//! ```
//!
//! Contents: [`product::ProductRepository`] (catalog reads, guarded stock
//! decrement), [`order::OrderRepository`] (order + item creation, status
//! flips, history), [`user::UserRepository`] (buyer lookups).

pub mod order;
pub mod product;
pub mod user;

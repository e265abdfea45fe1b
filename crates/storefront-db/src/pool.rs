//! # Connection Pool
//!
//! Opens the SQLite database and hands out repository views over a shared
//! pool.
//!
//! ## How the pieces fit
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  DbConfig ──► Database::new ──► SqlitePool                       │
//! │                                    │                             │
//! │            ┌───────────────────────┼───────────────────────┐     │
//! │            ▼                       ▼                       ▼     │
//! │      db.products()           db.orders()             db.users()  │
//! │            │                       │                       │     │
//! │            └── single reads ───────┴── order history ──────┘     │
//! │                                                                  │
//! │      db.pool().begin() ──► checkout / payment transactions       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories are created per call and own a pool clone, so callers never
//! fight the borrow checker over a long-lived handle. Anything that must be
//! atomic (a checkout writing stock, order, and items together) skips the
//! repositories' pool and runs against one transaction instead.
//!
//! The database is opened in WAL journal mode so order-history reads keep
//! working while a checkout commits. SQLite still allows only one writer at
//! a time; the busy timeout makes a second writer queue rather than error.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::order::OrderRepository;
use crate::repository::product::ProductRepository;
use crate::repository::user::UserRepository;

// =============================================================================
// Configuration
// =============================================================================

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for opening the storefront database.
///
/// Built with a consuming builder so call sites read as one expression:
///
/// ```rust,ignore
/// let config = DbConfig::new("./data/storefront.db")
///     .max_connections(8)
///     .connect_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Location of the database file. `:memory:` opens a throwaway database.
    pub database_path: PathBuf,

    /// Upper bound on pooled connections (default 8).
    pub max_connections: u32,

    /// Connections kept warm even when idle (default 1).
    pub min_connections: u32,

    /// How long an acquire may wait before failing (default 30s).
    pub connect_timeout: Duration,

    /// Idle time after which a surplus connection is dropped (default 10min).
    pub idle_timeout: Duration,

    /// Apply pending migrations during `Database::new` (default true).
    pub run_migrations: bool,
}

impl DbConfig {
    /// Configuration for a database file at `path`, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 8,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Configuration for a private in-memory database.
    ///
    /// Every connection to `:memory:` gets its own blank database, so the
    /// pool is capped at one connection and all tasks share it. Tests lean
    /// on this: each call to `Database::new(DbConfig::in_memory())` is a
    /// fully isolated store.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    /// Overrides the pool's connection cap.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Overrides the number of connections kept warm.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Overrides the acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enables or disables automatic migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// SQLite options derived from this configuration.
    fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.database_path)
            .create_if_missing(true)
            // WAL keeps readers unblocked while a checkout commits.
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL pairs with WAL: fsync at checkpoint, not every commit.
            .synchronous(SqliteSynchronous::Normal)
            // Queue behind a concurrent writer instead of returning SQLITE_BUSY.
            .busy_timeout(BUSY_TIMEOUT)
            // Off by default in SQLite; the order_items schema relies on them.
            .foreign_keys(true)
    }
}

// =============================================================================
// Database handle
// =============================================================================

/// Shared handle to the storefront database.
///
/// Cloning is cheap (the pool is reference-counted), so the checkout engine,
/// the payment processor, and any API layer each keep their own copy.
/// Repository accessors return throwaway views:
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./storefront.db")).await?;
///
/// let product = db.products().get_by_id(&product_id).await?;
/// let history = db.orders().list_for_user(&user_id).await?;
/// ```
///
/// Multi-statement work goes through [`Database::pool`] and `begin()`, with
/// repository methods joining the transaction as executors.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database described by `config`.
    ///
    /// Creates the file when missing, applies the storefront's SQLite
    /// pragmas, builds the pool, and (unless disabled) brings the schema up
    /// to date.
    ///
    /// ## Returns
    /// * `Ok(Database)` - Pool ready, schema current
    /// * `Err(DbError)` - Could not connect or a migration failed
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening storefront database"
        );

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            max_connections = config.max_connections,
            "Connection pool ready"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies any migrations not yet recorded in `_sqlx_migrations`.
    ///
    /// Safe to call repeatedly; already-applied migrations are skipped.
    /// `Database::new` calls this unless the config disables it.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// The raw connection pool, for transactions and one-off queries.
    ///
    /// Checkout and payment open their transactions here. Plain reads are
    /// better served by the repository accessors below.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Catalog access: lookups, stock guards, listings.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Order access: creation, status flips, per-user history.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// User access: lookups by id and email.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Shuts the pool down. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing storefront database pool");
        self.pool.close().await;
    }

    /// Probes the database with a trivial query.
    ///
    /// Returns `false` when the pool is closed or the file has become
    /// unreachable.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

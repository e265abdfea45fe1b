//! # User Repository
//!
//! Database operations for buyers. Authentication is an external concern;
//! this repository only anchors orders to durable user rows.

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::User;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the email is already registered.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, email = %user.email, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, name, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // Rewrap with the offending value; SQLite's message only names
            // the column
            Err(e) => match DbError::from(e) {
                DbError::UniqueViolation { .. } => {
                    Err(DbError::duplicate("email", &user.email))
                }
                other => Err(other),
            },
        }
    }

    /// Gets a user by ID from the pool.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        self.find(&self.pool, id).await
    }

    /// Gets a user by ID on the given executor.
    ///
    /// The checkout engine resolves the buyer inside its transaction with
    /// `find(&mut *tx, ...)` so the whole checkout reads one consistent
    /// snapshot.
    pub async fn find<'e, E>(&self, executor: E, id: &str) -> DbResult<Option<User>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Gets a user by email.
    ///
    /// Used by the seed binary to keep reseeding idempotent.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

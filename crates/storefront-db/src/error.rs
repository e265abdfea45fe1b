//! # Database Errors
//!
//! One error type for everything that can go wrong between a repository call
//! and SQLite. Raw `sqlx::Error` values never escape this crate; the `From`
//! impl below sorts them into variants the checkout and payment flows can
//! match on:
//!
//! ```text
//! sqlx::Error::RowNotFound   -> NotFound
//! sqlx::Error::Database      -> UniqueViolation / ForeignKeyViolation / QueryFailed
//!                               (classified from the SQLite message text)
//! sqlx::Error::PoolTimedOut  -> PoolExhausted
//! sqlx::Error::PoolClosed    -> ConnectionFailed
//! anything else              -> Internal
//! ```
//!
//! Callers one level up wrap this again (`CheckoutError::Persistence`,
//! `PaymentError::Persistence`) so business errors and infrastructure errors
//! stay distinguishable all the way to the surface.

use thiserror::Error;

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// A row that a write path required does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write. The storefront's only unique
    /// column today is `users.email`; the user repository rewrites `field`
    /// and `value` to the friendly form before this reaches a caller.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A write referenced a missing parent row, e.g. an order for an
    /// unknown `user_id`. Checkout validates first, so seeing this means a
    /// write path skipped its lookup.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Could not open the database or the pool is gone.
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    /// A schema migration did not apply cleanly.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement for any non-constraint reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Every pooled connection was busy for the whole acquire timeout.
    #[error("No database connection available")]
    PoolExhausted,

    /// Catch-all for sqlx errors with no better classification.
    #[error("Unexpected database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Shorthand for [`DbError::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Shorthand for [`DbError::UniqueViolation`] with a known value.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Sorts a SQLite error message into a structured variant.
///
/// SQLite reports which constraint fired only through message text, in the
/// shapes `UNIQUE constraint failed: <table>.<column>` and
/// `FOREIGN KEY constraint failed`.
fn classify_database_error(message: &str) -> DbError {
    if let Some(column) = message.split("UNIQUE constraint failed: ").nth(1) {
        return DbError::UniqueViolation {
            field: column.trim().to_string(),
            value: "unknown".to_string(),
        };
    }

    if message.contains("FOREIGN KEY constraint failed") {
        return DbError::ForeignKeyViolation {
            message: message.to_string(),
        };
    }

    DbError::QueryFailed(message.to_string())
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => classify_database_error(db_err.message()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result alias used by every repository method.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_message_is_classified_with_column() {
        let err = classify_database_error("UNIQUE constraint failed: users.email");
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "users.email");
                assert_eq!(value, "unknown");
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_foreign_key_message_is_classified() {
        let err = classify_database_error("FOREIGN KEY constraint failed");
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[test]
    fn test_other_messages_fall_back_to_query_failed() {
        let err = classify_database_error("no such table: carts");
        assert!(matches!(err, DbError::QueryFailed(msg) if msg.contains("carts")));
    }

    #[test]
    fn test_helper_constructors_format() {
        assert_eq!(
            DbError::not_found("Product", "p-42").to_string(),
            "Product not found: p-42"
        );
        assert_eq!(
            DbError::duplicate("email", "ada@example.com").to_string(),
            "Duplicate email: 'ada@example.com' already exists"
        );
    }
}

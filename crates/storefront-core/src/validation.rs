//! # Input Validation
//!
//! Business-rule checks that run before any transaction is opened.
//!
//! The storefront validates three times over, and each layer catches a
//! different class of mistake:
//!
//! 1. Deserialization at the caller surface rejects malformed payloads.
//! 2. This module rejects values that parse fine but break a business rule,
//!    such as a zero quantity or a quantity above the per-line cap.
//! 3. SQLite CHECK, UNIQUE, and FK constraints stop anything that slips
//!    through a future write path.
//!
//! A checkout that fails here never touches the database, so there is
//! nothing to roll back.
//!
//! ```rust
//! use storefront_core::validation::validate_quantity;
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(validate_quantity(1_000).is_err());
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result alias for the validators below.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Checks a cart line quantity against the ordering rules.
///
/// Quantities run from 1 to [`MAX_ITEM_QUANTITY`] inclusive. The checkout
/// engine calls this for every line before opening its transaction, so a
/// single bad line rejects the whole cart without any database work.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    match qty {
        q if q <= 0 => Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }),
        q if q > MAX_ITEM_QUANTITY => Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        }),
        _ => Ok(()),
    }
}

/// Checks a price in cents. Zero is a legal price (promotional freebies);
/// negative is not.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents >= 0 {
        return Ok(());
    }

    Err(ValidationError::OutOfRange {
        field: "price".to_string(),
        min: 0,
        max: i64::MAX,
    })
}

// =============================================================================
// String Validators
// =============================================================================

/// Maximum length for a product name.
const MAX_NAME_LEN: usize = 200;

/// Maximum length for an email address, per RFC 5321.
const MAX_EMAIL_LEN: usize = 254;

/// Checks a catalog product name: non-blank after trimming, at most
/// [`MAX_NAME_LEN`] bytes.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if trimmed.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Shallow email check: non-blank, within the RFC length limit, and shaped
/// like `local@domain`.
///
/// Deliverability is an identity-provider concern; this only keeps obvious
/// garbage out of the UNIQUE `users.email` column.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if trimmed.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    let well_formed = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like local@domain".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Id Validators
// =============================================================================

/// Checks that an entity id is a well-formed UUID.
///
/// Every row id in the store is minted from a v4 UUID, so a string that
/// fails to parse can never name a row. Boundary code can reject such an
/// id up front instead of paying for a lookup that is guaranteed to miss.
pub fn validate_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    match uuid::Uuid::parse_str(id) {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must be a UUID".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(matches!(
            validate_quantity(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_quantity(-3),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_quantity(MAX_ITEM_QUANTITY + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_price_allows_zero_rejects_negative() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(28_500_000).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_product_name_rules() {
        assert!(validate_product_name("JUKI RS-1 Pick and Place").is_ok());
        assert!(validate_product_name("  padded  ").is_ok());

        assert!(matches!(
            validate_product_name(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_product_name("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_product_name(&"x".repeat(MAX_NAME_LEN + 1)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("buyer@example.com").is_ok());
        assert!(validate_email("  buyer@example.com  ").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("buyer@").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_id_must_be_a_uuid() {
        assert!(validate_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_id(&uuid::Uuid::new_v4().to_string()).is_ok());

        assert!(matches!(
            validate_id(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_id("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_id("not-an-id"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_id("550e8400-e29b-41d4"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}

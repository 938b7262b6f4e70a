//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants). Numeric engine failures live in the pricing/forecast crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. non-positive ingredient cost).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

/// Require a finite, strictly positive number.
pub fn ensure_positive(field: &str, value: f64) -> DomainResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DomainError::validation(format!(
            "{field} must be a finite positive number (got {value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_positive_rejects_zero_negative_and_nan() {
        assert!(ensure_positive("cost", 0.0).is_err());
        assert!(ensure_positive("cost", -1.0).is_err());
        assert!(ensure_positive("cost", f64::NAN).is_err());
        assert!(ensure_positive("cost", f64::INFINITY).is_err());
        assert_eq!(ensure_positive("cost", 4.5).unwrap(), 4.5);
    }

    #[test]
    fn validation_message_names_the_field() {
        let err = ensure_positive("ingredient_cost", 0.0).unwrap_err();
        assert!(err.to_string().contains("ingredient_cost"));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: accepted exactly when finite and strictly positive.
            #[test]
            fn accepts_exactly_finite_positive_values(value in any::<f64>()) {
                let accepted = ensure_positive("value", value).is_ok();
                prop_assert_eq!(accepted, value.is_finite() && value > 0.0);
            }
        }
    }
}

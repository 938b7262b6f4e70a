use thiserror::Error;

use bistro_core::DomainError;

/// Demand model failures.
///
/// These never reach callers of `DemandModel::predict`: they select the
/// closed-form fallback and are logged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("demand model is not trained")]
    Untrained,

    #[error("invalid day of week: {0} (expected 0..=6)")]
    InvalidDayOfWeek(u8),

    #[error("invalid model input: {0} must be finite and positive")]
    InvalidInput(&'static str),

    #[error("model produced a non-finite prediction")]
    NonFiniteOutput,

    #[error("insufficient training data: need {required}, got {provided}")]
    InsufficientData { required: usize, provided: usize },

    #[error("normal equations are singular")]
    Singular,

    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),
}

/// Failures surfaced by the optimizer and the batch layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no usable prediction across the price grid ({points} points evaluated)")]
    EmptyResult { points: usize },

    #[error("menu item not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl PricingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<DomainError> for PricingError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
            DomainError::NotFound(what) => Self::NotFound(what),
            DomainError::InvariantViolation(msg) => Self::Internal(msg),
        }
    }
}

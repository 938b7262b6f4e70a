use thiserror::Error;

use bistro_core::DomainError;

/// Ensemble failures.
///
/// `DemandForecastEnsemble::forecast` never returns these: they select the
/// fixed fallback forecast and are logged. `try_forecast` exposes them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("invalid dish description: {0}")]
    InvalidDish(String),

    #[error("invalid sales history: {0}")]
    InvalidHistory(String),

    #[error("invalid ensemble configuration: {0}")]
    InvalidConfig(String),

    #[error("forecast computation failed: {0}")]
    Computation(String),
}

impl ForecastError {
    pub fn invalid_dish(msg: impl Into<String>) -> Self {
        Self::InvalidDish(msg.into())
    }

    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }
}

impl From<DomainError> for ForecastError {
    fn from(e: DomainError) -> Self {
        Self::InvalidDish(e.to_string())
    }
}

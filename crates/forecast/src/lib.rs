//! `bistro-forecast`
//!
//! **Responsibility:** cold-start demand forecasts for dishes without a
//! pricing history (new menu proposals).
//!
//! A forecast combines a base demand estimate with seasonal, trend,
//! competitor, preference and price-sensitivity heuristics, scores risk and
//! confidence, and derives a pessimistic/realistic/optimistic band.

pub mod config;
pub mod dish;
pub mod ensemble;
pub mod error;
pub mod result;
pub mod risk;
pub mod signals;
pub mod submodels;

pub use config::{CategoryTable, EnsembleConfig, EnsembleWeights, FallbackForecast, PriceBand};
pub use dish::{DishDescription, ForecastPeriod, ForecastRequest, HistoricalSample};
pub use ensemble::DemandForecastEnsemble;
pub use error::ForecastError;
pub use result::{DemandScenarios, ForecastMethod, ForecastResult};
pub use risk::RiskFactor;
pub use signals::Season;

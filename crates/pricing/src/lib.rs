//! `bistro-pricing`
//!
//! **Responsibility:** demand prediction and price optimization for menu items.
//!
//! - `DemandModel`: regression fitted once at startup, with a closed-form
//!   elasticity fallback so prediction never fails.
//! - `PriceOptimizer`: price-grid sweep, goal-based selection, psychological rounding.
//! - `BatchOptimizer`: runs the optimizer over many items with per-item isolation.
//! - `PricingEngine`: the startup-built service that owns the fitted model and
//!   the market reference prices.
//!
//! Everything here is synchronous and CPU-bound; no I/O happens in this crate.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod model;
pub mod optimizer;
pub mod regression;
pub mod result;
pub mod rounding;
pub mod scenario;
pub mod training;

pub use batch::{BatchOptimizer, BatchReport, ItemOutcome};
pub use catalog::{InMemoryMenuCatalog, MarketPriceSource, MarketPriceTable, MenuCatalog};
pub use config::{CategoryBaseDemand, DemandModelConfig, OptimizerConfig, PricingConfig};
pub use engine::PricingEngine;
pub use error::{ModelError, PricingError};
pub use model::{DemandModel, FitReport};
pub use optimizer::{BusinessGoal, OptimizeRequest, PriceBounds, PriceOptimizer};
pub use result::{BaselineComparison, ChartSeries, OptimizationResult, PricePoint};
pub use rounding::psychological_price;
pub use scenario::{DemandPrediction, PredictionSource, PricingContext, PricingScenario};
pub use training::TrainingSample;

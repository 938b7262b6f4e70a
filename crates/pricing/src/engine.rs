//! Startup-built pricing service.
//!
//! Owns the fitted demand model and the market reference prices; everything
//! else borrows from it. Build it once and share it (`&PricingEngine` is `Sync`).

use tracing::info;

use bistro_core::{MenuItem, OrFallback};

use crate::batch::{BatchOptimizer, scenario_for_item};
use crate::catalog::{MarketPriceTable, MenuCatalog};
use crate::config::{DemandModelConfig, PricingConfig};
use crate::error::PricingError;
use crate::model::{DemandModel, FitReport};
use crate::optimizer::{OptimizeRequest, PriceOptimizer};
use crate::result::OptimizationResult;
use crate::scenario::{PricingContext, PricingScenario};

#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
    model: DemandModel,
    market_prices: MarketPriceTable,
    fit_report: Option<FitReport>,
}

impl PricingEngine {
    /// Train the demand model from `config`.
    ///
    /// A training failure does not abort startup: the engine runs on the
    /// closed-form fallback and `fit_report()` stays `None`. A model config
    /// that fails validation is replaced by the defaults for that fallback.
    pub fn bootstrap(config: PricingConfig) -> Self {
        let (model, fit_report) = DemandModel::train(config.model.clone())
            .map(|(model, report)| (model, Some(report)))
            .or_fallback("pricing_engine.bootstrap", || {
                let model_config = match config.model.validate() {
                    Ok(()) => config.model.clone(),
                    Err(_) => DemandModelConfig::default(),
                };
                (DemandModel::untrained(model_config), None)
            });

        info!(
            trained = model.is_trained(),
            samples = config.model.training_samples,
            seed = config.model.seed,
            "pricing engine ready"
        );

        Self {
            config,
            model,
            market_prices: MarketPriceTable::new(),
            fit_report,
        }
    }

    /// Use an already-fitted (or untrained) model instead of training one.
    pub fn with_model(config: PricingConfig, model: DemandModel) -> Self {
        Self {
            config,
            model,
            market_prices: MarketPriceTable::new(),
            fit_report: None,
        }
    }

    pub fn with_market_prices(mut self, market_prices: MarketPriceTable) -> Self {
        self.market_prices = market_prices;
        self
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn model(&self) -> &DemandModel {
        &self.model
    }

    pub fn market_prices(&self) -> &MarketPriceTable {
        &self.market_prices
    }

    pub fn fit_report(&self) -> Option<&FitReport> {
        self.fit_report.as_ref()
    }

    pub fn optimizer(&self) -> PriceOptimizer<'_> {
        PriceOptimizer::new(&self.model, self.config.optimizer.clone())
    }

    pub fn scenario_for(
        &self,
        item: &MenuItem,
        context: PricingContext,
    ) -> Result<PricingScenario, PricingError> {
        scenario_for_item(
            item,
            &self.market_prices,
            context,
            self.config.optimizer.default_market_markup,
        )
    }

    pub fn optimize_item(
        &self,
        item: &MenuItem,
        context: PricingContext,
        request: &OptimizeRequest,
    ) -> Result<OptimizationResult, PricingError> {
        let scenario = self.scenario_for(item, context)?;
        self.optimizer().optimize(&scenario, request)
    }

    pub fn batch<'a, C>(&'a self, catalog: &'a C) -> BatchOptimizer<'a, C, MarketPriceTable>
    where
        C: MenuCatalog + ?Sized,
    {
        BatchOptimizer::new(self.optimizer(), catalog, &self.market_prices)
    }
}

//! Demand forecast for new or hypothetical dishes.
//!
//! Six estimators (base demand plus five heuristic sub-models) are combined
//! with fixed linear weights. Any failure yields the fixed fallback forecast,
//! so callers always receive a usable result.

use std::collections::BTreeMap;

use tracing::{debug, info};

use bistro_core::OrFallback;

use crate::config::EnsembleConfig;
use crate::dish::ForecastRequest;
use crate::error::ForecastError;
use crate::result::{DemandScenarios, ForecastMethod, ForecastResult};
use crate::risk;
use crate::signals::{KeywordText, Season};
use crate::submodels::SubModelEstimates;

const FALLBACK_RISK: &str = "Forecast unavailable; generic estimate used";
const FALLBACK_RECOMMENDATION: &str = "Collect sales data after launch to refine the forecast";

#[derive(Debug, Clone, Default)]
pub struct DemandForecastEnsemble {
    config: EnsembleConfig,
}

impl DemandForecastEnsemble {
    pub fn new(config: EnsembleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    /// Never fails: errors are logged and replaced by the fallback forecast.
    pub fn forecast(&self, request: &ForecastRequest) -> ForecastResult {
        self.try_forecast(request)
            .or_fallback("forecast_ensemble.forecast", || {
                self.fallback_forecast(&request.dish.name)
            })
    }

    pub fn try_forecast(&self, request: &ForecastRequest) -> Result<ForecastResult, ForecastError> {
        self.config.validate()?;
        let dish = &request.dish;
        dish.validate()?;

        let text = KeywordText::of_dish(dish);
        let season = Season::from_date(request.as_of);
        let estimates = SubModelEstimates::evaluate(&self.config, dish, &text, season, &request.history)?;

        let weekly = estimates.combine(&self.config);
        if !weekly.is_finite() || weekly < 0.0 {
            return Err(ForecastError::computation(format!(
                "combined estimate is {weekly}"
            )));
        }
        let predicted = weekly * request.period.weekly_scale();

        let risks = risk::assess(&self.config, dish, &text);
        let confidence = risk::confidence(&self.config, &risks, dish);
        let variance = (1.0 - confidence) * self.config.scenario_spread;
        let scenarios = DemandScenarios::around(predicted, variance);

        let model_breakdown: BTreeMap<String, f64> = estimates
            .factors()
            .into_iter()
            .map(|(name, factor)| (name.to_string(), factor))
            .collect();

        debug!(
            dish = %dish.name,
            season = ?season,
            base = estimates.base,
            seasonal = estimates.seasonal,
            trend = estimates.trend,
            competitor = estimates.competitor,
            preference = estimates.preference,
            price_sensitivity = estimates.price_sensitivity,
            "sub-model estimates"
        );
        info!(
            dish = %dish.name,
            period = ?request.period,
            predicted = scenarios.realistic,
            confidence,
            risks = risks.len(),
            "demand forecast computed"
        );

        Ok(ForecastResult {
            dish_name: dish.name.clone(),
            predicted_demand: scenarios.realistic,
            confidence_score: confidence,
            scenarios,
            risk_factors: risk::describe(&risks),
            recommendations: risk::recommendations(&self.config, weekly, &risks),
            model_breakdown,
            method: ForecastMethod::Ensemble,
        })
    }

    /// The fixed forecast (25 units, confidence 0.5, band 15/25/35 by default).
    pub fn fallback_forecast(&self, dish_name: &str) -> ForecastResult {
        let fb = &self.config.fallback;
        let (min_confidence, max_confidence) = self.config.confidence_range();
        // Keep the band ordered even if the configured numbers are not.
        let mut band = [fb.pessimistic.max(1), fb.demand.max(1), fb.optimistic.max(1)];
        band.sort_unstable();

        ForecastResult {
            dish_name: dish_name.to_string(),
            predicted_demand: band[1],
            confidence_score: fb.confidence.max(min_confidence).min(max_confidence),
            scenarios: DemandScenarios {
                pessimistic: band[0],
                realistic: band[1],
                optimistic: band[2],
            },
            risk_factors: vec![FALLBACK_RISK.to_string()],
            recommendations: vec![FALLBACK_RECOMMENDATION.to_string()],
            model_breakdown: BTreeMap::new(),
            method: ForecastMethod::Fallback,
        }
    }
}

//! Demand model: units sold for a menu item at a given price and context.
//!
//! Features per scenario:
//! - intercept, `price/cost - 1`, `(price/cost - 1)^2`
//! - weekend and promotion indicators
//! - `price/market - 1`
//! - one-hot columns for the label-encoded category, cuisine type and day of week
//!
//! Prediction never fails: an untrained model or an invalid scenario falls
//! back to `base - decay * (price/cost - 1)^2` (floored), and every result is
//! clamped to `[min_quantity, max_quantity]`.

use serde::{Deserialize, Serialize};
use tracing::info;

use bistro_core::OrFallback;

use crate::config::DemandModelConfig;
use crate::encoding::LabelEncoder;
use crate::error::ModelError;
use crate::regression::RidgeRegression;
use crate::scenario::{DemandPrediction, PricingScenario};
use crate::training::{TrainingSample, synthetic_samples};

const NUMERIC_FEATURES: usize = 6;
const DAYS_PER_WEEK: usize = 7;

/// Goodness of fit on the training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub samples: usize,
    pub features: usize,
    pub r_squared: f64,
    pub rmse: f64,
}

/// Column layout shared by training and prediction.
#[derive(Debug, Clone, PartialEq)]
struct FeatureSpace {
    categories: LabelEncoder,
    cuisines: LabelEncoder,
}

impl FeatureSpace {
    fn from_samples(samples: &[TrainingSample]) -> Self {
        Self {
            categories: LabelEncoder::fit(samples.iter().map(|s| s.scenario.category.as_str())),
            cuisines: LabelEncoder::fit(samples.iter().map(|s| s.scenario.cuisine_type.as_str())),
        }
    }

    fn width(&self) -> usize {
        NUMERIC_FEATURES + self.categories.len() + self.cuisines.len() + DAYS_PER_WEEK
    }

    fn features(&self, s: &PricingScenario) -> Result<Vec<f64>, ModelError> {
        check_inputs(s)?;

        let ratio = s.cost_ratio_deviation();
        let mut row = Vec::with_capacity(self.width());
        row.extend([
            1.0,
            ratio,
            ratio * ratio,
            indicator(s.is_weekend),
            indicator(s.has_promotion),
            s.market_ratio_deviation(),
        ]);
        self.categories.one_hot_into(&s.category, &mut row);
        self.cuisines.one_hot_into(&s.cuisine_type, &mut row);
        row.extend((0..DAYS_PER_WEEK).map(|d| indicator(d == s.day_of_week as usize)));
        Ok(row)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FittedModel {
    space: FeatureSpace,
    regression: RidgeRegression,
}

/// Read-only after construction; share one instance across callers.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandModel {
    config: DemandModelConfig,
    fitted: Option<FittedModel>,
}

impl DemandModel {
    /// A model that always answers with the closed-form fallback.
    pub fn untrained(config: DemandModelConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    /// Fit on seeded synthetic samples (`config.seed`, `config.training_samples`).
    pub fn train(config: DemandModelConfig) -> Result<(Self, FitReport), ModelError> {
        config.validate()?;
        let samples = synthetic_samples(&config)?;
        Self::fit(config, &samples)
    }

    /// Fit on caller-supplied samples (e.g. historical sales).
    pub fn fit(
        config: DemandModelConfig,
        samples: &[TrainingSample],
    ) -> Result<(Self, FitReport), ModelError> {
        config.validate()?;
        let space = FeatureSpace::from_samples(samples);

        let required = space.width() + 1;
        if samples.len() < required {
            return Err(ModelError::InsufficientData {
                required,
                provided: samples.len(),
            });
        }

        let mut rows = Vec::with_capacity(samples.len());
        let mut targets = Vec::with_capacity(samples.len());
        for sample in samples {
            if !sample.units_sold.is_finite() {
                return Err(ModelError::InvalidInput("units_sold"));
            }
            rows.push(space.features(&sample.scenario)?);
            targets.push(sample.units_sold);
        }

        let regression = RidgeRegression::fit(&rows, &targets, config.ridge_lambda)?;
        let report = fit_report(&regression, &rows, &targets);

        info!(
            samples = report.samples,
            features = report.features,
            r_squared = report.r_squared,
            rmse = report.rmse,
            "demand model fitted"
        );

        Ok((
            Self {
                config,
                fitted: Some(FittedModel { space, regression }),
            },
            report,
        ))
    }

    pub fn config(&self) -> &DemandModelConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    /// Predicted units, clamped. Falls back (and logs why) instead of failing.
    pub fn predict(&self, scenario: &PricingScenario) -> DemandPrediction {
        self.try_predict(scenario)
            .map(|q| DemandPrediction::model(self.config.clamp_quantity(q)))
            .or_fallback("demand_model.predict", || {
                DemandPrediction::fallback(self.config.clamp_quantity(self.fallback_quantity(scenario)))
            })
    }

    /// Raw (unclamped) regression output.
    pub fn try_predict(&self, scenario: &PricingScenario) -> Result<f64, ModelError> {
        let fitted = self.fitted.as_ref().ok_or(ModelError::Untrained)?;
        let row = fitted.space.features(scenario)?;
        let q = fitted.regression.predict(&row);
        if q.is_finite() {
            Ok(q)
        } else {
            Err(ModelError::NonFiniteOutput)
        }
    }

    /// `fallback_base_demand - fallback_decay * (price/cost - 1)^2`, floored.
    pub fn fallback_quantity(&self, scenario: &PricingScenario) -> f64 {
        let cfg = &self.config;
        if !(scenario.ingredient_cost.is_finite()
            && scenario.ingredient_cost > 0.0
            && scenario.price.is_finite())
        {
            return cfg.fallback_floor;
        }
        let ratio = scenario.cost_ratio_deviation();
        (cfg.fallback_base_demand - cfg.fallback_decay * ratio * ratio).max(cfg.fallback_floor)
    }
}

fn check_inputs(s: &PricingScenario) -> Result<(), ModelError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(s.price) {
        return Err(ModelError::InvalidInput("price"));
    }
    if !positive(s.ingredient_cost) {
        return Err(ModelError::InvalidInput("ingredient_cost"));
    }
    if !positive(s.observed_market_price) {
        return Err(ModelError::InvalidInput("observed_market_price"));
    }
    if s.day_of_week as usize >= DAYS_PER_WEEK {
        return Err(ModelError::InvalidDayOfWeek(s.day_of_week));
    }
    Ok(())
}

fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

fn fit_report(regression: &RidgeRegression, rows: &[Vec<f64>], targets: &[f64]) -> FitReport {
    let n = targets.len() as f64;
    let mean = targets.iter().sum::<f64>() / n;
    let (ss_res, ss_tot) = rows
        .iter()
        .zip(targets)
        .fold((0.0, 0.0), |(res, tot), (row, &y)| {
            let e = y - regression.predict(row);
            (res + e * e, tot + (y - mean) * (y - mean))
        });

    FitReport {
        samples: targets.len(),
        features: regression.coefficients().len(),
        r_squared: if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 },
        rmse: (ss_res / n).sqrt(),
    }
}

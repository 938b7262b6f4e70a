//! Tunable constants for the demand model and the optimizer.
//!
//! The numbers are empirical (no derivation exists for them); they are kept as
//! named fields so deployments can override them from a file or the environment.

use serde::{Deserialize, Serialize};
use tracing::warn;

use bistro_core::CategoryClass;

use crate::error::ModelError;

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub model: DemandModelConfig,
    pub optimizer: OptimizerConfig,
}

impl PricingConfig {
    /// Defaults, overridden by `BISTRO_MODEL_SEED`, `BISTRO_MODEL_SAMPLES`
    /// and `BISTRO_ROUNDING_TOLERANCE` when set.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(seed) = env_parse::<u64>("BISTRO_MODEL_SEED") {
            self.model.seed = seed;
        }
        if let Some(samples) = env_parse::<usize>("BISTRO_MODEL_SAMPLES") {
            self.model.training_samples = samples;
        }
        if let Some(tolerance) = env_parse::<f64>("BISTRO_ROUNDING_TOLERANCE") {
            self.optimizer.rounding_tolerance = tolerance;
        }
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &'static str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable config override");
            None
        }
    }
}

/// Baseline weekly units per category class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryBaseDemand {
    pub appetizer: f64,
    pub main_course: f64,
    pub dessert: f64,
    pub beverage: f64,
    pub side: f64,
    pub other: f64,
}

impl CategoryBaseDemand {
    pub fn for_class(&self, class: CategoryClass) -> f64 {
        match class {
            CategoryClass::Appetizer => self.appetizer,
            CategoryClass::MainCourse => self.main_course,
            CategoryClass::Dessert => self.dessert,
            CategoryClass::Beverage => self.beverage,
            CategoryClass::Side => self.side,
            CategoryClass::Other => self.other,
        }
    }
}

impl Default for CategoryBaseDemand {
    fn default() -> Self {
        Self {
            appetizer: 100.0,
            main_course: 120.0,
            dessert: 90.0,
            beverage: 130.0,
            side: 80.0,
            other: 100.0,
        }
    }
}

/// Demand model: synthetic data generation, fitting, clamping and fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandModelConfig {
    pub base_demand: CategoryBaseDemand,
    /// Penalty on `(price / cost - 1)^2`.
    pub decay_coefficient: f64,
    pub weekend_uplift: f64,
    pub promotion_uplift: f64,
    /// `k` in `-k * (price / market_price - 1)`.
    pub market_sensitivity: f64,
    pub noise_std: f64,
    pub training_samples: usize,
    pub seed: u64,
    pub ridge_lambda: f64,
    /// Synthetic ingredient cost range.
    pub synthetic_cost_range: (f64, f64),
    /// Synthetic price range as a multiple of cost.
    pub synthetic_markup_range: (f64, f64),
    /// Synthetic market price range as a multiple of cost.
    pub synthetic_market_markup_range: (f64, f64),
    pub synthetic_promotion_rate: f64,
    pub min_quantity: f64,
    pub max_quantity: f64,
    pub fallback_base_demand: f64,
    pub fallback_decay: f64,
    pub fallback_floor: f64,
}

impl Default for DemandModelConfig {
    fn default() -> Self {
        Self {
            base_demand: CategoryBaseDemand::default(),
            decay_coefficient: 12.0,
            weekend_uplift: 15.0,
            promotion_uplift: 10.0,
            market_sensitivity: 20.0,
            noise_std: 4.0,
            training_samples: 2_000,
            seed: 42,
            ridge_lambda: 1e-3,
            synthetic_cost_range: (1.5, 12.0),
            synthetic_markup_range: (1.0, 3.5),
            synthetic_market_markup_range: (2.2, 3.5),
            synthetic_promotion_rate: 0.2,
            min_quantity: 1.0,
            max_quantity: 500.0,
            fallback_base_demand: 100.0,
            fallback_decay: 12.0,
            fallback_floor: 5.0,
        }
    }
}

impl DemandModelConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_training_samples(mut self, samples: usize) -> Self {
        self.training_samples = samples;
        self
    }

    /// Clamp to `[min_quantity, max_quantity]`. Never panics, even on a
    /// misconfigured range; `validate` is what rejects one.
    pub fn clamp_quantity(&self, quantity: f64) -> f64 {
        quantity.max(self.min_quantity).min(self.max_quantity)
    }

    /// Quantity range and fallback constants must be usable before training.
    pub fn validate(&self) -> Result<(), ModelError> {
        let finite = [
            ("min_quantity", self.min_quantity),
            ("max_quantity", self.max_quantity),
            ("fallback_base_demand", self.fallback_base_demand),
            ("fallback_decay", self.fallback_decay),
            ("fallback_floor", self.fallback_floor),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::InvalidConfig(format!("{name} must be finite")));
        }
        if self.min_quantity < 0.0 || self.min_quantity > self.max_quantity {
            return Err(ModelError::InvalidConfig(format!(
                "quantity range {}..{} is not ordered",
                self.min_quantity, self.max_quantity
            )));
        }
        Ok(())
    }
}

/// Price grid resolution, markup ceilings and rounding tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub default_increment: f64,
    /// Lowest tested price as a multiple of cost.
    pub min_markup: f64,
    /// Lowest tested price is at least `cost + min_margin`.
    pub min_margin: f64,
    pub beverage_markup_ceiling: f64,
    pub dessert_markup_ceiling: f64,
    pub default_markup_ceiling: f64,
    pub absolute_price_cap: f64,
    /// Derived ranges always span at least this much.
    pub min_span: f64,
    /// Width used when `price_end <= price_start`.
    pub inverted_range_span: f64,
    pub max_grid_points: usize,
    /// Rounded price is kept if its objective is within this fraction of the optimum.
    pub rounding_tolerance: f64,
    /// Market price assumed as `cost * default_market_markup` when none is observed.
    pub default_market_markup: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            default_increment: 0.25,
            min_markup: 1.2,
            min_margin: 0.5,
            beverage_markup_ceiling: 3.5,
            dessert_markup_ceiling: 4.0,
            default_markup_ceiling: 5.0,
            absolute_price_cap: 25.0,
            min_span: 2.0,
            inverted_range_span: 5.0,
            max_grid_points: 5_000,
            rounding_tolerance: 0.02,
            default_market_markup: 3.0,
        }
    }
}

impl OptimizerConfig {
    pub fn markup_ceiling(&self, class: CategoryClass) -> f64 {
        match class {
            CategoryClass::Beverage => self.beverage_markup_ceiling,
            CategoryClass::Dessert => self.dessert_markup_ceiling,
            _ => self.default_markup_ceiling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beverages_and_desserts_have_lower_ceilings_than_mains() {
        let cfg = OptimizerConfig::default();
        let main = cfg.markup_ceiling(CategoryClass::MainCourse);
        assert!(cfg.markup_ceiling(CategoryClass::Beverage) < main);
        assert!(cfg.markup_ceiling(CategoryClass::Dessert) < main);
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let cfg: PricingConfig =
            serde_json::from_str(r#"{ "optimizer": { "rounding_tolerance": 0.05 } }"#).unwrap();
        assert_eq!(cfg.optimizer.rounding_tolerance, 0.05);
        assert_eq!(cfg.optimizer.absolute_price_cap, 25.0);
        assert_eq!(cfg.model, DemandModelConfig::default());
    }

    #[test]
    fn clamp_quantity_respects_bounds() {
        let cfg = DemandModelConfig::default();
        assert_eq!(cfg.clamp_quantity(-20.0), 1.0);
        assert_eq!(cfg.clamp_quantity(10_000.0), 500.0);
        assert_eq!(cfg.clamp_quantity(42.0), 42.0);
    }

    #[test]
    fn inverted_quantity_range_is_rejected_without_panicking() {
        let cfg = DemandModelConfig {
            min_quantity: 600.0,
            ..DemandModelConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ModelError::InvalidConfig(_))));
        assert_eq!(cfg.clamp_quantity(42.0), 500.0);

        let nan = DemandModelConfig {
            max_quantity: f64::NAN,
            ..DemandModelConfig::default()
        };
        assert!(nan.validate().is_err());
        assert!(DemandModelConfig::default().validate().is_ok());
    }
}

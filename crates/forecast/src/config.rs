//! Ensemble constants.
//!
//! All of these are empirical; they are fields so a deployment can override
//! them from a config file.

use serde::{Deserialize, Serialize};

use bistro_core::CategoryClass;

use crate::error::ForecastError;

/// One number per category class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub appetizer: f64,
    pub main_course: f64,
    pub dessert: f64,
    pub beverage: f64,
    pub side: f64,
    pub other: f64,
}

impl CategoryTable {
    pub fn get(&self, class: CategoryClass) -> f64 {
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

/// Linear combination weights; must sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleWeights {
    pub base: f64,
    pub seasonal: f64,
    pub trend: f64,
    pub competitor: f64,
    pub preference: f64,
    pub price_sensitivity: f64,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            base: 0.20,
            seasonal: 0.20,
            trend: 0.25,
            competitor: 0.15,
            preference: 0.15,
            price_sensitivity: 0.05,
        }
    }
}

impl EnsembleWeights {
    pub fn sum(&self) -> f64 {
        self.base + self.seasonal + self.trend + self.competitor + self.preference + self.price_sensitivity
    }
}

/// Price below `below` gets `multiplier`; bands are checked in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub below: f64,
    pub multiplier: f64,
}

/// Fixed forecast returned when the ensemble cannot run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackForecast {
    pub demand: u32,
    pub confidence: f64,
    pub pessimistic: u32,
    pub optimistic: u32,
}

impl Default for FallbackForecast {
    fn default() -> Self {
        Self {
            demand: 25,
            confidence: 0.5,
            pessimistic: 15,
            optimistic: 35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    pub weights: EnsembleWeights,

    /// Weekly units by category before the price band is applied.
    pub base_demand: CategoryTable,
    pub price_bands: Vec<PriceBand>,
    /// Multiplier for prices above every band.
    pub top_band_multiplier: f64,

    pub seasonal_cap: f64,
    pub trend_cap: f64,
    /// Largest relative change the sales-history trend may apply.
    pub history_trend_limit: f64,
    pub preference_cap: f64,

    /// Competitor price tiers: below `budget_below` is budget, below `mid_below` mid.
    pub budget_below: f64,
    pub mid_below: f64,
    pub budget_multiplier: f64,
    pub mid_multiplier: f64,
    pub premium_multiplier: f64,
    pub competitiveness: CategoryTable,

    /// Signed demand elasticity per category (negative: dearer sells less).
    pub elasticity: CategoryTable,
    pub market_average_price: CategoryTable,
    pub price_sensitivity_floor: f64,

    pub high_price_risk: f64,
    pub low_price_risk: f64,
    pub max_ingredients: usize,

    pub confidence_base: f64,
    pub risk_penalty: f64,
    pub common_ingredient_bonus: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
    pub scenario_spread: f64,

    /// Weekly-equivalent demand thresholds for recommendations.
    pub low_demand_threshold: f64,
    pub high_demand_threshold: f64,
    pub max_recommendations: usize,

    pub fallback: FallbackForecast,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            weights: EnsembleWeights::default(),
            base_demand: CategoryTable {
                appetizer: 25.0,
                main_course: 30.0,
                dessert: 20.0,
                beverage: 35.0,
                side: 22.0,
                other: 25.0,
            },
            price_bands: vec![
                PriceBand { below: 10.0, multiplier: 1.2 },
                PriceBand { below: 20.0, multiplier: 1.0 },
                PriceBand { below: 30.0, multiplier: 0.85 },
            ],
            top_band_multiplier: 0.7,
            seasonal_cap: 2.0,
            trend_cap: 1.5,
            history_trend_limit: 0.5,
            preference_cap: 1.4,
            budget_below: 12.0,
            mid_below: 25.0,
            budget_multiplier: 1.1,
            mid_multiplier: 1.0,
            premium_multiplier: 0.85,
            competitiveness: CategoryTable {
                appetizer: 1.0,
                main_course: 0.9,
                dessert: 1.05,
                beverage: 0.95,
                side: 1.0,
                other: 1.0,
            },
            elasticity: CategoryTable {
                appetizer: -1.0,
                main_course: -0.8,
                dessert: -1.2,
                beverage: -1.5,
                side: -1.1,
                other: -1.0,
            },
            market_average_price: CategoryTable {
                appetizer: 10.0,
                main_course: 18.0,
                dessert: 8.0,
                beverage: 5.0,
                side: 6.0,
                other: 12.0,
            },
            price_sensitivity_floor: 0.3,
            high_price_risk: 30.0,
            low_price_risk: 8.0,
            max_ingredients: 8,
            confidence_base: 0.75,
            risk_penalty: 0.05,
            common_ingredient_bonus: 0.02,
            min_confidence: 0.3,
            max_confidence: 0.95,
            scenario_spread: 0.4,
            low_demand_threshold: 15.0,
            high_demand_threshold: 50.0,
            max_recommendations: 5,
            fallback: FallbackForecast::default(),
        }
    }
}

impl EnsembleConfig {
    /// Weekly base demand: category base times the price-band multiplier.
    pub fn base_demand(&self, class: CategoryClass, price: f64) -> f64 {
        let multiplier = self
            .price_bands
            .iter()
            .find(|band| price < band.below)
            .map_or(self.top_band_multiplier, |band| band.multiplier);
        self.base_demand.get(class) * multiplier
    }

    /// Configured confidence bounds, or the defaults when they are unusable.
    pub fn confidence_range(&self) -> (f64, f64) {
        if self.has_valid_confidence_range() {
            (self.min_confidence, self.max_confidence)
        } else {
            let defaults = Self::default();
            (defaults.min_confidence, defaults.max_confidence)
        }
    }

    fn has_valid_confidence_range(&self) -> bool {
        0.0 < self.min_confidence && self.min_confidence <= self.max_confidence && self.max_confidence < 1.0
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ForecastError::InvalidConfig(format!(
                "ensemble weights must sum to 1.0 (got {sum})"
            )));
        }
        if !self.has_valid_confidence_range() {
            return Err(ForecastError::InvalidConfig(format!(
                "confidence range {}..={} is invalid",
                self.min_confidence, self.max_confidence
            )));
        }
        if !(self.scenario_spread.is_finite() && self.scenario_spread >= 0.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "scenario_spread must be finite and non-negative (got {})",
                self.scenario_spread
            )));
        }
        let fb = &self.fallback;
        if !(fb.pessimistic <= fb.demand && fb.demand <= fb.optimistic) {
            return Err(ForecastError::InvalidConfig(
                "fallback scenarios must be ordered".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!((EnsembleWeights::default().sum() - 1.0).abs() < 1e-12);
        assert!(EnsembleConfig::default().validate().is_ok());
    }

    #[test]
    fn price_bands() {
        let cfg = EnsembleConfig::default();
        let main = CategoryClass::MainCourse;
        assert_eq!(cfg.base_demand(main, 9.99), 36.0);
        assert_eq!(cfg.base_demand(main, 12.0), 30.0);
        assert_eq!(cfg.base_demand(main, 25.0), 25.5);
        assert_eq!(cfg.base_demand(main, 45.0), 21.0);
    }

    #[test]
    fn unbalanced_weights_are_rejected() {
        let cfg = EnsembleConfig {
            weights: EnsembleWeights {
                trend: 0.5,
                ..EnsembleWeights::default()
            },
            ..EnsembleConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ForecastError::InvalidConfig(_))));
    }

    #[test]
    fn negative_or_nan_scenario_spread_is_rejected() {
        for spread in [-0.4, f64::NAN] {
            let cfg = EnsembleConfig {
                scenario_spread: spread,
                ..EnsembleConfig::default()
            };
            assert!(matches!(cfg.validate(), Err(ForecastError::InvalidConfig(_))));
        }
    }

    #[test]
    fn inverted_confidence_range_uses_default_bounds() {
        let cfg = EnsembleConfig {
            min_confidence: 0.9,
            max_confidence: 0.5,
            ..EnsembleConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert_eq!(cfg.confidence_range(), (0.3, 0.95));
        assert_eq!(EnsembleConfig::default().confidence_range(), (0.3, 0.95));
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let cfg: EnsembleConfig =
            serde_json::from_value(serde_json::json!({ "seasonal_cap": 1.8 })).unwrap();
        assert_eq!(cfg.seasonal_cap, 1.8);
        assert_eq!(cfg.weights, EnsembleWeights::default());
    }
}

//! Training data for the demand model.
//!
//! Historical data can be supplied directly as [`TrainingSample`]s. Without it,
//! the engine trains on seeded synthetic samples whose target follows the
//! pricing assumptions the optimizer relies on.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use bistro_core::CategoryClass;

use crate::config::DemandModelConfig;
use crate::error::ModelError;
use crate::scenario::{PricingContext, PricingScenario};

/// One observed (or generated) selling period for a menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub scenario: PricingScenario,
    pub units_sold: f64,
}

const SYNTHETIC_CATEGORIES: &[&str] = &["Appetizer", "Main Course", "Dessert", "Beverage", "Side"];

const SYNTHETIC_CUISINES: &[&str] = &[
    "American",
    "Italian",
    "Mexican",
    "Thai",
    "Indian",
    "French",
    "Japanese",
    "Mediterranean",
];

/// Noise-free demand the synthetic generator centres on.
///
/// `base(category) - decay * (price/cost - 1)^2 + weekend + promotion
///  - k * (price/market - 1)`
pub fn expected_units(config: &DemandModelConfig, scenario: &PricingScenario) -> f64 {
    let base = config
        .base_demand
        .for_class(CategoryClass::classify(&scenario.category));
    let ratio = scenario.cost_ratio_deviation();

    let mut units = base - config.decay_coefficient * ratio * ratio
        - config.market_sensitivity * scenario.market_ratio_deviation();
    if scenario.is_weekend {
        units += config.weekend_uplift;
    }
    if scenario.has_promotion {
        units += config.promotion_uplift;
    }
    units
}

/// Generate `config.training_samples` samples from `StdRng::seed_from_u64(config.seed)`.
///
/// Same config, same samples.
pub fn synthetic_samples(config: &DemandModelConfig) -> Result<Vec<TrainingSample>, ModelError> {
    let noise = Normal::new(0.0, config.noise_std)
        .map_err(|e| ModelError::InvalidConfig(format!("noise_std: {e}")))?;
    let cost_range = checked_range("synthetic_cost_range", config.synthetic_cost_range)?;
    let markup_range = checked_range("synthetic_markup_range", config.synthetic_markup_range)?;
    let market_range = checked_range(
        "synthetic_market_markup_range",
        config.synthetic_market_markup_range,
    )?;
    let promotion_rate = config.synthetic_promotion_rate.clamp(0.0, 1.0);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut samples = Vec::with_capacity(config.training_samples);

    for _ in 0..config.training_samples {
        let category = SYNTHETIC_CATEGORIES[rng.random_range(0..SYNTHETIC_CATEGORIES.len())];
        let cuisine = SYNTHETIC_CUISINES[rng.random_range(0..SYNTHETIC_CUISINES.len())];
        let cost = rng.random_range(cost_range.0..=cost_range.1);
        let market = cost * rng.random_range(market_range.0..=market_range.1);
        let price = cost * rng.random_range(markup_range.0..=markup_range.1);
        let context = PricingContext::new(rng.random_range(0..7), rng.random_bool(promotion_rate));

        let scenario = PricingScenario::new(cost, market, category, cuisine)
            .with_price(price)
            .with_context(context);
        let units = (expected_units(config, &scenario) + rng.sample(noise)).max(0.0);

        samples.push(TrainingSample {
            scenario,
            units_sold: units,
        });
    }

    Ok(samples)
}

fn checked_range(name: &str, (lo, hi): (f64, f64)) -> Result<(f64, f64), ModelError> {
    if lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi {
        Ok((lo, hi))
    } else {
        Err(ModelError::InvalidConfig(format!(
            "{name} must be a positive ascending range (got {lo}..{hi})"
        )))
    }
}

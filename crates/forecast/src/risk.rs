//! Risk tags, confidence and recommendations.

use core::fmt;

use crate::config::EnsembleConfig;
use crate::dish::DishDescription;
use crate::signals::{KeywordText, POLARIZING_INGREDIENTS, SEASONAL_INGREDIENTS, common_ingredient_count};

pub const LOW_RISK_PROFILE: &str = "Low risk profile";

#[derive(Debug, Clone, PartialEq)]
pub enum RiskFactor {
    HighPrice(f64),
    LowPrice(f64),
    PolarizingIngredients(Vec<&'static str>),
    ComplexRecipe(usize),
    SeasonalIngredients(Vec<&'static str>),
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskFactor::HighPrice(p) => write!(f, "High price point (${p:.2}) may limit demand"),
            RiskFactor::LowPrice(p) => write!(f, "Low price point (${p:.2}) may squeeze margins"),
            RiskFactor::PolarizingIngredients(found) => {
                write!(f, "Contains polarizing ingredients: {}", found.join(", "))
            }
            RiskFactor::ComplexRecipe(n) => write!(f, "Complex recipe with {n} ingredients"),
            RiskFactor::SeasonalIngredients(found) => {
                write!(f, "Relies on seasonal ingredients: {}", found.join(", "))
            }
        }
    }
}

/// Matched risk tags in a fixed order: price, ingredients, complexity, seasonality.
pub fn assess(config: &EnsembleConfig, dish: &DishDescription, text: &KeywordText) -> Vec<RiskFactor> {
    let mut risks = Vec::new();

    if dish.price > config.high_price_risk {
        risks.push(RiskFactor::HighPrice(dish.price));
    } else if dish.price < config.low_price_risk {
        risks.push(RiskFactor::LowPrice(dish.price));
    }

    let polarizing = text.matches(POLARIZING_INGREDIENTS);
    if !polarizing.is_empty() {
        risks.push(RiskFactor::PolarizingIngredients(polarizing));
    }

    if dish.ingredients.len() > config.max_ingredients {
        risks.push(RiskFactor::ComplexRecipe(dish.ingredients.len()));
    }

    let seasonal = text.matches(SEASONAL_INGREDIENTS);
    if !seasonal.is_empty() {
        risks.push(RiskFactor::SeasonalIngredients(seasonal));
    }

    risks
}

/// Risk strings for the result; `["Low risk profile"]` when nothing matched.
pub fn describe(risks: &[RiskFactor]) -> Vec<String> {
    if risks.is_empty() {
        vec![LOW_RISK_PROFILE.to_string()]
    } else {
        risks.iter().map(ToString::to_string).collect()
    }
}

/// `base - penalty * risks + bonus * common ingredients`, clamped.
pub fn confidence(config: &EnsembleConfig, risks: &[RiskFactor], dish: &DishDescription) -> f64 {
    let common = common_ingredient_count(&dish.ingredients);
    let raw = config.confidence_base - config.risk_penalty * risks.len() as f64
        + config.common_ingredient_bonus * common as f64;
    let (min, max) = config.confidence_range();
    raw.clamp(min, max)
}

/// At most `max_recommendations`, demand-driven first, then one per risk tag.
pub fn recommendations(config: &EnsembleConfig, weekly_demand: f64, risks: &[RiskFactor]) -> Vec<String> {
    let mut out: Vec<&str> = Vec::new();

    if weekly_demand < config.low_demand_threshold {
        out.push("Feature the dish or run an introductory promotion to build awareness");
        out.push("Review the price point against comparable dishes");
    } else if weekly_demand > config.high_demand_threshold {
        out.push("Plan inventory and prep capacity for high expected demand");
        out.push("Test a premium price point while demand is strong");
    }

    for risk in risks {
        let advice = match risk {
            RiskFactor::HighPrice(_) | RiskFactor::LowPrice(_) => {
                "Validate the price with a limited-time menu test"
            }
            RiskFactor::PolarizingIngredients(_) => {
                "Offer substitutions for polarizing ingredients"
            }
            RiskFactor::ComplexRecipe(_) => "Simplify the recipe to cut prep time and cost",
            RiskFactor::SeasonalIngredients(_) => {
                "Plan a seasonal rotation and secure ingredient supply"
            }
        };
        if !out.contains(&advice) {
            out.push(advice);
        }
    }

    if out.is_empty() {
        out.push("Demand outlook is steady; monitor sales after launch");
    }

    out.into_iter()
        .take(config.max_recommendations)
        .map(str::to_string)
        .collect()
}

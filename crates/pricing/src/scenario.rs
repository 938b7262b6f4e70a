use serde::{Deserialize, Serialize};

use bistro_core::error::ensure_positive;
use bistro_core::{DomainResult, MenuItem};

/// Day-of-week code convention: 0 = Monday ... 6 = Sunday.
pub const SATURDAY: u8 = 5;
pub const SUNDAY: u8 = 6;

/// Selling context shared by every price point of one optimization.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingContext {
    pub day_of_week: u8,
    pub has_promotion: bool,
}

impl PricingContext {
    pub fn new(day_of_week: u8, has_promotion: bool) -> Self {
        Self {
            day_of_week,
            has_promotion,
        }
    }

    pub fn is_weekend(&self) -> bool {
        self.day_of_week == SATURDAY || self.day_of_week == SUNDAY
    }
}

impl Default for PricingContext {
    /// Midweek, no promotion.
    fn default() -> Self {
        Self::new(2, false)
    }
}

/// One demand-model input: a candidate price plus its item and selling context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingScenario {
    /// Candidate (or current) price; `0.0` while unset.
    pub price: f64,
    pub ingredient_cost: f64,
    pub observed_market_price: f64,
    pub category: String,
    pub cuisine_type: String,
    pub is_weekend: bool,
    pub has_promotion: bool,
    pub day_of_week: u8,
}

impl PricingScenario {
    pub fn new(
        ingredient_cost: f64,
        observed_market_price: f64,
        category: impl Into<String>,
        cuisine_type: impl Into<String>,
    ) -> Self {
        let context = PricingContext::default();
        Self {
            price: 0.0,
            ingredient_cost,
            observed_market_price,
            category: category.into(),
            cuisine_type: cuisine_type.into(),
            is_weekend: context.is_weekend(),
            has_promotion: context.has_promotion,
            day_of_week: context.day_of_week,
        }
    }

    /// Build the scenario for a catalog item. The current price (if any)
    /// becomes the scenario price.
    pub fn from_menu_item(item: &MenuItem, observed_market_price: f64, context: PricingContext) -> Self {
        Self::new(
            item.ingredient_cost,
            observed_market_price,
            item.category.clone(),
            item.cuisine_type.clone(),
        )
        .with_price(item.current_price.unwrap_or(0.0))
        .with_context(context)
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_context(mut self, context: PricingContext) -> Self {
        self.day_of_week = context.day_of_week;
        self.is_weekend = context.is_weekend();
        self.has_promotion = context.has_promotion;
        self
    }

    pub fn has_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }

    /// `price / cost - 1`, the cost-relative markup the elasticity terms use.
    pub fn cost_ratio_deviation(&self) -> f64 {
        self.price / self.ingredient_cost - 1.0
    }

    pub fn market_ratio_deviation(&self) -> f64 {
        self.price / self.observed_market_price - 1.0
    }

    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive("ingredient_cost", self.ingredient_cost)?;
        ensure_positive("observed_market_price", self.observed_market_price)?;
        if self.price != 0.0 {
            ensure_positive("price", self.price)?;
        }
        Ok(())
    }
}

/// Where a prediction came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    Model,
    Fallback,
}

/// Units-sold prediction, already clamped to the configured quantity range.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPrediction {
    pub predicted_quantity: f64,
    pub source: PredictionSource,
}

impl DemandPrediction {
    pub fn model(predicted_quantity: f64) -> Self {
        Self {
            predicted_quantity,
            source: PredictionSource::Model,
        }
    }

    pub fn fallback(predicted_quantity: f64) -> Self {
        Self {
            predicted_quantity,
            source: PredictionSource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::MenuItemId;

    #[test]
    fn weekend_flag_follows_day_of_week() {
        let s = PricingScenario::new(5.0, 15.0, "Main Course", "Italian")
            .with_context(PricingContext::new(SATURDAY, true));
        assert!(s.is_weekend);
        assert!(s.has_promotion);

        let s = s.with_context(PricingContext::new(1, false));
        assert!(!s.is_weekend);
    }

    #[test]
    fn from_menu_item_carries_current_price() {
        let item = MenuItem::new(MenuItemId::new(), "Lasagna", "Main Course", "Italian", 4.0)
            .with_current_price(14.5);
        let s = PricingScenario::from_menu_item(&item, 16.0, PricingContext::default());
        assert_eq!(s.price, 14.5);
        assert!(s.has_price());
        assert_eq!(s.observed_market_price, 16.0);
    }

    #[test]
    fn unset_price_is_valid_but_negative_price_is_not() {
        let s = PricingScenario::new(5.0, 15.0, "Main Course", "Italian");
        assert!(s.validate().is_ok());
        assert!(s.clone().with_price(-1.0).validate().is_err());
        assert!(PricingScenario::new(0.0, 15.0, "Main Course", "Italian").validate().is_err());
    }

    #[test]
    fn ratio_deviations() {
        let s = PricingScenario::new(5.0, 20.0, "Main Course", "Italian").with_price(10.0);
        assert!((s.cost_ratio_deviation() - 1.0).abs() < 1e-12);
        assert!((s.market_ratio_deviation() + 0.5).abs() < 1e-12);
    }
}

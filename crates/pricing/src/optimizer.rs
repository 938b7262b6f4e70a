//! Price optimization over a discrete price grid.
//!
//! 1. Resolve the price range (derived from cost and category when not given).
//! 2. Build an ascending grid and evaluate the demand model at every point.
//! 3. Pick the point maximising the business goal.
//! 4. Optionally move to a psychological price ending if that costs at most
//!    `rounding_tolerance` of the objective.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use bistro_core::CategoryClass;
use bistro_core::error::ensure_positive;

use crate::config::OptimizerConfig;
use crate::error::PricingError;
use crate::model::DemandModel;
use crate::result::{BaselineComparison, OptimizationResult, PricePoint};
use crate::rounding::{psychological_price, round_cents};
use crate::scenario::PricingScenario;

/// Optimization objective.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessGoal {
    #[default]
    Profit,
    Revenue,
}

impl BusinessGoal {
    pub fn objective(self, point: &PricePoint) -> f64 {
        match self {
            BusinessGoal::Profit => point.profit,
            BusinessGoal::Revenue => point.revenue,
        }
    }
}

impl FromStr for BusinessGoal {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "profit" => Ok(BusinessGoal::Profit),
            "revenue" => Ok(BusinessGoal::Revenue),
            other => Err(PricingError::validation(format!(
                "unknown business goal '{other}' (expected profit or revenue)"
            ))),
        }
    }
}

impl core::fmt::Display for BusinessGoal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BusinessGoal::Profit => f.write_str("profit"),
            BusinessGoal::Revenue => f.write_str("revenue"),
        }
    }
}

/// Parameters of one optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeRequest {
    pub price_start: Option<f64>,
    pub price_end: Option<f64>,
    pub price_increment: f64,
    pub business_goal: BusinessGoal,
    pub apply_smart_rounding: bool,
}

impl Default for OptimizeRequest {
    fn default() -> Self {
        Self {
            price_start: None,
            price_end: None,
            price_increment: 0.25,
            business_goal: BusinessGoal::Profit,
            apply_smart_rounding: true,
        }
    }
}

impl OptimizeRequest {
    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.price_start = Some(start);
        self.price_end = Some(end);
        self
    }

    pub fn with_increment(mut self, increment: f64) -> Self {
        self.price_increment = increment;
        self
    }

    pub fn with_goal(mut self, goal: BusinessGoal) -> Self {
        self.business_goal = goal;
        self
    }

    pub fn with_smart_rounding(mut self, enabled: bool) -> Self {
        self.apply_smart_rounding = enabled;
        self
    }
}

/// Resolved, ascending price range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PriceBounds {
    pub start: f64,
    pub end: f64,
    /// `end` was forced to `start + inverted_range_span`.
    pub corrected: bool,
}

/// Sweeps prices through a shared, read-only [`DemandModel`].
#[derive(Debug, Clone)]
pub struct PriceOptimizer<'a> {
    model: &'a DemandModel,
    config: OptimizerConfig,
}

impl<'a> PriceOptimizer<'a> {
    pub fn new(model: &'a DemandModel, config: OptimizerConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Find the best price for `scenario` (its `price`, if set, is treated as
    /// the current price for the baseline comparison).
    ///
    /// Ties on the objective keep the lowest price: the grid is scanned in
    /// ascending order and a point only replaces the incumbent when strictly
    /// better.
    pub fn optimize(
        &self,
        scenario: &PricingScenario,
        request: &OptimizeRequest,
    ) -> Result<OptimizationResult, PricingError> {
        let cost = ensure_positive("ingredient_cost", scenario.ingredient_cost)?;
        ensure_positive("observed_market_price", scenario.observed_market_price)?;

        let bounds = self.resolve_bounds(scenario, request)?;
        let grid = self.price_grid(&bounds, request.price_increment)?;

        let curve: Vec<PricePoint> = grid
            .iter()
            .filter_map(|&price| self.evaluate(scenario, price))
            .collect();
        let goal = request.business_goal;
        let best = select_optimum(&curve, goal).ok_or(PricingError::EmptyResult {
            points: grid.len(),
        })?;

        let mut optimum = curve[best];
        let mut smart_rounded = false;
        if request.apply_smart_rounding {
            if let Some(rounded) = self.smart_round(scenario, &optimum, goal) {
                optimum = rounded;
                smart_rounded = true;
            }
        }

        let baseline = if scenario.has_price() {
            self.evaluate(scenario, scenario.price)
                .map(|current| BaselineComparison::new(&current, &optimum))
        } else {
            None
        };

        debug!(
            category = %scenario.category,
            cost,
            optimal_price = optimum.price,
            points = curve.len(),
            goal = %goal,
            smart_rounded,
            "price optimization complete"
        );

        Ok(OptimizationResult {
            optimal_price: optimum.price,
            predicted_quantity: optimum.quantity,
            projected_profit: optimum.profit,
            projected_revenue: optimum.revenue,
            profit_margin_percent: optimum.margin * 100.0,
            business_goal: goal,
            smart_rounded,
            ingredient_cost: cost,
            observed_market_price: scenario.observed_market_price,
            price_start: bounds.start,
            price_end: bounds.end,
            price_curve: curve,
            baseline,
        })
    }

    /// Supplied bounds win; missing ones are derived from cost and category.
    pub fn resolve_bounds(
        &self,
        scenario: &PricingScenario,
        request: &OptimizeRequest,
    ) -> Result<PriceBounds, PricingError> {
        let cfg = &self.config;
        let cost = scenario.ingredient_cost;

        let start = match request.price_start {
            Some(start) => ensure_positive("price_start", start)?,
            None => round_cents((cost * cfg.min_markup).max(cost + cfg.min_margin)),
        };

        let end = match request.price_end {
            Some(end) => ensure_positive("price_end", end)?,
            None => {
                let ceiling = cfg.markup_ceiling(CategoryClass::classify(&scenario.category));
                let end = (cost * ceiling).min(cfg.absolute_price_cap);
                round_cents(end.max(start + cfg.min_span))
            }
        };

        if end <= start {
            let corrected = round_cents(start + cfg.inverted_range_span);
            debug!(start, end, corrected, "price_end <= price_start; widening range");
            return Ok(PriceBounds {
                start,
                end: corrected,
                corrected: true,
            });
        }

        Ok(PriceBounds {
            start,
            end,
            corrected: false,
        })
    }

    /// Ascending prices `start, start + step, ...` up to and including `end`,
    /// snapped to cents.
    pub fn price_grid(&self, bounds: &PriceBounds, increment: f64) -> Result<Vec<f64>, PricingError> {
        let increment = ensure_positive("price_increment", increment)?;
        let steps = ((bounds.end - bounds.start) / increment + 1e-9).floor();
        if !steps.is_finite() || steps < 0.0 {
            return Err(PricingError::validation(format!(
                "malformed price range {}..{}",
                bounds.start, bounds.end
            )));
        }

        // Checked as a float so huge ranges cannot overflow the cast.
        if steps + 1.0 > self.config.max_grid_points as f64 {
            return Err(PricingError::validation(format!(
                "price grid of {} points exceeds the limit of {}",
                steps + 1.0,
                self.config.max_grid_points
            )));
        }
        let points = steps as usize + 1;

        Ok((0..points)
            .map(|i| round_cents(bounds.start + i as f64 * increment))
            .collect())
    }

    /// Evaluate one price. `None` when the price or prediction is unusable.
    pub fn evaluate(&self, scenario: &PricingScenario, price: f64) -> Option<PricePoint> {
        if !(price.is_finite() && price > 0.0) {
            return None;
        }
        let prediction = self.model.predict(&scenario.clone().with_price(price));
        let quantity = prediction.predicted_quantity;
        if !quantity.is_finite() {
            return None;
        }
        Some(PricePoint::new(price, scenario.ingredient_cost, quantity))
    }

    fn smart_round(
        &self,
        scenario: &PricingScenario,
        optimum: &PricePoint,
        goal: BusinessGoal,
    ) -> Option<PricePoint> {
        let rounded_price = psychological_price(optimum.price)?;
        let candidate = self.evaluate(scenario, rounded_price)?;

        let original = goal.objective(optimum);
        let rounded = goal.objective(&candidate);
        let floor = original - self.config.rounding_tolerance * original.abs();

        if rounded >= floor {
            debug!(from = optimum.price, to = rounded_price, original, rounded, "smart rounding adopted");
            Some(candidate)
        } else {
            debug!(from = optimum.price, to = rounded_price, original, rounded, "smart rounding rejected");
            None
        }
    }
}

/// Index of the best point; first (lowest-price) wins ties.
fn select_optimum(curve: &[PricePoint], goal: BusinessGoal) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, point) in curve.iter().enumerate() {
        let value = goal.objective(point);
        if !value.is_finite() {
            continue;
        }
        match best {
            Some((_, incumbent)) if value <= incumbent => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

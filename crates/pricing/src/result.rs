use serde::{Deserialize, Serialize};

use crate::optimizer::BusinessGoal;

/// One evaluated price on the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    pub quantity: f64,
    pub profit: f64,
    pub revenue: f64,
    /// `(price - cost) / price`, as a fraction.
    pub margin: f64,
}

impl PricePoint {
    pub fn new(price: f64, ingredient_cost: f64, quantity: f64) -> Self {
        Self {
            price,
            quantity,
            profit: (price - ingredient_cost) * quantity,
            revenue: price * quantity,
            margin: (price - ingredient_cost) / price,
        }
    }
}

/// How the optimum compares with the price the item sells at today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineComparison {
    pub current_price: f64,
    pub current_quantity: f64,
    pub current_profit: f64,
    pub current_revenue: f64,
    /// `optimal profit - current profit`.
    pub profit_uplift: f64,
    pub price_change_percent: f64,
}

impl BaselineComparison {
    pub fn new(current: &PricePoint, optimum: &PricePoint) -> Self {
        Self {
            current_price: current.price,
            current_quantity: current.quantity,
            current_profit: current.profit,
            current_revenue: current.revenue,
            profit_uplift: optimum.profit - current.profit,
            price_change_percent: (optimum.price - current.price) / current.price * 100.0,
        }
    }
}

/// Outcome of one optimization run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub optimal_price: f64,
    #[serde(rename = "predicted_quantity_at_optimal_price")]
    pub predicted_quantity: f64,
    #[serde(rename = "maximum_projected_profit")]
    pub projected_profit: f64,
    #[serde(rename = "maximum_projected_revenue")]
    pub projected_revenue: f64,
    pub profit_margin_percent: f64,
    pub business_goal: BusinessGoal,
    pub smart_rounded: bool,
    pub ingredient_cost: f64,
    pub observed_market_price: f64,
    pub price_start: f64,
    pub price_end: f64,
    /// Ascending by price.
    #[serde(rename = "price_profit_curve")]
    pub price_curve: Vec<PricePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BaselineComparison>,
}

impl OptimizationResult {
    /// Number of strict interior local maxima of the profit series.
    ///
    /// A well-behaved elasticity curve yields at most one.
    pub fn profit_peaks(&self) -> usize {
        self.price_curve
            .windows(3)
            .filter(|w| w[1].profit > w[0].profit && w[1].profit > w[2].profit)
            .count()
    }

    /// Arrays for the chart-rendering collaborator.
    pub fn chart_series(&self) -> ChartSeries {
        ChartSeries {
            prices: self.price_curve.iter().map(|p| p.price).collect(),
            quantities: self.price_curve.iter().map(|p| p.quantity).collect(),
            profits: self.price_curve.iter().map(|p| p.profit).collect(),
            revenues: self.price_curve.iter().map(|p| p.revenue).collect(),
            optimal_price: self.optimal_price,
            optimal_profit: self.projected_profit,
            ingredient_cost: self.ingredient_cost,
            market_price: self.observed_market_price,
        }
    }
}

/// Price/profit/revenue series plus reference lines for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub prices: Vec<f64>,
    pub quantities: Vec<f64>,
    pub profits: Vec<f64>,
    pub revenues: Vec<f64>,
    pub optimal_price: f64,
    pub optimal_profit: f64,
    pub ingredient_cost: f64,
    pub market_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(profits: &[f64]) -> OptimizationResult {
        let price_curve = profits
            .iter()
            .enumerate()
            .map(|(i, &profit)| PricePoint {
                price: 6.0 + i as f64,
                quantity: 1.0,
                profit,
                revenue: 0.0,
                margin: 0.0,
            })
            .collect();
        OptimizationResult {
            optimal_price: 6.0,
            predicted_quantity: 1.0,
            projected_profit: 1.0,
            projected_revenue: 6.0,
            profit_margin_percent: 16.0,
            business_goal: BusinessGoal::Profit,
            smart_rounded: false,
            ingredient_cost: 5.0,
            observed_market_price: 15.0,
            price_start: 6.0,
            price_end: 6.0 + profits.len() as f64,
            price_curve,
            baseline: None,
        }
    }

    #[test]
    fn price_point_identities() {
        let p = PricePoint::new(12.0, 4.0, 10.0);
        assert_eq!(p.profit, 80.0);
        assert_eq!(p.revenue, 120.0);
        assert!((p.margin - 8.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn profit_peaks_counts_interior_maxima() {
        assert_eq!(curve(&[1.0, 3.0, 5.0, 4.0, 2.0]).profit_peaks(), 1);
        assert_eq!(curve(&[1.0, 3.0, 2.0, 4.0, 1.0]).profit_peaks(), 2);
        assert_eq!(curve(&[1.0, 2.0, 3.0]).profit_peaks(), 0);
    }

    #[test]
    fn serializes_with_external_field_names() {
        let json = serde_json::to_value(curve(&[1.0, 2.0])).unwrap();
        for key in [
            "optimal_price",
            "predicted_quantity_at_optimal_price",
            "maximum_projected_profit",
            "maximum_projected_revenue",
            "profit_margin_percent",
            "business_goal",
            "price_profit_curve",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["business_goal"], "profit");
        assert!(json.get("baseline").is_none());
    }

    #[test]
    fn chart_series_mirrors_the_curve() {
        let chart = curve(&[1.0, 2.0, 0.5]).chart_series();
        assert_eq!(chart.prices, vec![6.0, 7.0, 8.0]);
        assert_eq!(chart.profits, vec![1.0, 2.0, 0.5]);
        assert_eq!(chart.ingredient_cost, 5.0);
    }

    #[test]
    fn baseline_reports_uplift() {
        let current = PricePoint::new(10.0, 5.0, 50.0);
        let optimum = PricePoint::new(12.5, 5.0, 45.0);
        let b = BaselineComparison::new(&current, &optimum);
        assert_eq!(b.profit_uplift, 337.5 - 250.0);
        assert_eq!(b.price_change_percent, 25.0);
    }
}

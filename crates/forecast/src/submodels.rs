//! Heuristic sub-models. Each returns an absolute weekly estimate derived from
//! the shared base demand.

use bistro_core::CategoryClass;

use crate::config::EnsembleConfig;
use crate::dish::{DishDescription, HistoricalSample};
use crate::error::ForecastError;
use crate::signals::{KeywordText, PREFERENCE_KEYWORDS, Season, TREND_KEYWORDS};

/// Estimates of every sub-model for one dish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubModelEstimates {
    pub base: f64,
    pub seasonal: f64,
    pub trend: f64,
    pub competitor: f64,
    pub preference: f64,
    pub price_sensitivity: f64,
}

impl SubModelEstimates {
    pub fn evaluate(
        config: &EnsembleConfig,
        dish: &DishDescription,
        text: &KeywordText,
        season: Season,
        history: &[HistoricalSample],
    ) -> Result<Self, ForecastError> {
        let class = dish.category_class();
        let base = config.base_demand(class, dish.price);

        Ok(Self {
            base,
            seasonal: base * text.multiplier(season.patterns(), config.seasonal_cap),
            trend: base * trend_factor(config, text, history)?,
            competitor: base * competitor_factor(config, class, dish.price),
            preference: base * text.multiplier(PREFERENCE_KEYWORDS, config.preference_cap),
            price_sensitivity: base * price_sensitivity_factor(config, class, dish.price),
        })
    }

    /// Weighted linear combination.
    pub fn combine(&self, config: &EnsembleConfig) -> f64 {
        let w = &config.weights;
        self.base * w.base
            + self.seasonal * w.seasonal
            + self.trend * w.trend
            + self.competitor * w.competitor
            + self.preference * w.preference
            + self.price_sensitivity * w.price_sensitivity
    }

    /// `(name, estimate / base)` for every sub-model.
    pub fn factors(&self) -> [(&'static str, f64); 6] {
        let ratio = |v: f64| if self.base > 0.0 { v / self.base } else { 0.0 };
        [
            ("base_demand", ratio(self.base)),
            ("seasonal", ratio(self.seasonal)),
            ("trend", ratio(self.trend)),
            ("competitor", ratio(self.competitor)),
            ("preference", ratio(self.preference)),
            ("price_sensitivity", ratio(self.price_sensitivity)),
        ]
    }
}

/// Keyword factor, or with two or more sales samples the recent-trend delta.
pub fn trend_factor(
    config: &EnsembleConfig,
    text: &KeywordText,
    history: &[HistoricalSample],
) -> Result<f64, ForecastError> {
    if history.len() < 2 {
        return Ok(text.multiplier(TREND_KEYWORDS, config.trend_cap));
    }
    if let Some(bad) = history
        .iter()
        .find(|s| !(s.units_sold.is_finite() && s.units_sold >= 0.0))
    {
        return Err(ForecastError::InvalidHistory(format!(
            "units_sold on {} is {}",
            bad.date, bad.units_sold
        )));
    }

    let mut ordered = history.to_vec();
    ordered.sort_by_key(|s| s.date);
    let (first, second) = ordered.split_at(ordered.len() / 2);

    let mean = |xs: &[HistoricalSample]| xs.iter().map(|s| s.units_sold).sum::<f64>() / xs.len() as f64;
    let (earlier, recent) = (mean(first), mean(second));
    if earlier <= 0.0 {
        return Ok(1.0);
    }

    let limit = config.history_trend_limit;
    let delta = ((recent - earlier) / earlier).clamp(-limit, limit);
    Ok(1.0 + delta)
}

/// Price tier times how crowded the category is.
pub fn competitor_factor(config: &EnsembleConfig, class: CategoryClass, price: f64) -> f64 {
    let tier = if price < config.budget_below {
        config.budget_multiplier
    } else if price < config.mid_below {
        config.mid_multiplier
    } else {
        config.premium_multiplier
    };
    tier * config.competitiveness.get(class)
}

/// `1 + elasticity * (price / market_average - 1)`, floored.
pub fn price_sensitivity_factor(config: &EnsembleConfig, class: CategoryClass, price: f64) -> f64 {
    let market = config.market_average_price.get(class);
    let factor = 1.0 + config.elasticity.get(class) * (price / market - 1.0);
    factor.max(config.price_sensitivity_floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(day: u32, units: f64) -> HistoricalSample {
        HistoricalSample {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            units_sold: units,
        }
    }

    #[test]
    fn history_replaces_keyword_trend() {
        let cfg = EnsembleConfig::default();
        let text = KeywordText::new("healthy organic bowl");
        assert!(trend_factor(&cfg, &text, &[]).unwrap() > 1.0);

        // Out of order on purpose: sorted by date before splitting.
        let history = vec![sample(4, 30.0), sample(1, 20.0), sample(3, 30.0), sample(2, 20.0)];
        assert_eq!(trend_factor(&cfg, &text, &history).unwrap(), 1.5);
    }

    #[test]
    fn history_trend_is_clamped() {
        let cfg = EnsembleConfig::default();
        let text = KeywordText::new("");
        let falling = vec![sample(1, 100.0), sample(2, 100.0), sample(3, 1.0), sample(4, 1.0)];
        assert_eq!(trend_factor(&cfg, &text, &falling).unwrap(), 0.5);
    }

    #[test]
    fn bad_history_is_an_error() {
        let cfg = EnsembleConfig::default();
        let text = KeywordText::new("");
        let history = vec![sample(1, 10.0), sample(2, f64::NAN)];
        assert!(matches!(
            trend_factor(&cfg, &text, &history),
            Err(ForecastError::InvalidHistory(_))
        ));
    }

    #[test]
    fn price_sensitivity_is_floored() {
        let cfg = EnsembleConfig::default();
        assert_eq!(price_sensitivity_factor(&cfg, CategoryClass::MainCourse, 18.0), 1.0);
        assert!(price_sensitivity_factor(&cfg, CategoryClass::MainCourse, 12.0) > 1.0);
        assert_eq!(price_sensitivity_factor(&cfg, CategoryClass::Beverage, 50.0), 0.3);
    }

    #[test]
    fn competitor_tiers() {
        let cfg = EnsembleConfig::default();
        let budget = competitor_factor(&cfg, CategoryClass::Dessert, 6.0);
        let premium = competitor_factor(&cfg, CategoryClass::Dessert, 40.0);
        assert!(budget > premium);
    }

    #[test]
    fn default_weights_reproduce_base_when_all_factors_are_one() {
        let cfg = EnsembleConfig::default();
        let e = SubModelEstimates {
            base: 30.0,
            seasonal: 30.0,
            trend: 30.0,
            competitor: 30.0,
            preference: 30.0,
            price_sensitivity: 30.0,
        };
        assert!((e.combine(&cfg) - 30.0).abs() < 1e-9);
        assert!(e.factors().iter().all(|(_, f)| *f == 1.0));
    }
}

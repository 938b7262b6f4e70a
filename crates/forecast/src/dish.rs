//! Forecast inputs: the dish being proposed and optional sales history.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bistro_core::CategoryClass;
use bistro_core::error::ensure_positive;

use crate::error::ForecastError;

/// A (possibly hypothetical) dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishDescription {
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cuisine_type: String,
}

impl DishDescription {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            ingredients: Vec::new(),
            description: String::new(),
            cuisine_type: String::new(),
        }
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_cuisine(mut self, cuisine_type: impl Into<String>) -> Self {
        self.cuisine_type = cuisine_type.into();
        self
    }

    pub fn category_class(&self) -> CategoryClass {
        CategoryClass::classify(&self.category)
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.name.trim().is_empty() {
            return Err(ForecastError::invalid_dish("name must not be empty"));
        }
        ensure_positive("price", self.price)?;
        Ok(())
    }
}

/// Units sold on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSample {
    pub date: NaiveDate,
    pub units_sold: f64,
}

/// Horizon the forecast is expressed in. Base demand is weekly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastPeriod {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl ForecastPeriod {
    /// Multiplier applied to weekly demand.
    pub fn weekly_scale(self) -> f64 {
        match self {
            ForecastPeriod::Daily => 1.0 / 7.0,
            ForecastPeriod::Weekly => 1.0,
            ForecastPeriod::Monthly => 30.0 / 7.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub dish: DishDescription,
    #[serde(default)]
    pub history: Vec<HistoricalSample>,
    #[serde(default)]
    pub period: ForecastPeriod,
    /// Reference date; selects the season.
    #[serde(default = "today")]
    pub as_of: NaiveDate,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl ForecastRequest {
    /// Weekly forecast as of today, no history.
    pub fn new(dish: DishDescription) -> Self {
        Self {
            dish,
            history: Vec::new(),
            period: ForecastPeriod::Weekly,
            as_of: today(),
        }
    }

    pub fn with_history(mut self, history: Vec<HistoricalSample>) -> Self {
        self.history = history;
        self
    }

    pub fn with_period(mut self, period: ForecastPeriod) -> Self {
        self.period = period;
        self
    }

    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = date;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_blank_name_and_bad_price() {
        assert!(DishDescription::new("  ", "Main Course", 12.0).validate().is_err());
        assert!(DishDescription::new("Wrap", "Main Course", 0.0).validate().is_err());
        assert!(DishDescription::new("Wrap", "Main Course", f64::NAN).validate().is_err());
        assert!(DishDescription::new("Wrap", "Main Course", 12.0).validate().is_ok());
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let raw = serde_json::json!({
            "dish": { "name": "Test Wrap", "category": "Main Course", "price": 12.0 }
        });
        let req: ForecastRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(req.period, ForecastPeriod::Weekly);
        assert!(req.history.is_empty());
        assert!(req.dish.ingredients.is_empty());
    }

    #[test]
    fn period_scales_from_weekly() {
        assert_eq!(ForecastPeriod::Weekly.weekly_scale(), 1.0);
        assert!((ForecastPeriod::Daily.weekly_scale() * 7.0 - 1.0).abs() < 1e-12);
        assert!(ForecastPeriod::Monthly.weekly_scale() > 4.0);
    }
}

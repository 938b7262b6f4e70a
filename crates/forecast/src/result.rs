use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Demand band; always `pessimistic <= realistic <= optimistic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandScenarios {
    pub pessimistic: u32,
    pub realistic: u32,
    pub optimistic: u32,
}

impl DemandScenarios {
    /// `predicted * (1 -/+ variance)`, rounded and floored at 1. A negative
    /// or NaN variance counts as zero.
    pub fn around(predicted: f64, variance: f64) -> Self {
        let variance = variance.max(0.0);
        let units = |v: f64| v.round().max(1.0) as u32;
        Self {
            pessimistic: units(predicted * (1.0 - variance)),
            realistic: units(predicted),
            optimistic: units(predicted * (1.0 + variance)),
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.pessimistic <= self.realistic && self.realistic <= self.optimistic
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMethod {
    Ensemble,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub dish_name: String,
    pub predicted_demand: u32,
    pub confidence_score: f64,
    pub scenarios: DemandScenarios,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    /// Sub-model name to its estimate relative to base demand.
    pub model_breakdown: BTreeMap<String, f64>,
    pub method: ForecastMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenarios_floor_at_one() {
        let s = DemandScenarios::around(0.2, 0.28);
        assert_eq!(s, DemandScenarios { pessimistic: 1, realistic: 1, optimistic: 1 });
    }

    #[test]
    fn scenarios_spread_around_prediction() {
        let s = DemandScenarios::around(40.0, 0.1);
        assert_eq!(s, DemandScenarios { pessimistic: 36, realistic: 40, optimistic: 44 });
        assert!(s.is_ordered());
    }

    #[test]
    fn negative_variance_cannot_invert_the_band() {
        let s = DemandScenarios::around(30.0, -0.1);
        assert_eq!(s, DemandScenarios { pessimistic: 30, realistic: 30, optimistic: 30 });
        assert!(DemandScenarios::around(30.0, f64::NAN).is_ordered());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: the band is ordered for any non-negative prediction.
            #[test]
            fn band_is_ordered(predicted in 0.0f64..10_000.0, variance in 0.0f64..1.0) {
                prop_assert!(DemandScenarios::around(predicted, variance).is_ordered());
            }
        }
    }
}

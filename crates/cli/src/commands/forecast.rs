use std::fs;
use std::path::Path;

use anyhow::Context;

use bistro_forecast::{DemandForecastEnsemble, EnsembleConfig, ForecastPeriod, ForecastRequest, ForecastResult};

pub fn read_request(path: &Path) -> anyhow::Result<ForecastRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading dish file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing dish file {}", path.display()))
}

pub fn forecast(
    config: EnsembleConfig,
    mut request: ForecastRequest,
    period: Option<ForecastPeriod>,
) -> ForecastResult {
    if let Some(period) = period {
        request.period = period;
    }
    DemandForecastEnsemble::new(config).forecast(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_forecast::ForecastMethod;

    #[test]
    fn period_flag_overrides_the_file() {
        let raw = r#"{
            "dish": { "name": "Test Wrap", "category": "Main Course", "price": 12.0,
                      "ingredients": ["chicken", "lettuce"] },
            "period": "daily",
            "as_of": "2025-04-10"
        }"#;
        let request: ForecastRequest = serde_json::from_str(raw).unwrap();
        let daily = forecast(EnsembleConfig::default(), request.clone(), None);
        let weekly = forecast(EnsembleConfig::default(), request, Some(ForecastPeriod::Weekly));

        assert_eq!(daily.method, ForecastMethod::Ensemble);
        assert!(weekly.predicted_demand > daily.predicted_demand);
    }
}

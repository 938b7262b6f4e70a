//! CLI configuration: optional JSON file, then environment overrides.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use bistro_forecast::EnsembleConfig;
use bistro_pricing::PricingConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pricing: PricingConfig,
    pub forecast: EnsembleConfig,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                Self::from_json(&raw)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => Self::default(),
        };
        config.pricing = config.pricing.with_env_overrides();
        Ok(config)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_json(r#"{ "pricing": { "optimizer": { "absolute_price_cap": 40.0 } } }"#)
            .unwrap();
        assert_eq!(cfg.pricing.optimizer.absolute_price_cap, 40.0);
        assert_eq!(cfg.pricing.model, PricingConfig::default().model);
        assert_eq!(cfg.forecast, EnsembleConfig::default());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(AppConfig::from_json("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/bistro.json"))).unwrap_err();
        assert!(err.to_string().contains("reading config file"));
    }
}

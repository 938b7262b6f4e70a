pub mod forecast;
pub mod optimize;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bistro_forecast::ForecastPeriod;
use bistro_pricing::BusinessGoal;

#[derive(Debug, Parser)]
#[command(name = "bistro")]
#[command(about = "Menu price optimization and demand forecasting.")]
pub struct CommandLine {
    /// JSON file with `pricing` and/or `forecast` settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Optimize prices for every item of a menu file
    #[command(alias = "o")]
    Optimize {
        /// JSON menu file: `{ "items": [...], "market_prices": {...} }`
        #[arg(long)]
        menu: PathBuf,
        /// Objective: profit or revenue
        #[arg(long, default_value = "profit")]
        goal: BusinessGoal,
        /// Price step of the sweep
        #[arg(long)]
        increment: Option<f64>,
        /// Keep the raw optimum instead of a .95/.99 ending
        #[arg(long)]
        no_rounding: bool,
        /// Worker threads for the batch
        #[arg(long, default_value_t = 1)]
        workers: usize,
        /// Day of week, 0 = Monday
        #[arg(long)]
        day: Option<u8>,
        /// Price as if a promotion is running
        #[arg(long)]
        promotion: bool,
    },
    /// Forecast demand for a dish
    #[command(alias = "f")]
    Forecast {
        /// JSON forecast request (`dish`, optional `history`, `period`, `as_of`)
        #[arg(long)]
        dish: PathBuf,
        /// daily, weekly or monthly; overrides the file
        #[arg(long, value_parser = parse_period)]
        period: Option<ForecastPeriod>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

fn parse_period(raw: &str) -> Result<ForecastPeriod, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "daily" => Ok(ForecastPeriod::Daily),
        "weekly" => Ok(ForecastPeriod::Weekly),
        "monthly" => Ok(ForecastPeriod::Monthly),
        other => Err(format!("unknown period '{other}' (expected daily, weekly or monthly)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_optimize_flags() {
        let cli = CommandLine::try_parse_from([
            "bistro", "optimize", "--menu", "menu.json", "--goal", "revenue", "--no-rounding",
            "--workers", "4",
        ])
        .unwrap();
        match cli.command {
            Commands::Optimize { goal, no_rounding, workers, day, .. } => {
                assert_eq!(goal, BusinessGoal::Revenue);
                assert!(no_rounding);
                assert_eq!(workers, 4);
                assert_eq!(day, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_forecast_with_global_config() {
        let cli = CommandLine::try_parse_from([
            "bistro", "forecast", "--dish", "wrap.json", "--period", "Monthly", "--config", "c.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
        assert!(matches!(
            cli.command,
            Commands::Forecast { period: Some(ForecastPeriod::Monthly), .. }
        ));
    }

    #[test]
    fn rejects_unknown_goal() {
        assert!(
            CommandLine::try_parse_from(["bistro", "optimize", "--menu", "m.json", "--goal", "margin"])
                .is_err()
        );
    }
}

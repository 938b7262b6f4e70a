mod commands;
mod config;

use std::io::{self, Write};

use anyhow::Context;
use serde::Serialize;

use bistro_pricing::PricingContext;
use commands::optimize::{MenuFile, OptimizeArgs};
use commands::{CommandLine, Commands, forecast, optimize};
use config::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse_args();

    bistro_observability::init();

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Optimize {
            menu,
            goal,
            increment,
            no_rounding,
            workers,
            day,
            promotion,
        } => {
            let menu = MenuFile::read(&menu)?;
            let context = PricingContext::new(
                day.unwrap_or(PricingContext::default().day_of_week),
                promotion,
            );
            let args = OptimizeArgs {
                goal,
                increment,
                smart_rounding: !no_rounding,
                workers,
                context,
            };
            print_json(&optimize::optimize(config.pricing, menu, &args))
        }
        Commands::Forecast { dish, period } => {
            let request = forecast::read_request(&dish)?;
            print_json(&forecast::forecast(config.forecast, request, period))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("writing JSON output")?;
    writeln!(out).context("writing JSON output")?;
    Ok(())
}

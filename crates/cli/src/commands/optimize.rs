use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use bistro_core::MenuItem;
use bistro_pricing::{
    BatchReport, BusinessGoal, InMemoryMenuCatalog, MarketPriceTable, OptimizeRequest,
    PricingConfig, PricingContext, PricingEngine,
};

/// Menu file: items plus optional market reference prices by item name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuFile {
    pub items: Vec<MenuItem>,
    #[serde(default)]
    pub market_prices: BTreeMap<String, f64>,
}

impl MenuFile {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading menu file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing menu file {}", path.display()))
    }
}

#[derive(Debug, Clone)]
pub struct OptimizeArgs {
    pub goal: BusinessGoal,
    pub increment: Option<f64>,
    pub smart_rounding: bool,
    pub workers: usize,
    pub context: PricingContext,
}

pub fn optimize(config: PricingConfig, menu: MenuFile, args: &OptimizeArgs) -> BatchReport {
    let request = OptimizeRequest::default()
        .with_goal(args.goal)
        .with_increment(args.increment.unwrap_or(config.optimizer.default_increment))
        .with_smart_rounding(args.smart_rounding);

    let market: MarketPriceTable = menu.market_prices.iter().map(|(k, &v)| (k, v)).collect();
    let engine = PricingEngine::bootstrap(config).with_market_prices(market);

    // Keep the file's item order in the report.
    let ids: Vec<_> = menu.items.iter().map(|item| item.id).collect();
    let catalog: InMemoryMenuCatalog = menu.items.into_iter().collect();

    info!(items = ids.len(), goal = %args.goal, workers = args.workers, "optimizing menu");
    engine
        .batch(&catalog)
        .with_workers(args.workers)
        .run(&ids, args.context, &request)
}

//! Batch optimization across menu items.
//!
//! Every item is optimized independently. A missing item, a validation failure
//! or even a panic inside one item's run becomes a `Failed` outcome for that
//! item only; the rest of the batch carries on.

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use bistro_core::{MenuItem, MenuItemId};

use crate::catalog::{MarketPriceSource, MenuCatalog};
use crate::error::PricingError;
use crate::optimizer::{OptimizeRequest, PriceOptimizer};
use crate::result::OptimizationResult;
use crate::scenario::{PricingContext, PricingScenario};

/// Per-item result of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Optimized {
        item_id: MenuItemId,
        item_name: String,
        result: OptimizationResult,
    },
    Failed {
        item_id: MenuItemId,
        item_name: Option<String>,
        error: String,
    },
}

impl ItemOutcome {
    pub fn failed(item_id: MenuItemId, item_name: Option<String>, error: impl Into<String>) -> Self {
        Self::Failed {
            item_id,
            item_name,
            error: error.into(),
        }
    }

    pub fn item_id(&self) -> MenuItemId {
        match self {
            ItemOutcome::Optimized { item_id, .. } | ItemOutcome::Failed { item_id, .. } => *item_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Optimized { .. })
    }

    pub fn result(&self) -> Option<&OptimizationResult> {
        match self {
            ItemOutcome::Optimized { result, .. } => Some(result),
            ItemOutcome::Failed { .. } => None,
        }
    }
}

/// Outcomes in input order plus success/failure counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: Vec<ItemOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        }
    }
}

/// Resolve the market price for an item and build its scenario.
///
/// Without an observed market price, `cost * default_market_markup` is used.
pub fn scenario_for_item<M>(
    item: &MenuItem,
    market_prices: &M,
    context: PricingContext,
    default_market_markup: f64,
) -> Result<PricingScenario, PricingError>
where
    M: MarketPriceSource + ?Sized,
{
    item.validate()?;
    let market_price = market_prices
        .observed_market_price(&item.name)
        .unwrap_or(item.ingredient_cost * default_market_markup);
    let scenario = PricingScenario::from_menu_item(item, market_price, context);
    scenario.validate()?;
    Ok(scenario)
}

pub struct BatchOptimizer<'a, C: ?Sized, M: ?Sized> {
    optimizer: PriceOptimizer<'a>,
    catalog: &'a C,
    market_prices: &'a M,
    workers: usize,
}

impl<'a, C, M> BatchOptimizer<'a, C, M>
where
    C: MenuCatalog + ?Sized,
    M: MarketPriceSource + ?Sized,
{
    pub fn new(optimizer: PriceOptimizer<'a>, catalog: &'a C, market_prices: &'a M) -> Self {
        Self {
            optimizer,
            catalog,
            market_prices,
            workers: 1,
        }
    }

    /// Spread items over up to `workers` scoped threads (1 = sequential).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn run(
        &self,
        ids: &[MenuItemId],
        context: PricingContext,
        request: &OptimizeRequest,
    ) -> BatchReport {
        let outcomes = if self.workers == 1 || ids.len() < 2 {
            ids.iter()
                .map(|&id| self.run_one(id, context, request))
                .collect()
        } else {
            self.run_parallel(ids, context, request)
        };

        let report = BatchReport::from_outcomes(outcomes);
        info!(
            items = ids.len(),
            succeeded = report.succeeded,
            failed = report.failed,
            "batch price optimization finished"
        );
        report
    }

    fn run_parallel(
        &self,
        ids: &[MenuItemId],
        context: PricingContext,
        request: &OptimizeRequest,
    ) -> Vec<ItemOutcome> {
        let chunk_size = ids.len().div_ceil(self.workers);

        thread::scope(|scope| {
            let handles: Vec<_> = ids
                .chunks(chunk_size)
                .map(|chunk| {
                    let handle = scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|&id| self.run_one(id, context, request))
                            .collect::<Vec<_>>()
                    });
                    (chunk, handle)
                })
                .collect();

            // Joining in spawn order keeps outcomes in input order.
            handles
                .into_iter()
                .flat_map(|(chunk, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        chunk
                            .iter()
                            .map(|&id| ItemOutcome::failed(id, None, "worker thread panicked"))
                            .collect()
                    })
                })
                .collect()
        })
    }

    fn run_one(
        &self,
        id: MenuItemId,
        context: PricingContext,
        request: &OptimizeRequest,
    ) -> ItemOutcome {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            self.optimize_item(id, context, request)
        }));

        match attempt {
            Ok(Ok((item, result))) => ItemOutcome::Optimized {
                item_id: id,
                item_name: item.name,
                result,
            },
            Ok(Err((name, e))) => {
                warn!(item = %id, error = %e, "item optimization failed");
                ItemOutcome::failed(id, name, e.to_string())
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                warn!(item = %id, panic = %msg, "item optimization panicked");
                ItemOutcome::failed(id, None, PricingError::internal(msg).to_string())
            }
        }
    }

    fn optimize_item(
        &self,
        id: MenuItemId,
        context: PricingContext,
        request: &OptimizeRequest,
    ) -> Result<(MenuItem, OptimizationResult), (Option<String>, PricingError)> {
        let item = self
            .catalog
            .menu_item(id)
            .ok_or_else(|| (None, PricingError::NotFound(id.to_string())))?;

        let outcome = scenario_for_item(
            &item,
            self.market_prices,
            context,
            self.optimizer.config().default_market_markup,
        )
        .and_then(|scenario| self.optimizer.optimize(&scenario, request));

        match outcome {
            Ok(result) => Ok((item, result)),
            Err(e) => Err((Some(item.name), e)),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryMenuCatalog, MarketPriceTable};
    use crate::config::{DemandModelConfig, OptimizerConfig};
    use crate::model::DemandModel;

    struct PanickingCatalog;

    impl MenuCatalog for PanickingCatalog {
        fn menu_item(&self, _id: MenuItemId) -> Option<MenuItem> {
            panic!("catalog exploded");
        }
    }

    fn items() -> Vec<MenuItem> {
        vec![
            MenuItem::new(MenuItemId::new(), "Burger", "Main Course", "American", 4.5),
            MenuItem::new(MenuItemId::new(), "Broken", "Main Course", "American", 0.0),
            MenuItem::new(MenuItemId::new(), "Lemonade", "Beverage", "American", 0.8)
                .with_current_price(3.0),
        ]
    }

    #[test]
    fn failures_are_isolated_per_item() {
        let model = DemandModel::untrained(DemandModelConfig::default());
        let optimizer = PriceOptimizer::new(&model, OptimizerConfig::default());
        let items = items();
        let catalog: InMemoryMenuCatalog = items.iter().cloned().collect();
        let market = MarketPriceTable::new();
        let missing = MenuItemId::new();

        let mut ids: Vec<MenuItemId> = items.iter().map(|i| i.id).collect();
        ids.push(missing);

        let report = BatchOptimizer::new(optimizer, &catalog, &market).run(
            &ids,
            PricingContext::default(),
            &OptimizeRequest::default(),
        );

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 2);
        let order: Vec<MenuItemId> = report.outcomes.iter().map(|o| o.item_id()).collect();
        assert_eq!(order, ids);

        match &report.outcomes[1] {
            ItemOutcome::Failed { item_name, error, .. } => {
                assert_eq!(item_name.as_deref(), Some("Broken"));
                assert!(error.contains("ingredient_cost"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(matches!(&report.outcomes[3], ItemOutcome::Failed { item_name: None, .. }));
        assert!(report.outcomes[2].result().unwrap().baseline.is_some());
    }

    #[test]
    fn panics_become_failed_outcomes() {
        let model = DemandModel::untrained(DemandModelConfig::default());
        let optimizer = PriceOptimizer::new(&model, OptimizerConfig::default());
        let market = MarketPriceTable::new();
        let ids = vec![MenuItemId::new(), MenuItemId::new()];

        let report = BatchOptimizer::new(optimizer, &PanickingCatalog, &market).run(
            &ids,
            PricingContext::default(),
            &OptimizeRequest::default(),
        );

        assert_eq!(report.failed, 2);
        assert_eq!(report.succeeded, 0);
    }

    #[test]
    fn parallel_run_matches_sequential_run() {
        let model = DemandModel::untrained(DemandModelConfig::default());
        let items: Vec<MenuItem> = (0..9)
            .map(|i| {
                MenuItem::new(
                    MenuItemId::new(),
                    format!("Dish {i}"),
                    "Main Course",
                    "Thai",
                    2.0 + i as f64,
                )
            })
            .collect();
        let catalog: InMemoryMenuCatalog = items.iter().cloned().collect();
        let market: MarketPriceTable = [("Dish 3", 16.0)].into_iter().collect();
        let ids: Vec<MenuItemId> = items.iter().map(|i| i.id).collect();
        let req = OptimizeRequest::default();

        let sequential = BatchOptimizer::new(
            PriceOptimizer::new(&model, OptimizerConfig::default()),
            &catalog,
            &market,
        )
        .run(&ids, PricingContext::default(), &req);
        let parallel = BatchOptimizer::new(
            PriceOptimizer::new(&model, OptimizerConfig::default()),
            &catalog,
            &market,
        )
        .with_workers(4)
        .run(&ids, PricingContext::default(), &req);

        assert_eq!(sequential, parallel);
        assert_eq!(parallel.succeeded, 9);
    }

    #[test]
    fn scenario_uses_observed_market_price_or_default_markup() {
        let item = MenuItem::new(MenuItemId::new(), "Ramen", "Main Course", "Japanese", 4.0);
        let table: MarketPriceTable = [("ramen", 13.5)].into_iter().collect();

        let s = scenario_for_item(&item, &table, PricingContext::default(), 3.0).unwrap();
        assert_eq!(s.observed_market_price, 13.5);

        let s = scenario_for_item(&item, &MarketPriceTable::new(), PricingContext::default(), 3.0)
            .unwrap();
        assert_eq!(s.observed_market_price, 12.0);
    }

    #[test]
    fn report_serializes_with_status_tags() {
        let report = BatchReport::from_outcomes(vec![ItemOutcome::failed(
            MenuItemId::new(),
            Some("Soup".to_string()),
            "validation failed: nope",
        )]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failed"], 1);
        assert_eq!(json["outcomes"][0]["status"], "failed");
    }
}

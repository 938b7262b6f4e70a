//! Read-side collaborators the engine consumes.
//!
//! Persistence lives outside this crate: callers hand in implementations of
//! these traits (database-backed in production, in-memory for tests and the CLI).

use std::collections::HashMap;

use bistro_core::{MenuItem, MenuItemId};

/// Menu item lookup by id.
pub trait MenuCatalog: Send + Sync {
    fn menu_item(&self, id: MenuItemId) -> Option<MenuItem>;
}

/// Market reference price for an item name (competitor/dataset derived).
pub trait MarketPriceSource: Send + Sync {
    fn observed_market_price(&self, item_name: &str) -> Option<f64>;
}

/// In-memory catalog for tests/dev.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMenuCatalog {
    items: HashMap<MenuItemId, MenuItem>,
}

impl InMemoryMenuCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: MenuItem) {
        self.items.insert(item.id, item);
    }

    pub fn ids(&self) -> Vec<MenuItemId> {
        let mut ids: Vec<MenuItemId> = self.items.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<MenuItem> for InMemoryMenuCatalog {
    fn from_iter<I: IntoIterator<Item = MenuItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(|item| (item.id, item)).collect(),
        }
    }
}

impl MenuCatalog for InMemoryMenuCatalog {
    fn menu_item(&self, id: MenuItemId) -> Option<MenuItem> {
        self.items.get(&id).cloned()
    }
}

/// Market reference prices keyed by case-insensitive item name.
///
/// Non-positive or non-finite prices are ignored on insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketPriceTable {
    prices: HashMap<String, f64>,
}

impl MarketPriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item_name: &str, price: f64) {
        if price.is_finite() && price > 0.0 {
            self.prices.insert(normalize(item_name), price);
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for MarketPriceTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, price) in iter {
            table.insert(name.as_ref(), price);
        }
        table
    }
}

impl MarketPriceSource for MarketPriceTable {
    fn observed_market_price(&self, item_name: &str) -> Option<f64> {
        self.prices.get(&normalize(item_name)).copied()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup_by_id() {
        let item = MenuItem::new(MenuItemId::new(), "Tacos", "Main Course", "Mexican", 3.2);
        let id = item.id;
        let catalog: InMemoryMenuCatalog = [item.clone()].into_iter().collect();
        assert_eq!(catalog.menu_item(id), Some(item));
        assert_eq!(catalog.menu_item(MenuItemId::new()), None);
        assert_eq!(catalog.ids(), vec![id]);
    }

    #[test]
    fn market_prices_are_case_insensitive_and_validated() {
        let table: MarketPriceTable = [("Margherita Pizza", 14.0), ("Ghost", -1.0)]
            .into_iter()
            .collect();
        assert_eq!(table.len(), 1);
        assert_eq!(table.observed_market_price("  margherita PIZZA "), Some(14.0));
        assert_eq!(table.observed_market_price("Ghost"), None);
    }
}

//! Menu item record consumed from the persistence collaborator.

use serde::{Deserialize, Serialize};

use crate::error::{DomainResult, ensure_positive};
use crate::id::MenuItemId;

/// Menu item as handed over by the catalog (read-only for this engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub category: String,
    pub cuisine_type: String,
    pub ingredient_cost: f64,
    #[serde(default)]
    pub current_price: Option<f64>,
}

impl MenuItem {
    pub fn new(
        id: MenuItemId,
        name: impl Into<String>,
        category: impl Into<String>,
        cuisine_type: impl Into<String>,
        ingredient_cost: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            cuisine_type: cuisine_type.into(),
            ingredient_cost,
            current_price: None,
        }
    }

    pub fn with_current_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    pub fn category_class(&self) -> CategoryClass {
        CategoryClass::classify(&self.category)
    }

    /// Check the cost/price invariants before the record enters a pricing run.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive("ingredient_cost", self.ingredient_cost)?;
        if let Some(price) = self.current_price {
            ensure_positive("current_price", price)?;
        }
        Ok(())
    }
}

/// Coarse category bucket used by markup ceilings and forecast heuristics.
///
/// Menu categories are free-form labels ("Main Course", "Drinks", ...);
/// anything unrecognised is `Other`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryClass {
    Appetizer,
    MainCourse,
    Dessert,
    Beverage,
    Side,
    Other,
}

impl CategoryClass {
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        // Word-level match so "Steak" is not mistaken for "tea".
        let tokens: Vec<&str> = label
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.strip_suffix('s').unwrap_or(t))
            .collect();
        let has = |needles: &[&str]| tokens.iter().any(|t| needles.contains(t));

        if has(&["beverage", "drink", "coffee", "tea", "juice", "cocktail", "wine", "beer"]) {
            CategoryClass::Beverage
        } else if has(&["dessert", "sweet", "pastry", "cake"]) {
            CategoryClass::Dessert
        } else if has(&["main", "entree", "entrée", "burger", "wrap", "pasta", "pizza"]) {
            CategoryClass::MainCourse
        } else if has(&["appetizer", "starter", "tapa"]) {
            CategoryClass::Appetizer
        } else if has(&["side"]) {
            CategoryClass::Side
        } else {
            CategoryClass::Other
        }
    }
}

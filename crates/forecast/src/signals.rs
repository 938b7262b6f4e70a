//! Keyword signals extracted from a dish's free text.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dish::DishDescription;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Northern-hemisphere meteorological seasons.
    pub fn from_date(date: NaiveDate) -> Self {
        match date.month() {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn patterns(self) -> &'static [(&'static str, f64)] {
        match self {
            Season::Spring => SPRING,
            Season::Summer => SUMMER,
            Season::Autumn => AUTUMN,
            Season::Winter => WINTER,
        }
    }
}

const SPRING: &[(&str, f64)] = &[
    ("asparagus", 1.3),
    ("peas", 1.15),
    ("strawberr", 1.2),
    ("lamb", 1.15),
    ("salad", 1.15),
    ("herb", 1.1),
];

const SUMMER: &[(&str, f64)] = &[
    ("salad", 1.3),
    ("grill", 1.25),
    ("berr", 1.2),
    ("ice cream", 1.4),
    ("iced", 1.25),
    ("tomato", 1.15),
    ("watermelon", 1.3),
    ("lemonade", 1.3),
    ("wrap", 1.1),
];

const AUTUMN: &[(&str, f64)] = &[
    ("pumpkin", 1.4),
    ("squash", 1.25),
    ("apple", 1.2),
    ("mushroom", 1.2),
    ("cinnamon", 1.15),
    ("soup", 1.2),
];

const WINTER: &[(&str, f64)] = &[
    ("soup", 1.35),
    ("stew", 1.35),
    ("hot chocolate", 1.4),
    ("roast", 1.25),
    ("curry", 1.15),
    ("chili", 1.2),
];

pub const TREND_KEYWORDS: &[(&str, f64)] = &[
    ("healthy", 1.2),
    ("organic", 1.15),
    ("fusion", 1.2),
    ("plant based", 1.25),
    ("vegan", 1.15),
    ("keto", 1.1),
    ("bowl", 1.1),
    ("fermented", 1.1),
    ("local", 1.1),
    ("artisan", 1.1),
];

pub const PREFERENCE_KEYWORDS: &[(&str, f64)] = &[
    ("spicy", 1.1),
    ("crispy", 1.15),
    ("vegan", 1.1),
    ("vegetarian", 1.05),
    ("gluten free", 1.1),
    ("cheesy", 1.1),
    ("homemade", 1.1),
    ("fresh", 1.05),
    ("grilled", 1.05),
    ("truffle", 1.1),
];

pub const POLARIZING_INGREDIENTS: &[&str] = &[
    "cilantro",
    "coriander",
    "blue cheese",
    "anchov",
    "liver",
    "olive",
    "durian",
    "eel",
    "goat cheese",
    "tofu",
];

pub const SEASONAL_INGREDIENTS: &[&str] = &[
    "pumpkin",
    "asparagus",
    "truffle",
    "strawberr",
    "peach",
    "watermelon",
    "chestnut",
    "morel",
];

pub const COMMON_INGREDIENTS: &[&str] = &[
    "chicken", "beef", "pork", "rice", "potato", "tomato", "cheese", "lettuce", "onion",
    "garlic", "egg", "pasta", "bread", "salmon", "fish", "bean", "pepper", "carrot",
];

/// Normalised searchable text: lowercase words separated by single spaces.
///
/// Keywords match at word starts, so "grill" finds "grilled" but "pea" would
/// not match inside "chickpea".
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordText {
    text: String,
}

impl KeywordText {
    pub fn of_dish(dish: &DishDescription) -> Self {
        let mut raw = String::new();
        for part in [&dish.name, &dish.category, &dish.description, &dish.cuisine_type] {
            raw.push_str(part);
            raw.push(' ');
        }
        for ingredient in &dish.ingredients {
            raw.push_str(ingredient);
            raw.push(' ');
        }
        Self::new(&raw)
    }

    pub fn new(raw: &str) -> Self {
        let words: Vec<&str> = raw
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            text: format!(" {}", words.join(" ").to_lowercase()),
        }
    }

    pub fn mentions(&self, keyword: &str) -> bool {
        self.text.contains(&format!(" {keyword}"))
    }

    /// Product of the multipliers of every matched keyword, capped.
    pub fn multiplier(&self, table: &[(&str, f64)], cap: f64) -> f64 {
        table
            .iter()
            .filter(|(kw, _)| self.mentions(kw))
            .map(|(_, m)| m)
            .product::<f64>()
            .min(cap)
    }

    /// Keywords from `list` that appear, in list order.
    pub fn matches<'a>(&self, list: &[&'a str]) -> Vec<&'a str> {
        list.iter().copied().filter(|kw| self.mentions(kw)).collect()
    }
}

/// Number of ingredients that name at least one common ingredient.
pub fn common_ingredient_count(ingredients: &[String]) -> usize {
    ingredients
        .iter()
        .filter(|ingredient| {
            let text = KeywordText::new(ingredient);
            COMMON_INGREDIENTS.iter().any(|kw| text.mentions(kw))
        })
        .count()
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One raw entry of the recipe catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecipe {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub category: Option<u8>,
    #[serde(default)]
    pub nutritions: BTreeMap<String, f64>,
    #[serde(default)]
    pub ingredients: Vec<CatalogIngredient>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default = "default_active")]
    pub active: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogIngredient {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub food: Option<FoodRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoodRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// One list entry for the recipe browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub menu_id: String,
    pub name: String,
    pub category: String,
    pub nutrition: BTreeMap<String, f64>,
}

/// The parsed recipe catalog.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<CatalogRecipe>,
}

impl RecipeCatalog {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        let recipes = serde_json::from_slice(bytes)?;
        Ok(Self { recipes })
    }

    pub fn find(&self, id: i64) -> Option<&CatalogRecipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Entries the solver actually plans with (`active == 1`).
    pub fn active_len(&self) -> usize {
        self.recipes.iter().filter(|recipe| recipe.active == 1).count()
    }

    pub fn summaries(&self) -> Vec<RecipeSummary> {
        self.recipes
            .iter()
            .map(|recipe| RecipeSummary {
                menu_id: format_menu_id(recipe.id),
                name: recipe.title.clone(),
                category: category_label(recipe.category).to_string(),
                nutrition: recipe.nutritions.clone(),
            })
            .collect()
    }
}

/// Japanese display label for a catalog category number.
pub fn category_label(category: Option<u8>) -> &'static str {
    match category {
        Some(1) => "主食",
        Some(2) => "主菜",
        Some(3) => "副菜",
        Some(4) => "汁物",
        Some(5) => "デザート",
        _ => "未分類",
    }
}

/// Formats a numeric catalog id in the `M000000001` form used everywhere
/// a menu item references its recipe.
pub fn format_menu_id(id: i64) -> String {
    format!("M{id:09}")
}

/// Extracts the numeric id back out of an `M`-prefixed menu id.
pub fn parse_menu_id(menu_id: &str) -> Option<i64> {
    let digits = menu_id.strip_prefix('M')?;
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

fn default_active() -> u8 {
    1
}

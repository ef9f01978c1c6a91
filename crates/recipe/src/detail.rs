use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogIngredient, CatalogRecipe, category_label, format_menu_id, parse_menu_id};
use crate::source::CatalogSource;

/// Divisor turning sodium in mg into salt equivalent in g.
pub const SODIUM_TO_SALT_DIVISOR: f64 = 400.0;

/// Placeholder reason for a menu id the catalog does not know.
pub const DETAIL_NOT_FOUND: &str = "レシピ詳細が見つかりません";
/// Placeholder reason when the catalog itself cannot be read.
pub const DETAIL_LOAD_FAILED: &str = "レシピ詳細の読み込みに失敗しました";

const ENERGY_KEY: &str = "エネルギー";
const PROTEIN_KEY: &str = "たんぱく質";
const FAT_KEY: &str = "脂質";
const CARBOHYDRATE_KEY: &str = "炭水化物";
const SODIUM_KEY: &str = "ナトリウム";

/// Normalized nutrition facts for one serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub energy_kcal: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbohydrate_g: f64,
    pub salt_g: f64,
}

/// A fully resolved recipe detail, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub menu_id: String,
    pub name: String,
    pub category: String,
    pub nutrition: NutritionFacts,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub notes: String,
}

/// Typed stand-in shown when a detail cannot be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailUnavailable {
    pub menu_id: String,
    pub name: Option<String>,
    pub reason: String,
}

/// Outcome of a detail lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DetailResolution {
    Available(RecipeDetail),
    Unavailable(DetailUnavailable),
}

impl CatalogRecipe {
    /// Normalizes this catalog entry into its display form. Missing
    /// nutrients count as zero; sodium is converted to salt equivalent
    /// rounded to one decimal.
    pub fn detail(&self) -> RecipeDetail {
        let nutrient = |key: &str| self.nutritions.get(key).copied().unwrap_or(0.0);
        let sodium = nutrient(SODIUM_KEY);

        RecipeDetail {
            menu_id: format_menu_id(self.id),
            name: self.title.clone(),
            category: category_label(self.category).to_string(),
            nutrition: NutritionFacts {
                energy_kcal: nutrient(ENERGY_KEY),
                protein_g: nutrient(PROTEIN_KEY),
                fat_g: nutrient(FAT_KEY),
                carbohydrate_g: nutrient(CARBOHYDRATE_KEY),
                salt_g: (sodium / SODIUM_TO_SALT_DIVISOR * 10.0).round() / 10.0,
            },
            ingredients: self.ingredients.iter().map(ingredient_line).collect(),
            steps: self.steps.clone(),
            notes: self.note.clone().unwrap_or_default(),
        }
    }
}

/// Looks up one menu item's detail.
///
/// Lookup failures degrade to an explanatory placeholder instead of an
/// error, so a calendar cell can always open something.
pub async fn resolve_detail(
    source: &dyn CatalogSource,
    menu_id: &str,
    display_name: Option<&str>,
) -> DetailResolution {
    let unavailable = |reason: &str| {
        DetailResolution::Unavailable(DetailUnavailable {
            menu_id: menu_id.to_string(),
            name: display_name.map(str::to_string),
            reason: reason.to_string(),
        })
    };

    let Some(id) = parse_menu_id(menu_id) else {
        return unavailable(DETAIL_NOT_FOUND);
    };

    let catalog = match source.load().await {
        Ok(catalog) => catalog,
        Err(error) => {
            tracing::warn!(menu_id, %error, "recipe catalog unavailable");
            return unavailable(DETAIL_LOAD_FAILED);
        }
    };

    match catalog.find(id) {
        Some(recipe) => DetailResolution::Available(recipe.detail()),
        None => unavailable(DETAIL_NOT_FOUND),
    }
}

/// One display line per ingredient, `精白米 70g`.
fn ingredient_line(ingredient: &CatalogIngredient) -> String {
    let name = ingredient
        .name
        .as_deref()
        .or_else(|| {
            ingredient
                .food
                .as_ref()
                .and_then(|food| food.name.as_deref())
        })
        .unwrap_or("不明");

    match ingredient.amount {
        Some(amount) if amount.fract() == 0.0 => format!("{name} {}g", amount as i64),
        Some(amount) => format!("{name} {amount}g"),
        None => name.to_string(),
    }
}

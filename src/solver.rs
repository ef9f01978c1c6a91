//! Client for the menu optimization backend.
//!
//! The backend plans `M` days of dishes against a cost target and returns
//! them as a `plan` with per-day recipe lists and nutrient totals. Entries
//! in the wild are loosely shaped, so everything is normalized here at the
//! boundary before the calendar ever sees it.

use async_trait::async_trait;
use kondate_menu::{DaySlot, RawMenuItem};
use kondate_recipe::format_menu_id;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

mod http;

pub use http::HttpSolver;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("solver reported failure: {message}")]
    Backend { message: String },

    #[error("solver request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("solver response malformed: {0}")]
    MalformedResponse(String),
}

impl SolverError {
    /// Message shown to the caller. Backend failures pass through verbatim;
    /// everything else maps to a generic Japanese message.
    pub fn user_message(&self) -> String {
        match self {
            SolverError::Backend { message } => message.clone(),
            SolverError::Transport(e) if e.is_connect() || e.is_timeout() => {
                "サーバーからの応答がありません。ネットワーク接続を確認してください。".to_string()
            }
            SolverError::Transport(e) => {
                format!("リクエストの送信に失敗しました: {e}")
            }
            SolverError::MalformedResponse(_) => "サーバーエラーが発生しました".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolverRequest {
    /// Number of days to plan, `M` on the wire.
    #[serde(rename = "M")]
    pub days: u32,
    /// Cost target in yen for the whole period.
    pub cost: f64,
    pub target_year_month: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_week: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolverResponse {
    pub plan: SolverPlan,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolverPlan {
    pub days: Vec<SolverDay>,
    #[serde(default)]
    pub daily_totals: Vec<DayTotals>,
    #[serde(default)]
    pub total_cost: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolverDay {
    pub day: u32,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub recipes: Vec<RecipeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DayTotals {
    pub day: u32,
    #[serde(default)]
    pub totals: kondate_menu::DailyTotals,
}

/// One planned dish as the backend sends it. Full objects carry a title
/// plus optional id and category label; older payloads use bare strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecipeEntry {
    Titled {
        title: String,
        #[serde(default)]
        id: Option<i64>,
        #[serde(default)]
        category_name: Option<String>,
    },
    Bare(String),
}

/// Accepts any `recipes` value: non-sequences become an empty list and
/// unrecognizable elements are dropped instead of failing the whole plan.
fn lenient_entries<'de, D>(deserializer: D) -> Result<Vec<RecipeEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// The optimization seam. Route handlers only see this trait, so tests can
/// swap in a canned implementation.
#[async_trait]
pub trait MenuSolver: Send + Sync {
    async fn optimize(&self, request: &SolverRequest) -> Result<SolverResponse, SolverError>;
}

/// Flattens a plan into calendar day slots plus the plan's total cost.
///
/// Totals are paired with days by day number rather than position, since
/// the backend does not promise matching order between the two lists.
pub fn batch_from_plan(plan: SolverPlan) -> (Vec<DaySlot>, f64) {
    let SolverPlan {
        days,
        daily_totals,
        total_cost,
    } = plan;

    let slots = days
        .into_iter()
        .map(|day| {
            let totals = daily_totals
                .iter()
                .find(|t| t.day == day.day)
                .map(|t| t.totals.clone())
                .unwrap_or_default();
            DaySlot {
                items: day.recipes.into_iter().map(raw_item).collect(),
                totals,
            }
        })
        .collect();

    (slots, total_cost)
}

fn raw_item(entry: RecipeEntry) -> RawMenuItem {
    match entry {
        RecipeEntry::Titled {
            title,
            id,
            category_name,
        } => RawMenuItem {
            name: title,
            source_category: category_name.filter(|label| !label.is_empty()),
            item_id: id.map(format_menu_id),
        },
        RecipeEntry::Bare(name) => RawMenuItem {
            name,
            source_category: None,
            item_id: None,
        },
    }
}

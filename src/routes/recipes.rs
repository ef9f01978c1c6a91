use axum::{
    Json,
    extract::{Path, Query, State},
};
use kondate_recipe::{DetailResolution, RecipeSummary, resolve_detail};
use serde::Deserialize;

use super::AppState;
use crate::error::AppError;

#[derive(Deserialize, Debug)]
pub struct DetailQuery {
    /// Display name from the calendar, echoed back when the catalog has
    /// no matching entry.
    pub name: Option<String>,
}

/// GET /api/recipes
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<RecipeSummary>>, AppError> {
    let catalog = state.catalog.load().await?;
    Ok(Json(catalog.summaries()))
}

/// GET /api/recipes/{menu_id}
///
/// Always 200: a miss degrades to an unavailable payload instead of an
/// error page, so the calendar can keep the dialog open.
pub async fn detail(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Json<DetailResolution> {
    let resolution =
        resolve_detail(state.catalog.as_ref(), &menu_id, query.name.as_deref()).await;
    Json(resolution)
}

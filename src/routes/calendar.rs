use axum::{
    Json,
    extract::{Path, State},
};
use kondate_menu::{MonthGrid, build_month_grid};
use time::Month;

use super::AppState;
use crate::error::AppError;

/// GET /api/calendar/{year}/{month}
pub async fn month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u8)>,
) -> Result<Json<MonthGrid>, AppError> {
    if !(1..=9999).contains(&year) {
        return Err(AppError::ValidationError(format!(
            "year out of range: {year}"
        )));
    }
    let month = Month::try_from(month)
        .map_err(|_| AppError::ValidationError(format!("month out of range: {month}")))?;

    let grid = build_month_grid(year, month, &state.calendar_read(), state.today());
    Ok(Json(grid))
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kondate_menu::MenuError;
use kondate_recipe::CatalogError;
use serde_json::json;
use thiserror::Error;

use crate::solver::SolverError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidSelection(#[from] MenuError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Concurrent generation in progress")]
    GenerationInProgress,

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Internal server error")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            AppError::InvalidSelection(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            AppError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::GenerationInProgress => (
                StatusCode::CONFLICT,
                "献立の生成を実行中です。完了までお待ちください。".to_string(),
            ),
            AppError::Solver(e) => {
                tracing::error!("Solver error: {:?}", e);
                (StatusCode::BAD_GATEWAY, e.user_message())
            }
            AppError::Catalog(e) => {
                tracing::error!("Catalog error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "レシピ一覧の取得に失敗しました".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "サーバーエラーが発生しました".to_string(),
                )
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

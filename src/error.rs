use crate::models::FetchFailure;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid query parameter `{param}`: {reason}")]
    BadRequest { param: &'static str, reason: String },

    /// 所有集合都为空且至少有一个拉取错误
    #[error("every upstream collection failed to load ({} errors)", errors.len())]
    UpstreamUnavailable { errors: Vec<FetchFailure> },

    #[error("aggregation failed: {message}")]
    Aggregation {
        message: String,
        errors: Vec<FetchFailure>,
    },

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::BadRequest { param, reason } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Bad Request",
                    "message": format!("Invalid `{}`: {}", param, reason),
                }),
            ),
            AppError::UpstreamUnavailable { errors } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Failed to fetch data from backend",
                    "message": "Every collection came back empty with errors. Check the token and field permissions listed in _debug.errors.",
                    "_debug": { "errors": errors },
                }),
            ),
            AppError::Aggregation { errors, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Internal Server Error",
                    "message": "Failed to build the executive sales report.",
                    "hint": "Check _debug.errors for upstream collections that failed to load.",
                    "_debug": { "errors": errors },
                }),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Internal Server Error",
                    "message": other.to_string(),
                }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

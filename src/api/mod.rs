pub mod handlers;

pub use handlers::*;

use crate::service::SalesReportService;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// 构建路由
pub fn router(service: Arc<SalesReportService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/sales/executive", get(executive_sales))
        .route("/api/sales/executive/export", get(export_executive_csv))
        .with_state(service)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

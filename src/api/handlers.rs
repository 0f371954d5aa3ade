use crate::error::{AppError, AppResult};
use crate::models::lenient::parse_date_prefix;
use crate::models::Division;
use crate::service::export::division_summary_csv;
use crate::service::{Granularity, ReportQuery, SalesReportService};
use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;

/// 查询参数: ?fromDate=&toDate=&division=&granularity=
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveParams {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub division: Option<String>,
    pub granularity: Option<String>,
}

/// 查询区间上限 (约 10 年)，热力图按月展开，区间越长响应越大
pub const MAX_RANGE_DAYS: i64 = 3660;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(param: &'static str, raw: &str) -> AppResult<NaiveDate> {
    parse_date_prefix(raw).ok_or_else(|| AppError::BadRequest {
        param,
        reason: format!("expected YYYY-MM-DD, got `{}`", raw),
    })
}

impl ExecutiveParams {
    /// 缺省: 本月 1 日到今天，全部事业部，自动粒度
    pub fn into_query(self, today: NaiveDate) -> AppResult<ReportQuery> {
        let to = match present(&self.to_date) {
            Some(raw) => parse_date("toDate", raw)?,
            None => today,
        };
        let from = match present(&self.from_date) {
            Some(raw) => parse_date("fromDate", raw)?,
            None => today.with_day(1).unwrap_or(today),
        };
        if from > to {
            return Err(AppError::BadRequest {
                param: "fromDate",
                reason: format!("{} is after toDate {}", from, to),
            });
        }
        if (to - from).num_days() > MAX_RANGE_DAYS {
            return Err(AppError::BadRequest {
                param: "fromDate",
                reason: format!(
                    "range {}..{} exceeds the maximum of {} days",
                    from, to, MAX_RANGE_DAYS
                ),
            });
        }

        let division = match present(&self.division) {
            None => None,
            Some(raw) if raw.eq_ignore_ascii_case("all") => None,
            Some(raw) => Some(raw.parse::<Division>().map_err(|e| AppError::BadRequest {
                param: "division",
                reason: e.to_string(),
            })?),
        };

        let granularity = match present(&self.granularity) {
            None => Granularity::Auto,
            Some(raw) => Granularity::parse(raw).ok_or_else(|| AppError::BadRequest {
                param: "granularity",
                reason: format!("expected day, month or auto, got `{}`", raw),
            })?,
        };

        Ok(ReportQuery {
            from,
            to,
            division,
            granularity,
        })
    }
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 销售高管看板
pub async fn executive_sales(
    State(service): State<Arc<SalesReportService>>,
    Query(params): Query<ExecutiveParams>,
) -> Response {
    let query = match params.into_query(Local::now().date_naive()) {
        Ok(query) => query,
        Err(e) => return e.into_response(),
    };

    match service.executive_report(&query).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 事业部汇总 CSV 导出
pub async fn export_executive_csv(
    State(service): State<Arc<SalesReportService>>,
    Query(params): Query<ExecutiveParams>,
) -> Response {
    let query = match params.into_query(Local::now().date_naive()) {
        Ok(query) => query,
        Err(e) => return e.into_response(),
    };

    let csv = match service.executive_report(&query).await {
        Ok(report) => division_summary_csv(&report),
        Err(e) => Err(e),
    };

    match csv {
        Ok(bytes) => {
            let disposition = format!(
                "attachment; filename=\"executive-sales-{}-{}.csv\"",
                query.from, query.to
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("CSV export failed: {}", e);
            e.into_response()
        }
    }
}

use super::aggregator::{aggregate, ReportQuery};
use super::finalizer::finalize;
use super::reference::ReferenceMaps;
use crate::db::{queries, DirectusClient, ReferenceCache};
use crate::error::{AppError, AppResult};
use crate::models::{DebugInfo, ExecutiveReport, SalesSnapshot};
use std::sync::Arc;
use std::time::Instant;

/// 销售高管看板服务
pub struct SalesReportService {
    client: DirectusClient,
    cache: Arc<ReferenceCache>,
}

impl SalesReportService {
    pub fn new(client: DirectusClient, cache: Arc<ReferenceCache>) -> Self {
        Self { client, cache }
    }

    /// 拉取 -> 建查找表 -> 汇总 -> 生成响应
    pub async fn executive_report(&self, query: &ReportQuery) -> AppResult<ExecutiveReport> {
        let started = Instant::now();
        let snapshot = queries::load_snapshot(&self.client, &self.cache).await;

        if snapshot.is_total_failure() {
            tracing::error!(
                "All collections empty with {} fetch errors, base url {}, token configured: {}",
                snapshot.errors.len(),
                self.client.base_url(),
                self.client.has_token()
            );
            return Err(AppError::UpstreamUnavailable {
                errors: snapshot.errors,
            });
        }

        let errors = snapshot.errors.clone();
        let owned_query = query.clone();
        // 汇总是纯 CPU 计算 (内部用 rayon)，放到阻塞线程池
        let joined = tokio::task::spawn_blocking(move || {
            build_report(&snapshot, &owned_query, started)
        })
        .await;

        match joined {
            Ok(report) => {
                tracing::info!(
                    "Executive report {}..{} division {}: net sales {}, {} fetch errors, {} ms",
                    query.from,
                    query.to,
                    report.debug.division,
                    report.kpi.net_sales,
                    report.debug.errors.len(),
                    report.debug.elapsed_ms
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Executive report aggregation failed: {}", e);
                Err(AppError::Aggregation {
                    message: e.to_string(),
                    errors,
                })
            }
        }
    }
}

/// 同步部分: 可直接在测试里对构造好的快照调用
pub fn build_report(snapshot: &SalesSnapshot, query: &ReportQuery, started: Instant) -> ExecutiveReport {
    let maps = ReferenceMaps::build(snapshot);
    let acc = aggregate(snapshot, &maps, query);

    let debug = DebugInfo {
        errors: snapshot.errors.clone(),
        counts: snapshot.counts.clone(),
        skipped_rows: snapshot.skipped_rows,
        cached_collections: snapshot.cached_collections.clone(),
        from_date: query.from,
        to_date: query.to,
        division: query
            .division
            .map(|d| d.display_name().to_string())
            .unwrap_or_else(|| "all".to_string()),
        granularity: query.granularity.resolve(query.from, query.to).as_str().to_string(),
        elapsed_ms: started.elapsed().as_millis(),
    };

    finalize(&acc, query, debug)
}

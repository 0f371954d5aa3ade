use sales_executive_rust::{api, create_client, AppConfig, ReferenceCache, SalesReportService};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式, RUST_LOG 控制级别
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);
    if config.directus.token.is_none() {
        tracing::warn!("No Directus token configured, requests will be anonymous");
    }

    // 创建 Directus 客户端与参考数据缓存
    let client = create_client(&config)?;
    let cache = Arc::new(ReferenceCache::new(Duration::from_secs(config.cache.ttl_secs)));
    info!(
        "Directus client ready: {} (reference cache {})",
        client.base_url(),
        if cache.is_enabled() { "enabled" } else { "disabled" }
    );

    let service = Arc::new(SalesReportService::new(client, cache));

    // 构建路由
    let app = api::router(service);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET /api/sales/executive         - executive sales dashboard (JSON)");
    info!("  GET /api/sales/executive/export  - division summary (CSV)");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! 路由端到端: wiremock 模拟 Directus

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use sales_executive_rust::{api, create_client, AppConfig, ReferenceCache, SalesReportService};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(server: &MockServer, cache_ttl: Duration) -> Router {
    let mut config = AppConfig::default();
    config.directus.url = Some(server.uri());
    config.directus.token = Some("test-token".to_string());
    config.fetch.page_size = 100;
    config.fetch.retry_backoff_ms = 1;
    let client = create_client(&config).expect("client");
    let service = SalesReportService::new(client, Arc::new(ReferenceCache::new(cache_ttl)));
    api::router(Arc::new(service))
}

async fn collection(server: &MockServer, name: &str, data: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/items/{}", name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

const COLLECTION_FIELDS: &str = "id,collectionDate,totalAmount,isCancelled,salesmanId";

/// 回款表只在请求驼峰字段时返回数据
async fn collection_rows(server: &MockServer, data: Value) {
    Mock::given(method("GET"))
        .and(path("/items/collection"))
        .and(query_param("fields", COLLECTION_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

/// 未单独挂载的集合返回空数组
async fn empty_fallback(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .with_priority(10)
        .mount(server)
        .await;
}

async fn mount_lucky_me(server: &MockServer, with_suppliers: bool) {
    collection(server, "sales_invoice", json!([
        { "invoice_id": 1, "invoice_date": "2024-03-10" },
        { "invoice_id": 2, "invoice_date": "2024-05-01" }
    ])).await;
    collection(server, "sales_invoice_details", json!([
        { "invoice_id": 1, "product_id": 10, "quantity": "10", "total_amount": "100.00", "discount_amount": "5.00" },
        { "invoice_id": 2, "product_id": 10, "quantity": "1", "total_amount": "999.00", "discount_amount": "0" }
    ])).await;
    collection(server, "products", json!([
        { "product_id": 10, "product_name": "Lucky Me Noodles", "product_brand": 3,
          "product_section": null, "cost_per_unit": "3.00", "parent_id": null }
    ])).await;
    collection(server, "brand", json!([{ "brand_id": 3, "brand_name": "Lucky Me" }])).await;
    collection(server, "product_per_supplier", json!([{ "product_id": 10, "supplier_id": 7 }])).await;
    if with_suppliers {
        collection(server, "suppliers", json!([{ "id": 7, "supplier_name": "Monde Nissin" }])).await;
    }
    collection(server, "salesman", json!([{ "id": 5, "division_id": 1 }])).await;
    collection(server, "division", json!([{ "division_id": 1, "division_name": "Dry Goods" }])).await;
    collection(server, "sales_return", json!([{ "return_number": "SR-1", "return_date": "2024-03-12" }])).await;
    collection(server, "sales_return_details", json!([
        { "return_no": "SR-1", "product_id": 10, "total_amount": "-15" }
    ])).await;
    collection_rows(server, json!([
        { "id": 1, "collectionDate": "2024-03-11", "totalAmount": "50", "isCancelled": 0, "salesmanId": 5 },
        { "id": 2, "collectionDate": "2024-03-11", "totalAmount": "999",
          "isCancelled": { "type": "Buffer", "data": [1] }, "salesmanId": 5 },
        { "id": 3, "collectionDate": "2024-03-12", "totalAmount": "500", "isCancelled": "true", "salesmanId": 5 }
    ])).await;
    empty_fallback(server).await;
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

const MARCH: &str = "/api/sales/executive?fromDate=2024-03-01&toDate=2024-03-31&division=all";

#[tokio::test]
async fn health_check_responds_ok() {
    let server = MockServer::start().await;
    let (status, _, body) = get(app(&server, Duration::ZERO), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn executive_report_for_lucky_me() {
    let server = MockServer::start().await;
    mount_lucky_me(&server, true).await;

    let (status, body) = get_json(app(&server, Duration::ZERO), MARCH).await;
    assert_eq!(status, StatusCode::OK);

    let kpi = &body["kpi"];
    assert_eq!(kpi["grandTotalSales"], json!(95.0));
    assert_eq!(kpi["grandTotalReturns"], json!(15.0));
    assert_eq!(kpi["netSales"], json!(80.0));
    assert_eq!(kpi["grandTotalCogs"], json!(30.0));
    assert_eq!(kpi["grossMargin"], json!(62.5));
    assert_eq!(kpi["grandTotalCollected"], json!(50.0));
    assert_eq!(kpi["collectionRate"], json!(62.5));

    assert_eq!(body["kpiByDivision"]["Dry Goods"]["netSales"], json!(80.0));
    assert_eq!(body["kpiByDivision"]["Frozen Goods"]["grossMargin"], json!(0.0));
    assert_eq!(body["divisionSales"][0]["division"], json!("Dry Goods"));
    assert_eq!(body["divisionSales"].as_array().unwrap().len(), 4);

    assert_eq!(body["salesTrend"], json!([{ "date": "2024-03-10", "sales": 95.0 }]));

    let suppliers = &body["supplierSalesByDivision"]["Dry Goods"];
    assert_eq!(suppliers[0]["supplier"], json!("Monde Nissin"));
    assert_eq!(suppliers[0]["netSales"], json!(95.0));

    let heatmap = &body["heatmapDataByDivision"]["Dry Goods"];
    assert_eq!(heatmap["months"], json!(["2024-03"]));
    assert_eq!(heatmap["rows"][0]["cells"]["2024-03"], json!(95.0));
    assert_eq!(heatmap["rows"][0]["total"], json!(95.0));

    assert_eq!(body["_debug"]["errors"], json!([]));
    assert_eq!(body["_debug"]["counts"]["products"], json!(1));
    assert_eq!(body["_debug"]["granularity"], json!("day"));
}

#[tokio::test]
async fn partial_failure_still_returns_data_with_debug_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/suppliers"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": [{ "message": "You don't have permission to access this.",
                         "extensions": { "code": "FORBIDDEN" } }]
        })))
        .mount(&server)
        .await;
    mount_lucky_me(&server, false).await;

    let (status, body) = get_json(app(&server, Duration::ZERO), MARCH).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kpi"]["grandTotalSales"], json!(95.0));

    let errors = body["_debug"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["collection"], json!("suppliers"));
    assert_eq!(errors[0]["status"], json!(403));
    assert_eq!(
        body["heatmapDataByDivision"]["Dry Goods"]["rows"][0]["supplier"],
        json!("Unknown Supplier")
    );
}

#[tokio::test]
async fn total_failure_returns_500_with_error_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "message": "Invalid user credentials.",
                         "extensions": { "code": "INVALID_CREDENTIALS" } }]
        })))
        .mount(&server)
        .await;

    let (status, body) = get_json(app(&server, Duration::ZERO), MARCH).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let errors = body["_debug"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 12);
    assert!(errors.iter().all(|e| e["status"] == json!(401)));
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn empty_store_without_errors_is_a_zero_report() {
    let server = MockServer::start().await;
    empty_fallback(&server).await;

    let (status, body) = get_json(app(&server, Duration::ZERO), MARCH).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kpi"]["netSales"], json!(0.0));
    assert_eq!(body["kpi"]["grossMargin"], json!(0.0));
    assert_eq!(body["kpi"]["collectionRate"], json!(0.0));
}

#[tokio::test]
async fn division_filter_limits_report_to_one_division() {
    let server = MockServer::start().await;
    mount_lucky_me(&server, true).await;

    let uri = "/api/sales/executive?fromDate=2024-03-01&toDate=2024-03-31&division=frozen-goods";
    let (status, body) = get_json(app(&server, Duration::ZERO), uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kpi"]["grandTotalSales"], json!(0.0));
    assert_eq!(body["kpi"]["grandTotalCollected"], json!(0.0));
    let divisions = body["divisionSales"].as_array().unwrap();
    assert_eq!(divisions.len(), 1);
    assert_eq!(divisions[0]["division"], json!("Frozen Goods"));
    assert_eq!(body["_debug"]["division"], json!("Frozen Goods"));
}

#[tokio::test]
async fn invalid_parameters_are_rejected() {
    let server = MockServer::start().await;
    for uri in [
        "/api/sales/executive?fromDate=2024-04-01&toDate=2024-03-01",
        "/api/sales/executive?fromDate=March",
        "/api/sales/executive?division=Chilled",
        "/api/sales/executive?granularity=weekly",
        "/api/sales/executive?fromDate=0001-01-01&toDate=9999-12-31",
    ] {
        let (status, body) = get_json(app(&server, Duration::ZERO), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn csv_export_has_division_rows_and_total() {
    let server = MockServer::start().await;
    mount_lucky_me(&server, true).await;

    let uri = "/api/sales/executive/export?fromDate=2024-03-01&toDate=2024-03-31";
    let (status, headers, body) = get(app(&server, Duration::ZERO), uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers["content-type"].to_str().unwrap().starts_with("text/csv"));

    let text = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[1].starts_with("Dry Goods,95.00,15.00,80.00,30.00,62.50,50.00,62.50"));
    assert!(lines[5].starts_with("TOTAL,95.00,15.00,80.00"));
}

#[tokio::test]
async fn reference_collections_are_cached_when_ttl_is_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [
            { "product_id": 10, "product_name": "Lucky Me Noodles" }
        ] })))
        .expect(1)
        .mount(&server)
        .await;
    empty_fallback(&server).await;

    let app = app(&server, Duration::from_secs(60));
    let (_, first) = get_json(app.clone(), MARCH).await;
    let (_, second) = get_json(app, MARCH).await;

    assert!(!first["_debug"]["cachedCollections"]
        .as_array()
        .unwrap()
        .contains(&json!("products")));
    assert!(second["_debug"]["cachedCollections"]
        .as_array()
        .unwrap()
        .contains(&json!("products")));
    assert_eq!(second["_debug"]["counts"]["products"], json!(1));
}

#[tokio::test]
async fn collection_fetch_requests_camel_case_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/collection"))
        .and(query_param("fields", COLLECTION_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [
            { "id": 1, "collectionDate": "2024-03-05", "totalAmount": "120.50",
              "isCancelled": false, "salesmanId": 9 }
        ] })))
        .expect(1)
        .mount(&server)
        .await;
    empty_fallback(&server).await;

    let (status, body) = get_json(app(&server, Duration::ZERO), MARCH).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_debug"]["counts"]["collection"], json!(1));
    assert_eq!(body["kpi"]["grandTotalCollected"], json!(120.5));
}

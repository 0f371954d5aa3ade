use super::client::DirectusClient;
use crate::models::FetchFailure;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

/// 一次请求内所有集合共享的错误收集器
#[derive(Debug, Default)]
pub struct ErrorSink {
    failures: Mutex<Vec<FetchFailure>>,
}

impl ErrorSink {
    pub fn record(&self, failure: FetchFailure) {
        let mut guard = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        guard.push(failure);
    }

    pub fn len(&self) -> usize {
        self.failures.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<FetchFailure> {
        self.failures.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

/// 分页结果; `complete` 为 false 表示中途出错或达到页数上限，已拉到的行仍保留
#[derive(Debug, Default)]
pub struct PagedRows {
    pub rows: Vec<Value>,
    pub complete: bool,
}

/// 逐页拉取整个集合
///
/// 出错时记录到 sink 并停止该集合的分页，不影响其他集合。
/// 只有 429/503 会按线性退避重试。
pub async fn fetch_paged(
    client: &DirectusClient,
    collection: &str,
    fields: &[&str],
    sink: &ErrorSink,
) -> PagedRows {
    let page_size = client.fetch.page_size.max(1);
    let max_pages = client.fetch.max_pages.max(1);
    let mut rows = Vec::new();

    for page in 0..max_pages {
        let offset = page * page_size;
        match fetch_page(client, collection, fields, offset).await {
            Ok(batch) => {
                let received = batch.len();
                tracing::debug!("{}: page {} offset {} -> {} rows", collection, page, offset, received);
                rows.extend(batch);
                if received < page_size {
                    return PagedRows { rows, complete: true };
                }
            }
            Err(failure) => {
                tracing::warn!(
                    "{}: fetch failed at offset {} (status {:?}): {}",
                    collection, offset, failure.status, failure.message
                );
                sink.record(failure);
                return PagedRows { rows, complete: false };
            }
        }
    }

    // 截断的结果不进缓存
    tracing::warn!(
        "{}: reached max page count {} ({} rows), remaining rows ignored",
        collection, max_pages, rows.len()
    );
    PagedRows { rows, complete: false }
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
}

async fn fetch_page(
    client: &DirectusClient,
    collection: &str,
    fields: &[&str],
    offset: usize,
) -> Result<Vec<Value>, FetchFailure> {
    let failure = |status: Option<StatusCode>, message: String| FetchFailure {
        collection: collection.to_string(),
        status: status.map(|s| s.as_u16()),
        message,
    };

    let mut attempt: u32 = 0;
    loop {
        let response = client
            .page_request(collection, fields, offset)
            .send()
            .await
            .map_err(|e| failure(e.status(), format!("network error: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let body: Value = response
                .json()
                .await
                .map_err(|e| failure(Some(status), format!("invalid JSON body: {}", e)))?;
            return extract_data(body).map_err(|msg| failure(Some(status), msg));
        }

        if is_transient(status) && attempt < client.fetch.max_retries {
            attempt += 1;
            let delay = Duration::from_millis(client.fetch.retry_backoff_ms * u64::from(attempt));
            tracing::debug!(
                "{}: HTTP {} at offset {}, retry {}/{} in {:?}",
                collection, status, offset, attempt, client.fetch.max_retries, delay
            );
            tokio::time::sleep(delay).await;
            continue;
        }

        let body = response.text().await.unwrap_or_default();
        return Err(failure(Some(status), describe_error(status, &body)));
    }
}

fn extract_data(body: Value) -> Result<Vec<Value>, String> {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(rows)) => Ok(rows),
            Some(other) => Err(format!("expected `data` array, got {}", json_kind(&other))),
            None => Err("response has no `data` field".to_string()),
        },
        other => Err(format!("expected JSON object, got {}", json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 汇总 Directus 错误体: `{"errors":[{"message":..,"extensions":{"code":..}}]}`
pub(crate) fn describe_error(status: StatusCode, body: &str) -> String {
    let details: Vec<String> = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("errors").and_then(Value::as_array).cloned())
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| {
                    let message = e.get("message").and_then(Value::as_str)?;
                    Some(match e.pointer("/extensions/code").and_then(Value::as_str) {
                        Some(code) => format!("{}: {}", code, message),
                        None => message.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if !details.is_empty() {
        return format!("HTTP {}: {}", status, details.join("; "));
    }

    let snippet: String = body.trim().chars().take(200).collect();
    if snippet.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, snippet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn directus_error_bodies_are_summarised() {
        let body = r#"{"errors":[{"message":"You don't have permission to access field \"cost_per_unit\"","extensions":{"code":"FORBIDDEN"}}]}"#;
        let msg = describe_error(StatusCode::FORBIDDEN, body);
        assert!(msg.starts_with("HTTP 403 Forbidden: FORBIDDEN:"));
        assert!(msg.contains("cost_per_unit"));
    }

    #[test]
    fn plain_bodies_are_truncated() {
        let body = "x".repeat(500);
        let msg = describe_error(StatusCode::BAD_GATEWAY, &body);
        assert_eq!(msg.len(), "HTTP 502 Bad Gateway: ".len() + 200);
        assert_eq!(describe_error(StatusCode::UNAUTHORIZED, ""), "HTTP 401 Unauthorized");
    }

    #[test]
    fn data_array_is_required() {
        assert_eq!(extract_data(json!({"data": [{"id": 1}]})).unwrap().len(), 1);
        assert!(extract_data(json!({"data": {"id": 1}})).is_err());
        assert!(extract_data(json!([1, 2])).is_err());
    }

    #[test]
    fn only_429_and_503_are_transient() {
        assert!(is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_transient(StatusCode::FORBIDDEN));
        assert!(!is_transient(StatusCode::BAD_GATEWAY));
    }
}

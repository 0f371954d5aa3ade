use crate::config::{AppConfig, FetchConfig};
use std::time::Duration;

/// Directus REST 客户端 (GET /items/<collection>)
#[derive(Clone)]
pub struct DirectusClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    pub(crate) fetch: FetchConfig,
}

/// 创建 Directus 客户端
pub fn create_client(config: &AppConfig) -> Result<DirectusClient, reqwest::Error> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .build()?;

    Ok(DirectusClient {
        http,
        base_url: config.directus_url().trim_end_matches('/').to_string(),
        token: config.directus.token.clone(),
        fetch: config.fetch.clone(),
    })
}

impl DirectusClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn items_url(&self, collection: &str) -> String {
        format!("{}/items/{}", self.base_url, collection)
    }

    /// 单页请求: fields / limit / offset
    pub(crate) fn page_request(
        &self,
        collection: &str,
        fields: &[&str],
        offset: usize,
    ) -> reqwest::RequestBuilder {
        let request = self
            .http
            .get(self.items_url(collection))
            .header("Accept", "application/json")
            .query(&[
                ("fields", fields.join(",")),
                ("limit", self.fetch.page_size.to_string()),
                ("offset", offset.to_string()),
            ]);

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

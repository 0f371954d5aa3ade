use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directus 地址的常见环境变量名，按顺序取第一个非空值
pub const DIRECTUS_URL_VARS: &[&str] = &[
    "DIRECTUS_URL",
    "NEXT_PUBLIC_DIRECTUS_URL",
    "NEXT_PUBLIC_API_BASE_URL",
];

/// Directus 令牌的常见环境变量名，按顺序取第一个非空值
pub const DIRECTUS_TOKEN_VARS: &[&str] = &[
    "DIRECTUS_STATIC_TOKEN",
    "DIRECTUS_TOKEN",
    "DIRECTUS_ADMIN_TOKEN",
    "NEXT_PUBLIC_DIRECTUS_TOKEN",
];

const DEFAULT_DIRECTUS_URL: &str = "http://localhost:8055";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub directus: DirectusConfig,
    pub fetch: FetchConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DirectusConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

// 令牌不进日志
impl fmt::Debug for DirectusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectusConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// 分页拉取参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub page_size: usize,
    pub max_pages: usize,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 参考数据缓存秒数，0 表示不缓存
    pub ttl_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: 500,
            max_pages: 200,
            max_retries: 3,
            retry_backoff_ms: 500,
            timeout_secs: 30,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            directus: DirectusConfig {
                url: Some(DEFAULT_DIRECTUS_URL.to_string()),
                token: None,
            },
            fetch: FetchConfig::default(),
            cache: CacheConfig { ttl_secs: 0 },
        }
    }
}

impl AppConfig {
    /// 默认值 -> sales-executive.toml (可选) -> SALES_ 前缀环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let fetch = FetchConfig::default();
        let settings = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("fetch.page_size", fetch.page_size as i64)?
            .set_default("fetch.max_pages", fetch.max_pages as i64)?
            .set_default("fetch.max_retries", fetch.max_retries as i64)?
            .set_default("fetch.retry_backoff_ms", fetch.retry_backoff_ms as i64)?
            .set_default("fetch.timeout_secs", fetch.timeout_secs as i64)?
            .set_default("cache.ttl_secs", 0_i64)?
            .add_source(File::with_name("sales-executive").required(false))
            .add_source(
                Environment::with_prefix("SALES")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        config.resolve_directus(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// 显式配置优先，其次按约定的环境变量名取第一个非空值
    pub fn resolve_directus<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = non_empty(self.directus.url.take())
            .or_else(|| first_non_empty(DIRECTUS_URL_VARS, &lookup))
            .unwrap_or_else(|| DEFAULT_DIRECTUS_URL.to_string());
        self.directus.url = Some(url.trim_end_matches('/').to_string());
        self.directus.token = non_empty(self.directus.token.take())
            .or_else(|| first_non_empty(DIRECTUS_TOKEN_VARS, &lookup));
    }

    pub fn directus_url(&self) -> &str {
        self.directus.url.as_deref().unwrap_or(DEFAULT_DIRECTUS_URL)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn first_non_empty<F>(names: &[&str], lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().find_map(|name| non_empty(lookup(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn first_non_empty_token_wins() {
        let vars = env(&[("DIRECTUS_STATIC_TOKEN", "  "), ("DIRECTUS_TOKEN", "abc"), ("DIRECTUS_ADMIN_TOKEN", "zzz")]);
        let token = first_non_empty(DIRECTUS_TOKEN_VARS, |n| vars.get(n).cloned());
        assert_eq!(token.as_deref(), Some("abc"));
    }

    #[test]
    fn explicit_settings_take_precedence() {
        let vars = env(&[("DIRECTUS_URL", "http://env:8055"), ("DIRECTUS_TOKEN", "env-token")]);
        let mut config = AppConfig::default();
        config.directus.url = Some("http://explicit:9000/".to_string());
        config.directus.token = Some("explicit".to_string());
        config.resolve_directus(|n| vars.get(n).cloned());
        assert_eq!(config.directus_url(), "http://explicit:9000");
        assert_eq!(config.directus.token.as_deref(), Some("explicit"));
    }

    #[test]
    fn falls_back_to_conventional_names_then_default() {
        let vars = env(&[("NEXT_PUBLIC_API_BASE_URL", "http://cms.local/")]);
        let mut config = AppConfig::default();
        config.directus.url = None;
        config.resolve_directus(|n| vars.get(n).cloned());
        assert_eq!(config.directus_url(), "http://cms.local");
        assert_eq!(config.directus.token, None);

        let mut bare = AppConfig::default();
        bare.directus.url = None;
        bare.resolve_directus(|_| None);
        assert_eq!(bare.directus_url(), DEFAULT_DIRECTUS_URL);
    }

    #[test]
    fn debug_output_hides_token() {
        let mut config = AppConfig::default();
        config.directus.token = Some("secret-token".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-token"));
    }
}

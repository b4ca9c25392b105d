use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Remote sales API
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Loop guard for the pagination of one date range
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// Extra attempts per page request after the first failure
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_sales_ttl")]
    pub sales_ttl_secs: u64,
    #[serde(default = "default_customers_ttl")]
    pub customers_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sales_ttl_secs: default_sales_ttl(),
            customers_ttl_secs: default_customers_ttl(),
        }
    }
}

impl CacheConfig {
    pub fn sales_ttl(&self) -> Duration {
        Duration::from_secs(self.sales_ttl_secs)
    }

    pub fn customers_ttl(&self) -> Duration {
        Duration::from_secs(self.customers_ttl_secs)
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

fn default_page_size() -> usize {
    500
}

fn default_max_pages() -> usize {
    500
}

fn default_retries() -> u32 {
    2
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_sales_ttl() -> u64 {
    20 * 60
}

fn default_customers_ttl() -> u64 {
    30 * 60
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[api]
base_url = "https://dashboard-api-yjnf.onrender.com"
page_size = 500
max_pages = 500
retries = 2
timeout_secs = 120
retry_backoff_ms = 500

[cache]
sales_ttl_secs = 1200
customers_ttl_secs = 1800
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.api.page_size, 500);
        assert_eq!(config.api.retries, 2);
        assert_eq!(config.cache.sales_ttl(), Duration::from_secs(1200));
    }

    #[test]
    fn test_optional_sections_default() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [api]
            base_url = "http://localhost:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.max_pages, 500);
        assert_eq!(config.api.timeout(), Duration::from_secs(120));
        assert_eq!(config.cache.customers_ttl_secs, 1800);
    }
}

use crate::utils::config_loader::{GraphConfigLoader, GraphConfigLoaderSync, LoadConfigError, load_from_file, load_from_file_sync};
use crate::utils::constants::{DEFAULT_BATCH_SIZE, DEFAULT_MISSING_DATA_RETRIES, DEFAULT_PAGE_SIZE, GraphEndpoint};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Clone, Deserialize, Debug)]
pub struct GraphConfigRoot {
    pub graph: GraphSyncConfig,
}

/// Configuration for fetching from the indexing service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphSyncConfig {
    /// GraphQL endpoint of the indexing service
    pub url: String,
    /// Attempts per query when the response lacks the expected data field
    pub missing_data_retries: u32,
    /// Records requested per page during a full fetch
    pub page_size: usize,
    /// Pair ids per batched update query
    pub batch_size: usize,
    /// Timeout for a single HTTP request in seconds
    pub http_timeout_secs: u64,
    /// Attempts the HTTP transport makes on retryable failures (429, 5xx, connect, timeout)
    pub http_max_attempts: u32,
    /// Base delay of the transport's exponential backoff in milliseconds
    pub http_base_delay_ms: u64,
    /// Upper bound for a single backoff delay in milliseconds
    pub http_max_delay_ms: u64,
}

impl Default for GraphSyncConfig {
    fn default() -> Self {
        Self {
            url: GraphEndpoint::SUSHISWAP_V2.to_string(),
            missing_data_retries: DEFAULT_MISSING_DATA_RETRIES,
            page_size: DEFAULT_PAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            http_timeout_secs: 30,
            http_max_attempts: 3,
            http_base_delay_ms: 500,
            http_max_delay_ms: 10_000,
        }
    }
}

impl GraphSyncConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> eyre::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::default();

        if let Ok(url) = std::env::var("GRAPH_URL") {
            config.url = url;
        }

        if let Ok(retries_str) = std::env::var("GRAPH_MISSING_DATA_RETRIES") {
            config.missing_data_retries =
                retries_str.parse().map_err(|e| eyre::eyre!("Invalid GRAPH_MISSING_DATA_RETRIES: {}", e))?;
        }

        if let Ok(page_size_str) = std::env::var("GRAPH_PAGE_SIZE") {
            config.page_size = page_size_str.parse().map_err(|e| eyre::eyre!("Invalid GRAPH_PAGE_SIZE: {}", e))?;
        }

        if let Ok(batch_size_str) = std::env::var("GRAPH_BATCH_SIZE") {
            config.batch_size = batch_size_str.parse().map_err(|e| eyre::eyre!("Invalid GRAPH_BATCH_SIZE: {}", e))?;
        }

        if let Ok(timeout_str) = std::env::var("GRAPH_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs =
                timeout_str.parse().map_err(|e| eyre::eyre!("Invalid GRAPH_HTTP_TIMEOUT_SECS: {}", e))?;
        }

        if let Ok(attempts_str) = std::env::var("GRAPH_HTTP_MAX_ATTEMPTS") {
            config.http_max_attempts =
                attempts_str.parse().map_err(|e| eyre::eyre!("Invalid GRAPH_HTTP_MAX_ATTEMPTS: {}", e))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the fetcher cannot work with
    pub fn validate(&self) -> eyre::Result<()> {
        let url = Url::parse(&self.url).map_err(|e| eyre::eyre!("Invalid graph url {}: {}", self.url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(eyre::eyre!("Graph url must be http(s), got {}", url.scheme()));
        }
        if self.page_size == 0 {
            return Err(eyre::eyre!("page_size must be greater than 0"));
        }
        if self.batch_size == 0 {
            return Err(eyre::eyre!("batch_size must be greater than 0"));
        }
        if self.missing_data_retries == 0 {
            return Err(eyre::eyre!("missing_data_retries must be greater than 0"));
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn http_base_delay(&self) -> Duration {
        Duration::from_millis(self.http_base_delay_ms)
    }

    pub fn http_max_delay(&self) -> Duration {
        Duration::from_millis(self.http_max_delay_ms)
    }
}

#[async_trait]
impl GraphConfigLoader for GraphSyncConfig {
    type SectionType = GraphSyncConfig;

    async fn load_section_from_file(file_name: &str) -> Result<Self::SectionType, LoadConfigError> {
        let root: GraphConfigRoot = load_from_file(file_name).await?;
        root.graph.validate().map_err(|e| LoadConfigError::ConfigError(e.to_string()))?;
        Ok(root.graph)
    }
}

impl GraphConfigLoaderSync for GraphSyncConfig {
    type SectionType = GraphSyncConfig;

    fn load_section_from_file_sync(file_name: &str) -> Result<Self::SectionType, LoadConfigError> {
        let root: GraphConfigRoot = load_from_file_sync(file_name)?;
        root.graph.validate().map_err(|e| LoadConfigError::ConfigError(e.to_string()))?;
        Ok(root.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GraphSyncConfig::default();
        assert_eq!(config.url, GraphEndpoint::SUSHISWAP_V2);
        assert_eq!(config.missing_data_retries, 5);
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.batch_size, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_durations() {
        let config = GraphSyncConfig::default();
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.http_base_delay(), Duration::from_millis(500));
        assert_eq!(config.http_max_delay(), Duration::from_secs(10));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(GraphSyncConfig::default().with_url("not a url").validate().is_err());
        assert!(GraphSyncConfig::default().with_url("wss://graph.example.org").validate().is_err());
        assert!(GraphSyncConfig { page_size: 0, ..GraphSyncConfig::default() }.validate().is_err());
        assert!(GraphSyncConfig { batch_size: 0, ..GraphSyncConfig::default() }.validate().is_err());
        assert!(GraphSyncConfig { missing_data_retries: 0, ..GraphSyncConfig::default() }.validate().is_err());
    }

    #[test]
    fn test_load_section_from_file_sync() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[graph]\nurl = \"https://graph.example.org/subgraphs/name/dex\"\npage_size = 500").unwrap();

        let config = GraphSyncConfig::load_section_from_file_sync(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.url, "https://graph.example.org/subgraphs/name/dex");
        assert_eq!(config.page_size, 500);
        // Unset keys fall back to defaults.
        assert_eq!(config.batch_size, 1000);
    }

    #[tokio::test]
    async fn test_load_section_from_file_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[graph]\nurl = \"https://graph.example.org\"\nmax_hops = 3").unwrap();

        let result = GraphSyncConfig::load_section_from_file(file.path().to_str().unwrap()).await;
        assert!(matches!(result, Err(LoadConfigError::TomlError(_))));
    }
}

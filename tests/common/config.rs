//! Test configuration helpers for building clients against a mock server

use std::sync::Arc;
use std::time::Duration;

use cms_feed::{
    CacheConfig, Config, ContentClient, ErrorCollector, HttpTransport, ResponseCache,
    RetryConfig, StaticCredentials, cache,
};
use tempfile::TempDir;
use wiremock::MockServer;

/// Space id used by every test client
pub const SPACE_ID: &str = "test-space";

/// Path of the entries endpoint on the mock server
pub const ENTRIES_PATH: &str = "/spaces/test-space/environments/main/entries";

/// Config pointing at `server`, with fast retries and the given cache settings
pub fn test_config(server: &MockServer, cache: CacheConfig) -> Config {
    let mut config = Config::default();
    config.api.api_base = server.uri();
    config.api.timeout = Duration::from_secs(5);
    config.retry = RetryConfig {
        initial_delay: Duration::from_millis(10),
        ..RetryConfig::default()
    };
    config.cache = cache;
    config
}

/// Memory-only cache settings
pub fn memory_cache() -> CacheConfig {
    CacheConfig::default()
}

/// Cache settings backed by a fresh temporary directory
pub fn disk_cache() -> (CacheConfig, TempDir) {
    let dir = TempDir::new().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    let config = CacheConfig {
        disk_dir: Some(dir.path().to_path_buf()),
        ..CacheConfig::default()
    };
    (config, dir)
}

/// Client built the same way `ContentClient::new` does, with the cache exposed
pub fn create_test_client(config: &Config) -> (ContentClient, Option<Arc<dyn ResponseCache>>) {
    let credentials = StaticCredentials::for_space("test-token", SPACE_ID, &config.api)
        .unwrap_or_else(|e| panic!("invalid credentials: {e}"));
    let cache = cache::from_config(&config.cache)
        .unwrap_or_else(|e| panic!("failed to build cache: {e}"));
    let transport = HttpTransport::new(&config.api, cache.clone())
        .unwrap_or_else(|e| panic!("failed to build transport: {e}"));
    let client = ContentClient::with_parts(
        config,
        &credentials,
        Arc::new(transport),
        cache.clone(),
        Arc::new(ErrorCollector::new()),
    )
    .unwrap_or_else(|e| panic!("failed to build client: {e}"));
    (client, cache)
}

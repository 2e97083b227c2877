use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub endpoint_url: String,
    pub env: Environment,
    pub log_level: String,
    pub cache_dir: PathBuf,
    pub fetch_timeout_secs: u64,
    pub fetch_max_retries: u32,
    pub fetch_retry_delay_ms: u64,
    pub user_agent: String,
    /// Country calling code substituted for the trunk `0` of local numbers.
    pub country_code: String,
    pub search_debounce_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("endpoint_url", &self.endpoint_url)
            .field("log_level", &self.log_level)
            .field("cache_dir", &self.cache_dir)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_max_retries", &self.fetch_max_retries)
            .field("fetch_retry_delay_ms", &self.fetch_retry_delay_ms)
            .field("user_agent", &self.user_agent)
            .field("country_code", &self.country_code)
            .field("search_debounce_ms", &self.search_debounce_ms)
            .finish()
    }
}

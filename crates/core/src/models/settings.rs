use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const DEFAULT_BASE_URL: &str = "https://api.unleashnfts.com/api";

/// Runtime configuration for the analytics client and the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Analytics API key, sent as `x-api-key`. Required for HTTP access.
    pub api_key: Option<String>,

    /// API root; versioned paths (`/v1`, `/v2`) are appended to it.
    pub base_url: String,

    /// Chain name used by the v2 endpoints (e.g., "ethereum").
    pub blockchain: String,

    /// Numeric chain id used by the v1 reputation endpoint.
    pub chain_id: u64,

    /// Aggregation window for balance and NFT queries.
    pub time_range: String,

    /// Page size for paginated endpoints (only the first page is read).
    pub page_limit: u32,

    /// Maximum number of price requests in flight at once.
    pub price_concurrency: usize,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            blockchain: "ethereum".to_string(),
            chain_id: 1,
            time_range: "all".to_string(),
            page_limit: 30,
            price_concurrency: 4,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Build settings from process environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable lookup (for tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Settings::default();

        settings.api_key = get("UNLEASH_API_KEY");
        if let Some(url) = get("UNLEASH_BASE_URL") {
            settings.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(chain) = get("WALLET_ANALYZER_BLOCKCHAIN") {
            settings.blockchain = chain;
        }
        if let Some(raw) = get("WALLET_ANALYZER_CHAIN_ID") {
            settings.chain_id = parse_number("WALLET_ANALYZER_CHAIN_ID", &raw)?;
        }
        if let Some(raw) = get("WALLET_ANALYZER_PRICE_CONCURRENCY") {
            settings.price_concurrency = parse_number("WALLET_ANALYZER_PRICE_CONCURRENCY", &raw)?;
        }
        if let Some(raw) = get("WALLET_ANALYZER_TIMEOUT_SECS") {
            settings.request_timeout_secs = parse_number("WALLET_ANALYZER_TIMEOUT_SECS", &raw)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// The API key, or `MissingApiKey`.
    pub fn require_api_key(&self) -> Result<&str, CoreError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(CoreError::MissingApiKey)
    }

    /// Concurrency cap actually used by the price fan-out (never 0).
    pub fn effective_concurrency(&self) -> usize {
        self.price_concurrency.max(1)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_url.is_empty() {
            return Err(CoreError::Config("base_url must not be empty".into()));
        }
        if self.blockchain.is_empty() {
            return Err(CoreError::Config("blockchain must not be empty".into()));
        }
        if self.page_limit == 0 {
            return Err(CoreError::Config("page_limit must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config("request_timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, CoreError>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| CoreError::Config(format!("{key}={raw:?} is not a valid number: {e}")))
}

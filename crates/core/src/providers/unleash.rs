use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::AnalyticsProvider;
use crate::errors::CoreError;
use crate::models::address::WalletAddress;
use crate::models::de;
use crate::models::nft::NftSnapshot;
use crate::models::settings::Settings;
use crate::models::token::TokenBalance;

const PROVIDER: &str = "UnleashNFTs";

/// UnleashNFTs analytics API client.
///
/// - **Requires**: API key, sent as the `x-api-key` header.
/// - **Endpoints**: `/v1/wallet/{chain}/{address}/score/reputation`,
///   `/v2/wallet/balance/token`, `/v2/nft/wallet/analytics`, `/v2/token/metrics`
/// - **Pagination**: only the first page (`offset=0`) is ever requested.
pub struct UnleashProvider {
    client: Client,
    base_url: String,
    blockchain: String,
    chain_id: u64,
    time_range: String,
    page_limit: u32,
}

impl UnleashProvider {
    /// Build a client from settings. Fails with `MissingApiKey` when no key
    /// is configured.
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        let api_key = settings.require_api_key()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| CoreError::Config("API key contains invalid header characters".into()))?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);

        let builder = Client::builder().default_headers(headers);
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        let client = builder
            .build()
            .map_err(|e| CoreError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            blockchain: settings.blockchain.clone(),
            chain_id: settings.chain_id,
            time_range: settings.time_range.clone(),
            page_limit: settings.page_limit,
        })
    }

    pub fn reputation_url(&self, address: &WalletAddress) -> String {
        format!(
            "{}/v1/wallet/{}/{}/score/reputation",
            self.base_url, self.chain_id, address
        )
    }

    pub fn balances_url(&self) -> String {
        format!("{}/v2/wallet/balance/token", self.base_url)
    }

    pub fn nft_analytics_url(&self) -> String {
        format!("{}/v2/nft/wallet/analytics", self.base_url)
    }

    pub fn token_metrics_url(&self) -> String {
        format!("{}/v2/token/metrics", self.base_url)
    }

    /// GET with query params, check status, return the body as text.
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, CoreError> {
        tracing::debug!(url, "analytics request");
        let resp = self.client.get(url).query(query).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("HTTP {status}: {}", truncate(&body, 200)),
            });
        }
        Ok(body)
    }
}

// ── UnleashNFTs API response types ──────────────────────────────────

#[derive(Deserialize)]
struct ReputationResponse {
    wallet: ReputationWallet,
}

#[derive(Deserialize)]
struct ReputationWallet {
    metric_values: ReputationMetrics,
}

#[derive(Deserialize)]
struct ReputationMetrics {
    risk_interaction_score: MetricValue,
}

#[derive(Deserialize)]
struct MetricValue {
    #[serde(deserialize_with = "de::string_or_empty", default)]
    value: String,
}

#[derive(Deserialize)]
struct DataPage<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Deserialize)]
struct TokenMetrics {
    current_price: Option<serde_json::Value>,
}

fn parse_json<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, CoreError> {
    serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Failed to parse {what} response: {e}"),
    })
}

/// Extract `wallet.metric_values.risk_interaction_score.value`.
///
/// The value arrives as a string and is read like `parseInt`: leading
/// integer digits only, so `"42.7"` yields 42.
pub fn parse_risk_score(body: &str) -> Result<i64, CoreError> {
    let resp: ReputationResponse = parse_json(body, "reputation")?;
    let raw = resp.wallet.metric_values.risk_interaction_score.value;
    parse_leading_int(&raw).ok_or_else(|| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Invalid risk_interaction_score: {raw:?}"),
    })
}

/// Extract `data[]` from a balance response.
pub fn parse_token_balances(body: &str) -> Result<Vec<TokenBalance>, CoreError> {
    let page: DataPage<TokenBalance> = parse_json(body, "token balance")?;
    Ok(page.data)
}

/// Extract `data[0]` from an NFT analytics response.
pub fn parse_nft_analytics(body: &str) -> Result<Option<NftSnapshot>, CoreError> {
    let page: DataPage<NftSnapshot> = parse_json(body, "NFT analytics")?;
    Ok(page.data.into_iter().next())
}

/// Extract `data[0].current_price` from a token metrics response.
/// `Ok(None)` when the API has no entry for the token.
pub fn parse_token_price(body: &str) -> Result<Option<f64>, CoreError> {
    let page: DataPage<TokenMetrics> = parse_json(body, "token metrics")?;
    let Some(first) = page.data.into_iter().next() else {
        return Ok(None);
    };
    let price = match first.current_price {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match price {
        Some(p) if p.is_finite() && p >= 0.0 => Ok(Some(p)),
        _ => Err(CoreError::Api {
            provider: PROVIDER.into(),
            message: "Invalid current_price (must be finite and non-negative)".into(),
        }),
    }
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first()? {
        b'-' => (-1, &s[1..]),
        b'+' => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AnalyticsProvider for UnleashProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_risk_score(&self, address: &WalletAddress) -> Result<i64, CoreError> {
        let url = self.reputation_url(address);
        let body = self
            .get_text(&url, &[("metrics", "risk_interaction_score".to_string())])
            .await?;
        parse_risk_score(&body)
    }

    async fn get_token_balances(
        &self,
        address: &WalletAddress,
    ) -> Result<Vec<TokenBalance>, CoreError> {
        let query = [
            ("address", address.to_string()),
            ("blockchain", self.blockchain.clone()),
            ("time_range", self.time_range.clone()),
            ("offset", "0".to_string()),
            ("limit", self.page_limit.to_string()),
        ];
        let body = self.get_text(&self.balances_url(), &query).await?;
        parse_token_balances(&body)
    }

    async fn get_nft_analytics(
        &self,
        address: &WalletAddress,
    ) -> Result<Option<NftSnapshot>, CoreError> {
        let query = [
            ("wallet", address.to_string()),
            ("blockchain", self.blockchain.clone()),
            ("time_range", self.time_range.clone()),
            ("sort_by", "volume".to_string()),
            ("sort_order", "desc".to_string()),
            ("offset", "0".to_string()),
            ("limit", self.page_limit.to_string()),
        ];
        let body = self.get_text(&self.nft_analytics_url(), &query).await?;
        parse_nft_analytics(&body)
    }

    async fn get_token_price(&self, token_address: &str) -> Result<Option<f64>, CoreError> {
        let query = [
            ("blockchain", self.blockchain.clone()),
            ("token_address", token_address.to_string()),
            ("offset", "0".to_string()),
            ("limit", self.page_limit.to_string()),
        ];
        let body = self.get_text(&self.token_metrics_url(), &query).await?;
        parse_token_price(&body)
    }
}

use serde::{Deserialize, Serialize};

use super::de;

/// One token held by a wallet, as reported by the balance endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    /// Human-readable name (e.g., "Ethereum", "USD Coin")
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub token_name: String,

    /// Ticker symbol (e.g., "ETH", "USDC")
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub token_symbol: String,

    /// Contract address, the key for price lookups
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub token_address: String,

    /// Amount held, already scaled by `decimal`. Never negative.
    #[serde(default, deserialize_with = "de::non_negative_f64")]
    pub quantity: f64,

    /// Token decimal scale reported by the API
    #[serde(default, deserialize_with = "de::u32_or_zero")]
    pub decimal: u32,
}

impl TokenBalance {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        token_address: impl Into<String>,
        quantity: f64,
        decimal: u32,
    ) -> Self {
        Self {
            token_name: name.into(),
            token_symbol: symbol.into(),
            token_address: token_address.into(),
            quantity: if quantity.is_finite() { quantity.max(0.0) } else { 0.0 },
            decimal,
        }
    }
}

/// Distinct token addresses in first-seen order. Empty addresses are skipped.
pub fn distinct_addresses(balances: &[TokenBalance]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    balances
        .iter()
        .filter(|b| !b.token_address.is_empty())
        .filter(|b| seen.insert(b.token_address.as_str()))
        .map(|b| b.token_address.clone())
        .collect()
}

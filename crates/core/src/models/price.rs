use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current USD prices keyed by token contract address.
///
/// Populated as individual price requests complete. A missing entry means
/// "no price known" and resolves to `0.0` for valuation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPrices {
    entries: HashMap<String, f64>,
}

impl TokenPrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a price. Non-finite or negative values are ignored and
    /// `false` is returned.
    pub fn set_price(&mut self, token_address: impl Into<String>, price: f64) -> bool {
        if !price.is_finite() || price < 0.0 {
            return false;
        }
        self.entries.insert(token_address.into(), price);
        true
    }

    /// The known price, if any.
    pub fn get_price(&self, token_address: &str) -> Option<f64> {
        self.entries.get(token_address).copied()
    }

    /// The price used for valuation: known price or `0.0`.
    pub fn price_or_zero(&self, token_address: &str) -> f64 {
        self.get_price(token_address).unwrap_or(0.0)
    }

    pub fn contains(&self, token_address: &str) -> bool {
        self.entries.contains_key(token_address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, f64)> for TokenPrices {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut prices = TokenPrices::new();
        for (addr, price) in iter {
            prices.set_price(addr, price);
        }
        prices
    }
}

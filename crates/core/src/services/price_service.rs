use futures::stream::{self, StreamExt};
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::price::TokenPrices;
use crate::models::status::{PriceFailure, PriceReport};
use crate::models::token::{distinct_addresses, TokenBalance};
use crate::providers::traits::AnalyticsProvider;

/// Fetches current token prices with a bounded-concurrency fan-out.
///
/// - One request per **distinct** token address, never more.
/// - At most `concurrency` requests in flight; `1` means strictly sequential.
/// - Results are merged into a map keyed by token address, so the outcome
///   does not depend on completion order.
/// - A failed or empty response only affects its own token, which then
///   values at 0.
pub struct PriceService {
    provider: Arc<dyn AnalyticsProvider>,
    concurrency: usize,
}

impl PriceService {
    pub fn new(provider: Arc<dyn AnalyticsProvider>, concurrency: usize) -> Self {
        Self {
            provider,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetch prices for every token in `balances`.
    pub async fn fetch_prices(&self, balances: &[TokenBalance]) -> (TokenPrices, PriceReport) {
        let addresses = distinct_addresses(balances);
        let mut report = PriceReport {
            requested: addresses.len(),
            ..PriceReport::default()
        };

        let results: Vec<(String, Result<Option<f64>, CoreError>)> = stream::iter(addresses)
            .map(|addr| {
                let provider = Arc::clone(&self.provider);
                async move {
                    tracing::debug!(token = %addr, "fetching price");
                    let result = provider.get_token_price(&addr).await;
                    (addr, result)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut prices = TokenPrices::new();
        for (addr, result) in results {
            match result {
                Ok(Some(price)) => {
                    if prices.set_price(addr.clone(), price) {
                        report.resolved += 1;
                    } else {
                        tracing::warn!(token = %addr, price, "rejecting invalid price");
                        report.failed.push(PriceFailure {
                            token_address: addr,
                            message: format!("invalid price {price}"),
                        });
                    }
                }
                Ok(None) => {
                    tracing::info!(token = %addr, "no price data");
                    report.missing.push(addr);
                }
                Err(e) => {
                    tracing::warn!(token = %addr, error = %e, "price request failed");
                    report.failed.push(PriceFailure {
                        token_address: addr,
                        message: e.to_string(),
                    });
                }
            }
        }

        // Completion order is arbitrary; keep the report stable.
        report.missing.sort();
        report
            .failed
            .sort_by(|a, b| a.token_address.cmp(&b.token_address));

        (prices, report)
    }
}

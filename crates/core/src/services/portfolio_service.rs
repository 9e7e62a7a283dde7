use crate::models::portfolio::{PortfolioEntry, PortfolioSnapshot, PredictionSeries};
use crate::models::price::TokenPrices;
use crate::models::token::TokenBalance;

/// Combines balances with prices into portfolio entries and a total.
///
/// Pure aggregation over fetched data. No I/O.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Value every balance at its resolved price (0 when unknown).
    ///
    /// Entries keep the balance order; `total_value` is the plain sum of
    /// entry values and is recomputed on every call.
    pub fn aggregate(
        &self,
        balances: &[TokenBalance],
        prices: &TokenPrices,
        predictions: &PredictionSeries,
    ) -> PortfolioSnapshot {
        let entries: Vec<PortfolioEntry> = balances
            .iter()
            .map(|b| {
                let price = prices.price_or_zero(&b.token_address);
                let value = b.quantity * price;
                tracing::trace!(symbol = %b.token_symbol, price, quantity = b.quantity, value, "valued token");
                PortfolioEntry {
                    name: b.token_name.clone(),
                    symbol: b.token_symbol.clone(),
                    token_address: b.token_address.clone(),
                    balance: b.quantity,
                    price,
                    value,
                    predictions: predictions.clone(),
                }
            })
            .collect();

        let total_value = entries.iter().map(|e| e.value).sum();

        PortfolioSnapshot {
            entries,
            total_value,
        }
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}

/// `value / total × 100`, or `None` when the total is not positive.
pub fn allocation_pct(value: f64, total: f64) -> Option<f64> {
    if total > 0.0 && total.is_finite() {
        Some(value / total * 100.0)
    } else {
        None
    }
}

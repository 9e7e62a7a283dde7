use serde::{Deserialize, Serialize};

/// A single forecast point (`date` is a `YYYY-MM` month label).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub date: String,
    pub price: f64,
}

impl PredictionPoint {
    pub fn new(date: impl Into<String>, price: f64) -> Self {
        Self {
            date: date.into(),
            price,
        }
    }
}

/// Forecast series attached to every portfolio entry.
///
/// No forecasting source is wired in yet: unless the caller supplies one,
/// every token carries the same fixed series, flagged `placeholder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSeries {
    pub points: Vec<PredictionPoint>,
    /// True when the points are demo data rather than a real forecast.
    pub placeholder: bool,
}

impl PredictionSeries {
    pub fn placeholder() -> Self {
        Self {
            points: vec![
                PredictionPoint::new("2023-07", 2100.0),
                PredictionPoint::new("2023-08", 2200.0),
                PredictionPoint::new("2023-09", 2300.0),
                PredictionPoint::new("2023-10", 2400.0),
            ],
            placeholder: true,
        }
    }

    /// A caller-provided forecast.
    pub fn supplied(points: Vec<PredictionPoint>) -> Self {
        Self {
            points,
            placeholder: false,
        }
    }
}

impl Default for PredictionSeries {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// One held token with its resolved price and value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub name: String,
    pub symbol: String,
    pub token_address: String,

    /// Quantity held
    pub balance: f64,

    /// Current USD price, `0.0` when unknown
    pub price: f64,

    /// `balance × price`
    pub value: f64,

    pub predictions: PredictionSeries,
}

/// All entries for a wallet, in balance-response order, plus their sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub entries: Vec<PortfolioEntry>,
    pub total_value: f64,
}

impl PortfolioSnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Share of the total held by `entry`, in percent.
    /// `None` when the portfolio is worth nothing.
    pub fn allocation_pct(&self, entry: &PortfolioEntry) -> Option<f64> {
        crate::services::portfolio_service::allocation_pct(entry.value, self.total_value)
    }

    /// Entries paired with their allocation percentage.
    pub fn allocations(&self) -> Vec<(&PortfolioEntry, Option<f64>)> {
        self.entries
            .iter()
            .map(|e| (e, self.allocation_pct(e)))
            .collect()
    }
}

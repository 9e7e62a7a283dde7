use serde::{Deserialize, Serialize};

/// Result of one sub-fetch of the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Data received and applied
    Ok,
    /// Request succeeded but carried no data
    Empty,
    /// Request failed; the default value was kept
    Failed(String),
    /// Not attempted
    #[default]
    Skipped,
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

/// A price request that did not produce a usable price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFailure {
    pub token_address: String,
    pub message: String,
}

/// Outcome of the per-token price fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReport {
    /// Distinct token addresses requested
    pub requested: usize,
    /// Addresses that resolved to a price
    pub resolved: usize,
    /// Addresses for which the API returned no data
    pub missing: Vec<String>,
    /// Addresses whose request failed
    pub failed: Vec<PriceFailure>,
}

impl PriceReport {
    pub fn is_complete(&self) -> bool {
        self.resolved == self.requested
    }
}

/// Per-endpoint outcome of one wallet fetch.
///
/// Sub-fetch failures never abort the fetch; this is what the presentation
/// layer uses to decide whether to show a partial-data banner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchStatus {
    pub reputation: StepOutcome,
    pub balances: StepOutcome,
    pub nft: StepOutcome,
    pub prices: PriceReport,
}

impl FetchStatus {
    /// True when no sub-fetch failed. Empty data is not a failure.
    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }

    /// Human-readable list of everything that went wrong.
    pub fn failures(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (label, step) in [
            ("reputation", &self.reputation),
            ("balances", &self.balances),
            ("nft", &self.nft),
        ] {
            if let StepOutcome::Failed(msg) = step {
                out.push(format!("{label}: {msg}"));
            }
        }
        for f in &self.prices.failed {
            out.push(format!("price {}: {}", f.token_address, f.message));
        }
        out
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::address::WalletAddress;
use super::nft::{NftCounters, NftSnapshot};
use super::portfolio::PortfolioSnapshot;
use super::price::TokenPrices;
use super::reputation::ReputationScore;
use super::status::FetchStatus;
use super::token::TokenBalance;

/// Everything derived for one wallet address by one fetch generation.
///
/// Snapshots are never patched in place: a new address or a refresh
/// produces a fresh snapshot, and the old one is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub address: WalletAddress,

    /// Store generation this snapshot was fetched under
    pub generation: u64,

    pub reputation: ReputationScore,

    /// Balances in API response order
    pub balances: Vec<TokenBalance>,

    pub prices: TokenPrices,

    /// First NFT analytics entry, if the API returned any
    pub nft: Option<NftSnapshot>,

    pub portfolio: PortfolioSnapshot,

    pub status: FetchStatus,

    pub fetched_at: DateTime<Utc>,
}

impl WalletSnapshot {
    pub fn total_value(&self) -> f64 {
        self.portfolio.total_value
    }

    pub fn nft_counters(&self) -> NftCounters {
        NftCounters::from_snapshot(self.nft.as_ref())
    }
}

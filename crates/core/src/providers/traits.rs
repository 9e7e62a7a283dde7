use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::address::WalletAddress;
use crate::models::nft::NftSnapshot;
use crate::models::token::TokenBalance;

/// Trait abstraction over the wallet analytics backend.
///
/// The orchestrator only talks to this trait, so the HTTP client can be
/// swapped for another vendor or an in-memory fake without touching it.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AnalyticsProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Raw `risk_interaction_score` for the wallet, as reported.
    async fn get_risk_score(&self, address: &WalletAddress) -> Result<i64, CoreError>;

    /// First page of token balances, in API order.
    async fn get_token_balances(
        &self,
        address: &WalletAddress,
    ) -> Result<Vec<TokenBalance>, CoreError>;

    /// First NFT analytics entry, or `None` when the API has no data.
    async fn get_nft_analytics(
        &self,
        address: &WalletAddress,
    ) -> Result<Option<NftSnapshot>, CoreError>;

    /// Current USD price of a token, or `None` when the API has no data.
    async fn get_token_price(&self, token_address: &str) -> Result<Option<f64>, CoreError>;
}

use chrono::Utc;
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::address::WalletAddress;
use crate::models::portfolio::PredictionSeries;
use crate::models::reputation::ReputationScore;
use crate::models::snapshot::WalletSnapshot;
use crate::models::status::{FetchStatus, StepOutcome};
use crate::providers::traits::AnalyticsProvider;
use crate::services::portfolio_service::PortfolioService;
use crate::services::price_service::PriceService;

/// Runs the full fetch sequence for one wallet and builds its snapshot.
///
/// Order: reputation → balances → NFT analytics → prices → aggregation.
/// Each step fails independently: the error is logged, recorded in
/// [`FetchStatus`], and the step's default (score 0, no balances, no NFT
/// data, price 0) is kept.
pub struct FetchService {
    provider: Arc<dyn AnalyticsProvider>,
    price_service: PriceService,
    portfolio_service: PortfolioService,
    predictions: PredictionSeries,
}

impl FetchService {
    pub fn new(provider: Arc<dyn AnalyticsProvider>, price_concurrency: usize) -> Self {
        Self {
            price_service: PriceService::new(Arc::clone(&provider), price_concurrency),
            provider,
            portfolio_service: PortfolioService::new(),
            predictions: PredictionSeries::placeholder(),
        }
    }

    /// Replace the forecast series attached to every entry.
    pub fn set_predictions(&mut self, predictions: PredictionSeries) {
        self.predictions = predictions;
    }

    pub fn predictions(&self) -> &PredictionSeries {
        &self.predictions
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch everything for `address` with no staleness checks.
    /// Sub-fetch failures end up in the snapshot status, not in the `Err`.
    pub async fn load_wallet_snapshot(
        &self,
        address: &WalletAddress,
    ) -> Result<WalletSnapshot, CoreError> {
        self.load_guarded(address, 0, &|| true).await
    }

    /// Fetch everything for `address`, checking `is_current` between steps.
    ///
    /// Returns `Superseded` as soon as `is_current` reports false; nothing
    /// fetched so far is returned.
    pub async fn load_guarded(
        &self,
        address: &WalletAddress,
        generation: u64,
        is_current: &(dyn Fn() -> bool + Send + Sync),
    ) -> Result<WalletSnapshot, CoreError> {
        let guard = || {
            if is_current() {
                Ok(())
            } else {
                tracing::info!(%address, generation, "discarding stale fetch");
                Err(CoreError::Superseded { generation })
            }
        };

        let mut status = FetchStatus::default();
        tracing::info!(%address, generation, provider = self.provider.name(), "loading wallet");

        // 1. Reputation
        let reputation = match self.provider.get_risk_score(address).await {
            Ok(risk) => {
                status.reputation = StepOutcome::Ok;
                ReputationScore::from_risk(risk)
            }
            Err(e) => {
                tracing::warn!(%address, error = %e, "reputation request failed");
                status.reputation = StepOutcome::Failed(e.to_string());
                ReputationScore::default()
            }
        };
        guard()?;

        // 2. Token balances
        let balances = match self.provider.get_token_balances(address).await {
            Ok(list) => {
                status.balances = if list.is_empty() {
                    StepOutcome::Empty
                } else {
                    StepOutcome::Ok
                };
                list
            }
            Err(e) => {
                tracing::warn!(%address, error = %e, "balance request failed");
                status.balances = StepOutcome::Failed(e.to_string());
                Vec::new()
            }
        };
        guard()?;

        // 3. NFT analytics
        let nft = match self.provider.get_nft_analytics(address).await {
            Ok(Some(snapshot)) => {
                status.nft = StepOutcome::Ok;
                Some(snapshot)
            }
            Ok(None) => {
                status.nft = StepOutcome::Empty;
                None
            }
            Err(e) => {
                tracing::warn!(%address, error = %e, "NFT analytics request failed");
                status.nft = StepOutcome::Failed(e.to_string());
                None
            }
        };
        guard()?;

        // 4. Prices
        let (prices, report) = self.price_service.fetch_prices(&balances).await;
        status.prices = report;
        guard()?;

        // 5. Aggregate
        let portfolio = self
            .portfolio_service
            .aggregate(&balances, &prices, &self.predictions);

        tracing::info!(
            %address,
            generation,
            tokens = balances.len(),
            priced = status.prices.resolved,
            total_value = portfolio.total_value,
            complete = status.is_complete(),
            "wallet loaded"
        );

        Ok(WalletSnapshot {
            address: address.clone(),
            generation,
            reputation,
            balances,
            prices,
            nft,
            portfolio,
            status,
            fetched_at: Utc::now(),
        })
    }
}

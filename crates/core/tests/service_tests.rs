// ═══════════════════════════════════════════════════════════════════
// Service Tests — PortfolioService, PriceService, FetchService
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wallet_analyzer_core::errors::CoreError;
use wallet_analyzer_core::models::address::WalletAddress;
use wallet_analyzer_core::models::nft::NftSnapshot;
use wallet_analyzer_core::models::portfolio::{PredictionPoint, PredictionSeries};
use wallet_analyzer_core::models::price::TokenPrices;
use wallet_analyzer_core::models::reputation::ReputationScore;
use wallet_analyzer_core::models::status::StepOutcome;
use wallet_analyzer_core::models::token::TokenBalance;
use wallet_analyzer_core::providers::traits::AnalyticsProvider;
use wallet_analyzer_core::services::fetch_service::FetchService;
use wallet_analyzer_core::services::portfolio_service::{allocation_pct, PortfolioService};
use wallet_analyzer_core::services::price_service::PriceService;

const WALLET: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

fn wallet() -> WalletAddress {
    WalletAddress::parse(WALLET).unwrap()
}

fn api_error(msg: &str) -> CoreError {
    CoreError::Api {
        provider: "Mock".into(),
        message: msg.into(),
    }
}

// ═══════════════════════════════════════════════════════════════════
// Mock Provider
// ═══════════════════════════════════════════════════════════════════

/// Configurable in-memory analytics backend. `None` in a field means the
/// corresponding request fails.
struct MockAnalytics {
    risk: Option<i64>,
    balances: Option<Vec<TokenBalance>>,
    nft: Option<Option<NftSnapshot>>,
    prices: HashMap<String, f64>,
    failing_prices: HashSet<String>,
    price_delay: Duration,
    price_calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockAnalytics {
    fn new() -> Self {
        Self {
            risk: Some(15),
            balances: Some(vec![
                TokenBalance::new("Ethereum", "ETH", "0xA", 2.5, 18),
                TokenBalance::new("USD Coin", "USDC", "0xB", 100.0, 6),
            ]),
            nft: Some(Some(NftSnapshot {
                nft_bought: 4,
                nft_sold: 2,
                nft_mint: 1,
                transactions: 9,
                transfers: 11,
                volume: 1500.0,
                ..NftSnapshot::default()
            })),
            prices: HashMap::from([("0xA".to_string(), 2000.0), ("0xB".to_string(), 1.0)]),
            failing_prices: HashSet::new(),
            price_delay: Duration::ZERO,
            price_calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn price_calls(&self) -> Vec<String> {
        self.price_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalyticsProvider for MockAnalytics {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn get_risk_score(&self, _address: &WalletAddress) -> Result<i64, CoreError> {
        self.risk.ok_or_else(|| api_error("reputation down"))
    }

    async fn get_token_balances(
        &self,
        _address: &WalletAddress,
    ) -> Result<Vec<TokenBalance>, CoreError> {
        self.balances
            .clone()
            .ok_or_else(|| api_error("balances down"))
    }

    async fn get_nft_analytics(
        &self,
        _address: &WalletAddress,
    ) -> Result<Option<NftSnapshot>, CoreError> {
        self.nft.clone().ok_or_else(|| api_error("nft down"))
    }

    async fn get_token_price(&self, token_address: &str) -> Result<Option<f64>, CoreError> {
        self.price_calls.lock().unwrap().push(token_address.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.price_delay.is_zero() {
            tokio::time::sleep(self.price_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_prices.contains(token_address) {
            return Err(api_error("metrics down"));
        }
        Ok(self.prices.get(token_address).copied())
    }
}

fn balances(list: &[(&str, &str, f64)]) -> Vec<TokenBalance> {
    list.iter()
        .map(|(sym, addr, qty)| TokenBalance::new(*sym, *sym, *addr, *qty, 18))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════
// PortfolioService — pure aggregation
// ═══════════════════════════════════════════════════════════════════

mod portfolio_service {
    use super::*;

    #[test]
    fn single_token_value_and_total() {
        let svc = PortfolioService::new();
        let b = vec![TokenBalance::new("Ethereum", "ETH", "0xA", 2.5, 18)];
        let prices: TokenPrices = vec![("0xA".to_string(), 2000.0)].into_iter().collect();

        let snap = svc.aggregate(&b, &prices, &PredictionSeries::placeholder());
        assert_eq!(snap.entries.len(), 1);
        assert_eq!(snap.entries[0].value, 5000.0);
        assert_eq!(snap.total_value, 5000.0);
        assert_eq!(wallet_analyzer_core::fmt::format_usd(snap.total_value), "$5000.00");
    }

    #[test]
    fn missing_price_values_at_zero() {
        let svc = PortfolioService::new();
        let b = balances(&[("ETH", "0xA", 2.5), ("FOO", "0xF", 1000.0)]);
        let prices: TokenPrices = vec![("0xA".to_string(), 2000.0)].into_iter().collect();

        let snap = svc.aggregate(&b, &prices, &PredictionSeries::placeholder());
        assert_eq!(snap.entries[1].price, 0.0);
        assert_eq!(snap.entries[1].value, 0.0);
        assert_eq!(snap.total_value, 5000.0);
    }

    #[test]
    fn total_is_sum_of_quantity_times_price() {
        let svc = PortfolioService::new();
        let b = balances(&[("A", "0x1", 1.5), ("B", "0x2", 3.0), ("C", "0x3", 0.25)]);
        let prices: TokenPrices = vec![
            ("0x1".to_string(), 10.0),
            ("0x2".to_string(), 0.5),
            ("0x3".to_string(), 400.0),
        ]
        .into_iter()
        .collect();

        let snap = svc.aggregate(&b, &prices, &PredictionSeries::placeholder());
        let expected: f64 = b.iter().map(|t| t.quantity * prices.price_or_zero(&t.token_address)).sum();
        assert_eq!(snap.total_value, expected);
        assert_eq!(snap.total_value, 15.0 + 1.5 + 100.0);
    }

    #[test]
    fn entries_keep_balance_order() {
        let svc = PortfolioService::new();
        let b = balances(&[("Z", "0xZ", 1.0), ("A", "0xA", 1.0), ("M", "0xM", 1.0)]);
        let snap = svc.aggregate(&b, &TokenPrices::new(), &PredictionSeries::placeholder());
        let symbols: Vec<&str> = snap.entries.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["Z", "A", "M"]);
    }

    #[test]
    fn empty_balances_give_empty_snapshot() {
        let svc = PortfolioService::new();
        let snap = svc.aggregate(&[], &TokenPrices::new(), &PredictionSeries::placeholder());
        assert!(snap.is_empty());
        assert_eq!(snap.total_value, 0.0);
    }

    #[test]
    fn every_entry_gets_the_same_series() {
        let svc = PortfolioService::new();
        let b = balances(&[("A", "0x1", 1.0), ("B", "0x2", 1.0)]);
        let series = PredictionSeries::supplied(vec![PredictionPoint::new("2025-01", 3.0)]);
        let snap = svc.aggregate(&b, &TokenPrices::new(), &series);
        assert!(snap.entries.iter().all(|e| e.predictions == series));
    }

    #[test]
    fn allocation_percentages() {
        let svc = PortfolioService::new();
        let b = balances(&[("A", "0x1", 3.0), ("B", "0x2", 1.0)]);
        let prices: TokenPrices = vec![("0x1".to_string(), 1.0), ("0x2".to_string(), 1.0)]
            .into_iter()
            .collect();
        let snap = svc.aggregate(&b, &prices, &PredictionSeries::placeholder());
        let pcts: Vec<Option<f64>> = snap.allocations().into_iter().map(|(_, p)| p).collect();
        assert_eq!(pcts, vec![Some(75.0), Some(25.0)]);
    }

    #[test]
    fn allocation_undefined_for_worthless_portfolio() {
        assert_eq!(allocation_pct(0.0, 0.0), None);
        assert_eq!(allocation_pct(5.0, 0.0), None);
        assert_eq!(allocation_pct(5.0, f64::NAN), None);
        assert_eq!(allocation_pct(5.0, 10.0), Some(50.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// PriceService — fan-out
// ═══════════════════════════════════════════════════════════════════

mod price_service {
    use super::*;

    #[tokio::test]
    async fn one_request_per_distinct_address() {
        let mock = Arc::new(MockAnalytics::new());
        let svc = PriceService::new(mock.clone(), 4);
        let b = balances(&[("A", "0xA", 1.0), ("B", "0xB", 1.0), ("A2", "0xA", 2.0)]);

        let (prices, report) = svc.fetch_prices(&b).await;

        let mut calls = mock.price_calls();
        calls.sort();
        assert_eq!(calls, vec!["0xA", "0xB"]);
        assert_eq!(report.requested, 2);
        assert_eq!(report.resolved, 2);
        assert_eq!(prices.get_price("0xA"), Some(2000.0));
    }

    #[tokio::test]
    async fn failures_and_missing_are_reported_not_fatal() {
        let mut mock = MockAnalytics::new();
        mock.failing_prices.insert("0xB".into());
        let mock = Arc::new(mock);
        let svc = PriceService::new(mock.clone(), 2);
        let b = balances(&[("A", "0xA", 1.0), ("B", "0xB", 1.0), ("C", "0xC", 1.0)]);

        let (prices, report) = svc.fetch_prices(&b).await;

        assert_eq!(report.requested, 3);
        assert_eq!(report.resolved, 1);
        assert_eq!(report.missing, vec!["0xC"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].token_address, "0xB");
        assert!(!report.is_complete());
        assert_eq!(prices.len(), 1);
        assert_eq!(prices.price_or_zero("0xB"), 0.0);
    }

    #[tokio::test]
    async fn price_keys_are_subset_of_balances() {
        let mut mock = MockAnalytics::new();
        mock.prices.insert("0xUNRELATED".into(), 5.0);
        let svc = PriceService::new(Arc::new(mock), 4);
        let b = balances(&[("A", "0xA", 1.0)]);

        let (prices, _) = svc.fetch_prices(&b).await;
        let keys: Vec<&str> = prices.addresses().collect();
        assert_eq!(keys, vec!["0xA"]);
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let mut mock = MockAnalytics::new();
        mock.price_delay = Duration::from_millis(20);
        let mock = Arc::new(mock);
        let svc = PriceService::new(mock.clone(), 3);
        let list: Vec<TokenBalance> = (0..10)
            .map(|i| TokenBalance::new("T", "T", format!("0x{i}"), 1.0, 0))
            .collect();

        let (_, report) = svc.fetch_prices(&list).await;

        assert_eq!(report.requested, 10);
        assert_eq!(mock.price_calls().len(), 10);
        let max = mock.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 3, "max in flight was {max}");
        assert!(max >= 2, "requests never overlapped");
    }

    #[tokio::test]
    async fn concurrency_one_is_sequential_in_balance_order() {
        let mut mock = MockAnalytics::new();
        mock.price_delay = Duration::from_millis(1);
        let mock = Arc::new(mock);
        let svc = PriceService::new(mock.clone(), 1);
        let b = balances(&[("C", "0xC", 1.0), ("A", "0xA", 1.0), ("B", "0xB", 1.0)]);

        svc.fetch_prices(&b).await;

        assert_eq!(mock.price_calls(), vec!["0xC", "0xA", "0xB"]);
        assert_eq!(mock.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_concurrency_is_clamped() {
        let svc = PriceService::new(Arc::new(MockAnalytics::new()), 0);
        assert_eq!(svc.concurrency(), 1);
    }

    #[tokio::test]
    async fn no_balances_no_requests() {
        let mock = Arc::new(MockAnalytics::new());
        let svc = PriceService::new(mock.clone(), 4);
        let (prices, report) = svc.fetch_prices(&[]).await;
        assert!(prices.is_empty());
        assert_eq!(report.requested, 0);
        assert!(report.is_complete());
        assert!(mock.price_calls().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// FetchService — orchestration
// ═══════════════════════════════════════════════════════════════════

mod fetch_service {
    use super::*;

    #[tokio::test]
    async fn happy_path_builds_full_snapshot() {
        let svc = FetchService::new(Arc::new(MockAnalytics::new()), 4);
        let snap = svc.load_wallet_snapshot(&wallet()).await.unwrap();

        assert_eq!(snap.address, wallet());
        assert_eq!(snap.reputation, ReputationScore::from_risk(15));
        assert_eq!(snap.reputation.value(), 85);
        assert_eq!(snap.balances.len(), 2);
        assert_eq!(snap.nft.as_ref().unwrap().nft_bought, 4);
        assert_eq!(snap.total_value(), 2.5 * 2000.0 + 100.0);
        assert!(snap.status.is_complete());
        assert_eq!(snap.status.reputation, StepOutcome::Ok);
        assert_eq!(snap.status.balances, StepOutcome::Ok);
        assert_eq!(snap.status.nft, StepOutcome::Ok);
    }

    #[tokio::test]
    async fn reputation_failure_keeps_zero_and_continues() {
        let mut mock = MockAnalytics::new();
        mock.risk = None;
        let svc = FetchService::new(Arc::new(mock), 4);
        let snap = svc.load_wallet_snapshot(&wallet()).await.unwrap();

        assert_eq!(snap.reputation.value(), 0);
        assert!(snap.status.reputation.is_failed());
        assert_eq!(snap.balances.len(), 2);
        assert_eq!(snap.total_value(), 5100.0);
    }

    #[tokio::test]
    async fn balance_failure_skips_prices() {
        let mut mock = MockAnalytics::new();
        mock.balances = None;
        let mock = Arc::new(mock);
        let svc = FetchService::new(mock.clone(), 4);
        let snap = svc.load_wallet_snapshot(&wallet()).await.unwrap();

        assert!(snap.balances.is_empty());
        assert!(snap.status.balances.is_failed());
        assert!(mock.price_calls().is_empty());
        assert_eq!(snap.total_value(), 0.0);
        // NFT is independent of balances
        assert!(snap.nft.is_some());
    }

    #[tokio::test]
    async fn empty_nft_data_stays_none() {
        let mut mock = MockAnalytics::new();
        mock.nft = Some(None);
        let svc = FetchService::new(Arc::new(mock), 4);
        let snap = svc.load_wallet_snapshot(&wallet()).await.unwrap();

        assert!(snap.nft.is_none());
        assert_eq!(snap.status.nft, StepOutcome::Empty);
        let c = snap.nft_counters();
        assert_eq!((c.transactions, c.transfers, c.bought, c.sold, c.minted, c.burned), (0, 0, 0, 0, 0, 0));
        assert!(snap.status.is_complete());
    }

    #[tokio::test]
    async fn nft_failure_recorded() {
        let mut mock = MockAnalytics::new();
        mock.nft = None;
        let svc = FetchService::new(Arc::new(mock), 4);
        let snap = svc.load_wallet_snapshot(&wallet()).await.unwrap();
        assert!(snap.nft.is_none());
        assert!(snap.status.nft.is_failed());
        assert!(!snap.status.is_complete());
    }

    #[tokio::test]
    async fn everything_failing_still_yields_snapshot() {
        let mut mock = MockAnalytics::new();
        mock.risk = None;
        mock.balances = None;
        mock.nft = None;
        let svc = FetchService::new(Arc::new(mock), 4);
        let snap = svc.load_wallet_snapshot(&wallet()).await.unwrap();

        assert_eq!(snap.reputation.value(), 0);
        assert!(snap.portfolio.is_empty());
        assert_eq!(snap.status.failures().len(), 3);
    }

    #[tokio::test]
    async fn out_of_range_risk_is_clamped() {
        let mut mock = MockAnalytics::new();
        mock.risk = Some(140);
        let svc = FetchService::new(Arc::new(mock), 4);
        let snap = svc.load_wallet_snapshot(&wallet()).await.unwrap();
        assert_eq!(snap.reputation.value(), 0);
    }

    #[tokio::test]
    async fn guard_false_returns_superseded() {
        let mock = Arc::new(MockAnalytics::new());
        let svc = FetchService::new(mock.clone(), 4);
        let result = svc.load_guarded(&wallet(), 3, &|| false).await;

        assert!(matches!(result, Err(CoreError::Superseded { generation: 3 })));
        // aborted right after the first step
        assert!(mock.price_calls().is_empty());
    }

    #[tokio::test]
    async fn supplied_predictions_replace_placeholder() {
        let mut svc = FetchService::new(Arc::new(MockAnalytics::new()), 4);
        let series = PredictionSeries::supplied(vec![PredictionPoint::new("2025-06", 1.0)]);
        svc.set_predictions(series.clone());
        let snap = svc.load_wallet_snapshot(&wallet()).await.unwrap();
        assert!(snap.portfolio.entries.iter().all(|e| e.predictions == series));
    }

    #[tokio::test]
    async fn default_predictions_are_placeholder() {
        let svc = FetchService::new(Arc::new(MockAnalytics::new()), 4);
        let snap = svc.load_wallet_snapshot(&wallet()).await.unwrap();
        assert!(snap.portfolio.entries.iter().all(|e| e.predictions.placeholder));
    }
}

pub mod errors;
pub mod fmt;
pub mod models;
pub mod providers;
pub mod services;
pub mod store;

use std::sync::Arc;

use errors::CoreError;
use models::{
    address::WalletAddress, portfolio::PredictionSeries, settings::Settings,
    snapshot::WalletSnapshot,
};
use providers::{traits::AnalyticsProvider, unleash::UnleashProvider};
use services::fetch_service::FetchService;
use store::SnapshotStore;

/// Main entry point for the Wallet Analyzer core library.
///
/// Validates addresses, runs the fetch sequence and keeps the snapshot of
/// the active address. All methods take `&self`, so one analyzer can be
/// shared (e.g. behind an `Arc`) by a UI and its background tasks.
#[must_use]
pub struct WalletAnalyzer {
    fetch_service: FetchService,
    store: SnapshotStore,
}

impl std::fmt::Debug for WalletAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletAnalyzer")
            .field("provider", &self.fetch_service.provider_name())
            .field("active_address", &self.store.active_address())
            .field("generation", &self.store.generation())
            .field("loading", &self.store.is_loading())
            .finish()
    }
}

impl WalletAnalyzer {
    /// Build an analyzer on top of any analytics provider.
    pub fn new(provider: Arc<dyn AnalyticsProvider>, settings: &Settings) -> Self {
        Self {
            fetch_service: FetchService::new(provider, settings.effective_concurrency()),
            store: SnapshotStore::new(),
        }
    }

    /// Build an analyzer backed by the UnleashNFTs HTTP API.
    /// Fails with `MissingApiKey` when no key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let provider = UnleashProvider::new(settings)?;
        Ok(Self::new(Arc::new(provider), settings))
    }

    /// Attach a caller-supplied forecast instead of the placeholder series.
    pub fn with_predictions(mut self, predictions: PredictionSeries) -> Self {
        self.fetch_service.set_predictions(predictions);
        self
    }

    // ── Search ──────────────────────────────────────────────────────

    /// Validate `input` and load its snapshot, making it the active address.
    ///
    /// - Invalid input returns `InvalidAddress` before any request is made.
    /// - If another search or a `clear()` happens while this one is in
    ///   flight, this call returns `Superseded` and leaves the newer state
    ///   untouched.
    pub async fn search(&self, input: &str) -> Result<WalletSnapshot, CoreError> {
        let address = WalletAddress::parse(input)?;
        self.load(address).await
    }

    /// Re-fetch the active address, if any.
    pub async fn refresh(&self) -> Result<Option<WalletSnapshot>, CoreError> {
        match self.store.active_address() {
            Some(address) => self.load(address).await.map(Some),
            None => Ok(None),
        }
    }

    async fn load(&self, address: WalletAddress) -> Result<WalletSnapshot, CoreError> {
        let ticket = self.store.begin(address);
        let is_current = || self.store.is_current(&ticket);

        let result = self
            .fetch_service
            .load_guarded(ticket.address(), ticket.generation(), &is_current)
            .await;

        match result {
            Ok(snapshot) => {
                if self.store.commit(&ticket, snapshot.clone()) {
                    Ok(snapshot)
                } else {
                    tracing::info!(
                        address = %ticket.address(),
                        generation = ticket.generation(),
                        "dropping superseded snapshot"
                    );
                    Err(CoreError::Superseded {
                        generation: ticket.generation(),
                    })
                }
            }
            Err(e) => {
                self.store.finish(&ticket);
                Err(e)
            }
        }
    }

    // ── State ───────────────────────────────────────────────────────

    /// Reset all derived state. In-flight searches become stale.
    pub fn clear(&self) {
        self.store.clear();
    }

    /// Snapshot of the active address, once its fetch has completed.
    #[must_use]
    pub fn current(&self) -> Option<WalletSnapshot> {
        self.store.current()
    }

    #[must_use]
    pub fn active_address(&self) -> Option<WalletAddress> {
        self.store.active_address()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    #[must_use]
    pub fn predictions(&self) -> &PredictionSeries {
        self.fetch_service.predictions()
    }
}

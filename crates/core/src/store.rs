use std::sync::{Mutex, MutexGuard};

use crate::models::address::WalletAddress;
use crate::models::snapshot::WalletSnapshot;

/// Handle for one in-flight fetch. Only the holder of the latest ticket may
/// write to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    address: WalletAddress,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }
}

#[derive(Debug, Default)]
struct StoreState {
    generation: u64,
    address: Option<WalletAddress>,
    loading: bool,
    snapshot: Option<WalletSnapshot>,
}

/// Holds the derived state for the active wallet address.
///
/// Every address change bumps a generation counter; responses carrying an
/// older generation are dropped on commit, so a slow fetch for a previous
/// address can never overwrite the current one.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    state: Mutex<StoreState>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a fetch for `address`: new generation, previous snapshot
    /// discarded, loading set.
    pub fn begin(&self, address: WalletAddress) -> FetchTicket {
        let mut state = self.lock();
        state.generation += 1;
        state.address = Some(address.clone());
        state.snapshot = None;
        state.loading = true;
        FetchTicket {
            generation: state.generation,
            address,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.lock().generation == ticket.generation
    }

    /// Store `snapshot` if `ticket` is still current. Returns whether it
    /// was stored.
    pub fn commit(&self, ticket: &FetchTicket, snapshot: WalletSnapshot) -> bool {
        let mut state = self.lock();
        if state.generation != ticket.generation {
            return false;
        }
        state.snapshot = Some(snapshot);
        state.loading = false;
        true
    }

    /// Leave the loading state without a snapshot (used when a current
    /// fetch ends in an error).
    pub fn finish(&self, ticket: &FetchTicket) {
        let mut state = self.lock();
        if state.generation == ticket.generation {
            state.loading = false;
        }
    }

    /// Forget the active address and all derived state. Any fetch still in
    /// flight becomes stale.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.address = None;
        state.snapshot = None;
        state.loading = false;
    }

    pub fn current(&self) -> Option<WalletSnapshot> {
        self.lock().snapshot.clone()
    }

    pub fn active_address(&self) -> Option<WalletAddress> {
        self.lock().address.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }
}

use thiserror::Error;

/// Unified error type for the entire wallet-analyzer-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input / Configuration ───────────────────────────────────────
    #[error("{0}")]
    InvalidAddress(String),

    #[error("API key not found: set UNLEASH_API_KEY")]
    MissingApiKey,

    #[error("Configuration error: {0}")]
    Config(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Orchestration ───────────────────────────────────────────────
    #[error("Fetch for generation {generation} was superseded by a newer request")]
    Superseded { generation: u64 },
}

impl CoreError {
    /// True for errors caused by user input rather than the remote service.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::InvalidAddress(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; wallet and token addresses
        // travel in the query string, so drop it.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

use serde::{Deserialize, Serialize};

/// Wallet reputation in `[0, 100]`, the complement of the remote
/// `risk_interaction_score`. Higher is more trustworthy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReputationScore(u8);

impl ReputationScore {
    pub const MAX: u8 = 100;

    /// `100 - risk`, with `risk` clamped into `[0, 100]` first.
    pub fn from_risk(risk: i64) -> Self {
        let clamped = risk.clamp(0, i64::from(Self::MAX));
        if clamped != risk {
            tracing::warn!(risk, clamped, "risk_interaction_score outside [0, 100], clamping");
        }
        // clamped is within 0..=100, the cast cannot truncate
        Self(Self::MAX - clamped as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Fraction of the gauge to fill, `0.0..=1.0`.
    pub fn ratio(self) -> f64 {
        f64::from(self.0) / f64::from(Self::MAX)
    }
}

impl std::fmt::Display for ReputationScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

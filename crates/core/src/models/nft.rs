use serde::{Deserialize, Serialize};

use super::de;

/// Aggregate NFT activity for one wallet (first page, first entry only).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NftSnapshot {
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub nft_bought: u64,

    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub nft_sold: u64,

    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub nft_mint: u64,

    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub nft_transfer: u64,

    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub nft_burn: u64,

    /// Total NFT transactions
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub transactions: u64,

    /// Total NFT transfers
    #[serde(default, deserialize_with = "de::u64_or_zero")]
    pub transfers: u64,

    /// Traded volume in USD
    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub volume: f64,
}

/// Counters as displayed: an absent snapshot renders every counter as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NftCounters {
    pub transactions: u64,
    pub transfers: u64,
    pub bought: u64,
    pub sold: u64,
    pub minted: u64,
    pub burned: u64,
}

impl NftCounters {
    pub fn from_snapshot(snapshot: Option<&NftSnapshot>) -> Self {
        match snapshot {
            Some(s) => Self {
                transactions: s.transactions,
                transfers: s.transfers,
                bought: s.nft_bought,
                sold: s.nft_sold,
                minted: s.nft_mint,
                burned: s.nft_burn,
            },
            None => Self::default(),
        }
    }
}

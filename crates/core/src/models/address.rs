use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::errors::CoreError;

fn address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap_or_else(|e| panic!("invalid address regex: {e}"))
    })
}

/// An EVM wallet address: `0x` followed by 40 hexadecimal characters.
///
/// Can only be constructed through [`WalletAddress::parse`], so holding one
/// means the value has already passed the shape check. Case is preserved as
/// entered (no checksum normalisation).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Validate user input. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidAddress(
                "Please enter a wallet address".into(),
            ));
        }
        if !address_pattern().is_match(trimmed) {
            return Err(CoreError::InvalidAddress(
                "Please enter a valid Ethereum wallet address".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for headers: `0x1234...abcd`.
    pub fn short(&self) -> String {
        crate::fmt::short_address(&self.0)
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for WalletAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Domain models for the trust registry
//!
//! A trust record is produced by one registry read and never mutated locally.
//! Write requests carry the privileged update payloads and validate
//! themselves before anything is submitted on-chain.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{TrustError, TrustResult};
use crate::score::MAX_SCORE;

// =============================================================================
// Account Identifier
// =============================================================================

/// A validated 20-byte account identifier.
///
/// The only accepted text form is `0x` followed by exactly 40 hex digits.
/// Parsing never touches the network, so malformed input is rejected before
/// any registry call is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalletAddress(Address);

impl WalletAddress {
    pub const ZERO: WalletAddress = WalletAddress(Address::ZERO);

    pub fn parse(input: &str) -> TrustResult<Self> {
        input.parse()
    }

    pub fn as_address(&self) -> Address {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == Address::ZERO
    }

    /// EIP-55 checksummed form.
    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }

    /// `0x1234...abcd` style abbreviation keeping `head` leading and `tail`
    /// trailing characters of the checksummed form.
    pub fn shortened(&self, head: usize, tail: usize) -> String {
        shorten(&self.to_checksum(), head, tail)
    }
}

impl FromStr for WalletAddress {
    type Err = TrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix("0x")
            .ok_or_else(|| TrustError::InvalidAddress(s.to_string()))?;

        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TrustError::InvalidAddress(s.to_string()));
        }

        Address::from_str(s)
            .map(WalletAddress)
            .map_err(|_| TrustError::InvalidAddress(s.to_string()))
    }
}

impl From<Address> for WalletAddress {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl From<WalletAddress> for Address {
    fn from(wallet: WalletAddress) -> Self {
        wallet.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl Serialize for WalletAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Abbreviate an identifier to `head...tail`. Strings too short to benefit
/// are returned unchanged.
pub fn shorten(value: &str, head: usize, tail: usize) -> String {
    if value.len() <= head + tail + 3 || !value.is_ascii() {
        return value.to_string();
    }
    format!("{}...{}", &value[..head], &value[value.len() - tail..])
}

// =============================================================================
// Trust Record
// =============================================================================

/// Per-address record stored in the trust registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustRecord {
    /// Raw on-chain score. Clamp with [`crate::display_score`] before showing.
    pub score: u64,

    /// Time of the last registry update
    pub last_updated: DateTime<Utc>,

    /// Transaction count recorded by the registry owner
    pub total_tx: u64,

    /// Wallet age in days
    pub wallet_age_days: u64,

    pub is_verified: bool,
}

impl TrustRecord {
    /// Build a record from the registry's `uint256` fields.
    ///
    /// Values wider than 64 bits saturate. A timestamp chrono cannot represent
    /// falls back to the Unix epoch.
    pub fn from_onchain(
        score: U256,
        last_updated: U256,
        total_tx: U256,
        wallet_age: U256,
        is_verified: bool,
    ) -> Self {
        let last_updated = i64::try_from(saturating_u64(last_updated))
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        Self {
            score: saturating_u64(score),
            last_updated,
            total_tx: saturating_u64(total_tx),
            wallet_age_days: saturating_u64(wallet_age),
            is_verified,
        }
    }

    /// A zero score means the address was never registered.
    pub fn is_registered(&self) -> bool {
        self.score > 0
    }
}

/// Narrow an on-chain uint256 to `u64`, saturating at `u64::MAX`.
pub fn saturating_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

// =============================================================================
// Privileged Writes
// =============================================================================

/// Payload of `updateTrustScore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustUpdate {
    pub score: u64,
    pub total_tx: u64,
    pub wallet_age_days: u64,
}

impl TrustUpdate {
    pub fn validate(&self) -> TrustResult<()> {
        if self.score > u64::from(MAX_SCORE) {
            return Err(TrustError::ScoreOutOfRange(self.score));
        }
        Ok(())
    }
}

/// Payload of `batchUpdateScores`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchScoreUpdate {
    pub wallets: Vec<WalletAddress>,
    pub scores: Vec<u64>,
}

impl BatchScoreUpdate {
    pub fn validate(&self) -> TrustResult<()> {
        if self.wallets.is_empty() {
            return Err(TrustError::EmptyBatch);
        }
        if self.wallets.len() != self.scores.len() {
            return Err(TrustError::BatchLengthMismatch {
                wallets: self.wallets.len(),
                scores: self.scores.len(),
            });
        }
        if let Some(score) = self.scores.iter().find(|s| **s > u64::from(MAX_SCORE)) {
            return Err(TrustError::ScoreOutOfRange(*score));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    #[test]
    fn test_parse_valid_address() {
        let wallet = WalletAddress::parse(VITALIK).unwrap();
        assert_eq!(wallet.to_checksum(), VITALIK);

        let lower = WalletAddress::parse(&VITALIK.to_lowercase()).unwrap();
        assert_eq!(lower, wallet);
    }

    #[test]
    fn test_reject_malformed_addresses() {
        for input in [
            "",
            "0x",
            "d8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA9604",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA960455",
            "0xzzdA6BF26964aF9D7eEd9e03E53415D37aA96045",
            " 0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            "vitalik.eth",
        ] {
            assert_eq!(
                WalletAddress::parse(input),
                Err(TrustError::InvalidAddress(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_shortened_address() {
        let wallet = WalletAddress::parse(VITALIK).unwrap();
        assert_eq!(wallet.shortened(6, 4), "0xd8dA...6045");
        assert_eq!(wallet.shortened(10, 8), "0xd8dA6BF2...7aA96045");
        assert_eq!(shorten("0x1234", 6, 4), "0x1234");
    }

    #[test]
    fn test_address_serde_uses_checksum() {
        let wallet = WalletAddress::parse(&VITALIK.to_lowercase()).unwrap();
        let json = serde_json::to_string(&wallet).unwrap();
        assert_eq!(json, format!("\"{}\"", VITALIK));

        let bad: Result<WalletAddress, _> = serde_json::from_str("\"0x1234\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_record_from_onchain() {
        let record = TrustRecord::from_onchain(
            U256::from(87),
            U256::from(1_700_000_000u64),
            U256::from(1247),
            U256::from(840),
            true,
        );
        assert_eq!(record.score, 87);
        assert_eq!(record.last_updated.timestamp(), 1_700_000_000);
        assert_eq!(record.total_tx, 1247);
        assert_eq!(record.wallet_age_days, 840);
        assert!(record.is_registered());
    }

    #[test]
    fn test_record_saturates_wide_values() {
        let record =
            TrustRecord::from_onchain(U256::MAX, U256::MAX, U256::ZERO, U256::ZERO, false);
        assert_eq!(record.score, u64::MAX);
        assert_eq!(record.last_updated, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_saturating_u64() {
        assert_eq!(saturating_u64(U256::from(42)), 42);
        assert_eq!(saturating_u64(U256::from(u64::MAX)), u64::MAX);
        assert_eq!(saturating_u64(U256::from(u64::MAX) + U256::from(1)), u64::MAX);
    }

    #[test]
    fn test_zero_score_is_unregistered() {
        let record = TrustRecord::from_onchain(
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            false,
        );
        assert!(!record.is_registered());
    }

    #[test]
    fn test_update_validation() {
        let ok = TrustUpdate { score: 100, total_tx: 5, wallet_age_days: 2 };
        assert!(ok.validate().is_ok());

        let too_high = TrustUpdate { score: 101, total_tx: 5, wallet_age_days: 2 };
        assert_eq!(too_high.validate(), Err(TrustError::ScoreOutOfRange(101)));
    }

    #[test]
    fn test_batch_validation() {
        let wallet = WalletAddress::parse(VITALIK).unwrap();

        let empty = BatchScoreUpdate { wallets: vec![], scores: vec![] };
        assert_eq!(empty.validate(), Err(TrustError::EmptyBatch));

        let mismatched = BatchScoreUpdate { wallets: vec![wallet], scores: vec![50, 60] };
        assert_eq!(
            mismatched.validate(),
            Err(TrustError::BatchLengthMismatch { wallets: 1, scores: 2 })
        );

        let out_of_range = BatchScoreUpdate { wallets: vec![wallet], scores: vec![250] };
        assert_eq!(out_of_range.validate(), Err(TrustError::ScoreOutOfRange(250)));

        let ok = BatchScoreUpdate { wallets: vec![wallet], scores: vec![75] };
        assert!(ok.validate().is_ok());
    }
}

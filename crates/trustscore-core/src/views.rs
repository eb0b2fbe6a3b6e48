//! View models rendered by the dashboard.
//!
//! Each view is plain data: the API layer serializes it and clients decide how
//! to draw it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::chain::Chain;
use crate::models::{TrustRecord, WalletAddress};
use crate::score::{display_score, RiskLevel, ScoreBand};

/// On-chain trust score panel for one address.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrustView {
    /// Registry address is still the zero placeholder
    NotDeployed { chain: String },
    /// The registry holds no record (score of zero)
    NotRegistered { address: WalletAddress },
    Record(TrustCard),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrustCard {
    pub address: WalletAddress,
    pub short_address: String,
    pub score: u8,
    pub band: ScoreBand,
    pub label: &'static str,
    pub risk_level: RiskLevel,
    pub risk_label: &'static str,
    pub verified: bool,
    pub total_tx: u64,
    pub wallet_age_days: u64,
    pub last_updated: DateTime<Utc>,
    pub explorer_url: String,
}

impl TrustView {
    pub fn not_deployed(chain: &Chain) -> Self {
        TrustView::NotDeployed {
            chain: chain.name.to_string(),
        }
    }

    /// Build the panel from a registry lookup.
    ///
    /// An absent record and a zero score both render as "not registered",
    /// never as a zero-score card.
    pub fn from_lookup(address: WalletAddress, record: Option<TrustRecord>, chain: &Chain) -> Self {
        match record {
            Some(record) if record.is_registered() => {
                TrustView::Record(TrustCard::new(address, &record, chain))
            }
            _ => TrustView::NotRegistered { address },
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, TrustView::Record(_))
    }
}

impl TrustCard {
    pub fn new(address: WalletAddress, record: &TrustRecord, chain: &Chain) -> Self {
        let score = display_score(i128::from(record.score));
        let band = ScoreBand::from_score(score);
        let risk_level = band.risk_level();

        Self {
            address,
            short_address: address.shortened(10, 8),
            score,
            band,
            label: band.label(),
            risk_level,
            risk_label: risk_level.label(),
            verified: record.is_verified,
            total_tx: record.total_tx,
            wallet_age_days: record.wallet_age_days,
            last_updated: record.last_updated,
            explorer_url: chain.address_url(&address.to_checksum()),
        }
    }
}

/// Deployment banner for the registry contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractStatusView {
    pub deployed: bool,
    pub address: WalletAddress,
    pub short_address: String,
    pub chain_id: u64,
    pub chain_name: &'static str,
    pub total_registered: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
}

impl ContractStatusView {
    pub fn new(address: WalletAddress, chain: &Chain, total_registered: u64) -> Self {
        let deployed = !address.is_zero();
        Self {
            deployed,
            address,
            short_address: address.shortened(6, 4),
            chain_id: chain.id,
            chain_name: chain.name,
            total_registered: if deployed { total_registered } else { 0 },
            explorer_url: deployed.then(|| chain.address_url(&address.to_checksum())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::POLYGON;

    fn wallet() -> WalletAddress {
        WalletAddress::parse("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").unwrap()
    }

    fn record(score: u64) -> TrustRecord {
        TrustRecord {
            score,
            last_updated: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            total_tx: 1247,
            wallet_age_days: 840,
            is_verified: true,
        }
    }

    #[test]
    fn test_missing_record_is_not_registered() {
        let view = TrustView::from_lookup(wallet(), None, &POLYGON);
        assert_eq!(view, TrustView::NotRegistered { address: wallet() });
    }

    #[test]
    fn test_zero_score_is_not_registered() {
        let view = TrustView::from_lookup(wallet(), Some(record(0)), &POLYGON);
        assert!(!view.is_registered());
        assert!(matches!(view, TrustView::NotRegistered { .. }));
    }

    #[test]
    fn test_record_card_clamps_score() {
        let view = TrustView::from_lookup(wallet(), Some(record(240)), &POLYGON);
        let TrustView::Record(card) = view else {
            panic!("expected a record card");
        };
        assert_eq!(card.score, 100);
        assert_eq!(card.band, ScoreBand::Excellent);
        assert_eq!(card.label, "Excellent");
        assert_eq!(card.short_address, "0xd8dA6BF2...7aA96045");
        assert_eq!(
            card.explorer_url,
            "https://polygonscan.com/address/0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
        );
    }

    #[test]
    fn test_view_serializes_with_state_tag() {
        let json = serde_json::to_value(TrustView::not_deployed(&POLYGON)).unwrap();
        assert_eq!(json["state"], "not_deployed");
        assert_eq!(json["chain"], "Polygon");

        let json =
            serde_json::to_value(TrustView::from_lookup(wallet(), Some(record(55)), &POLYGON))
                .unwrap();
        assert_eq!(json["state"], "record");
        assert_eq!(json["score"], 55);
        assert_eq!(json["band"], "fair");
        assert_eq!(json["risk_level"], "medium");
    }

    #[test]
    fn test_contract_status_not_deployed() {
        let status = ContractStatusView::new(WalletAddress::ZERO, &POLYGON, 42);
        assert!(!status.deployed);
        assert_eq!(status.total_registered, 0);
        assert_eq!(status.explorer_url, None);
    }

    #[test]
    fn test_contract_status_deployed() {
        let status = ContractStatusView::new(wallet(), &POLYGON, 42);
        assert!(status.deployed);
        assert_eq!(status.short_address, "0xd8dA...6045");
        assert_eq!(status.total_registered, 42);
        assert_eq!(status.chain_name, "Polygon");
        assert!(status.explorer_url.unwrap().starts_with("https://polygonscan.com/address/"));
    }
}

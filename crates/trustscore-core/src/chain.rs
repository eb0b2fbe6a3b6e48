//! Networks the dashboard knows how to link to.

use serde::Serialize;

use crate::error::{TrustError, TrustResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chain {
    pub id: u64,
    pub name: &'static str,
    pub explorer_url: &'static str,
}

pub const ETHEREUM: Chain = Chain {
    id: 1,
    name: "Ethereum",
    explorer_url: "https://etherscan.io",
};

pub const POLYGON: Chain = Chain {
    id: 137,
    name: "Polygon",
    explorer_url: "https://polygonscan.com",
};

pub const OPTIMISM: Chain = Chain {
    id: 10,
    name: "OP Mainnet",
    explorer_url: "https://optimistic.etherscan.io",
};

pub const ARBITRUM: Chain = Chain {
    id: 42161,
    name: "Arbitrum One",
    explorer_url: "https://arbiscan.io",
};

pub const BASE: Chain = Chain {
    id: 8453,
    name: "Base",
    explorer_url: "https://basescan.org",
};

pub const SEPOLIA: Chain = Chain {
    id: 11155111,
    name: "Sepolia",
    explorer_url: "https://sepolia.etherscan.io",
};

pub const SUPPORTED_CHAINS: [Chain; 6] = [ETHEREUM, POLYGON, OPTIMISM, ARBITRUM, BASE, SEPOLIA];

/// Chain the trust registry is deployed to unless configured otherwise.
pub const DEFAULT_REGISTRY_CHAIN: Chain = POLYGON;

impl Chain {
    pub fn from_id(id: u64) -> TrustResult<Self> {
        SUPPORTED_CHAINS
            .iter()
            .copied()
            .find(|c| c.id == id)
            .ok_or(TrustError::UnknownChain(id))
    }

    /// Block explorer page for an address on this chain.
    pub fn address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_url, address)
    }

    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

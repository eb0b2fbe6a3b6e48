use serde::{Deserialize, Serialize};
use trustscore_core::WalletAddress;

// ============================================================================
// Health check
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub registry: String,
    pub rpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    pub pending_writes: usize,
}

// ============================================================================
// GET /api/v1/wallet/{address}/score
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub address: WalletAddress,
    /// Raw registry score, `None` while the registry is not deployed
    pub score: Option<u64>,
    /// Score clamped to 0-100
    pub display_score: Option<u8>,
}

// ============================================================================
// GET /api/v1/wallet/{address}/registered
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub address: WalletAddress,
    pub registered: bool,
}

// ============================================================================
// GET /api/v1/registry/*
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TotalRegisteredResponse {
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub owner: WalletAddress,
    /// Whether the configured signer is the owner; `None` without a signer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_is_owner: Option<bool>,
}

// ============================================================================
// Privileged writes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UpdateTrustRequest {
    pub score: u64,
    pub total_tx: u64,
    pub wallet_age_days: u64,
}

#[derive(Debug, Deserialize)]
pub struct VerificationRequest {
    pub verified: bool,
}

/// Addresses arrive as raw strings so each one can be reported individually.
#[derive(Debug, Deserialize)]
pub struct BatchUpdateRequest {
    pub wallets: Vec<String>,
    pub scores: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct WriteAcceptedResponse {
    pub tx_hash: String,
    pub function: String,
    pub status: String,
    pub explorer_url: String,
}

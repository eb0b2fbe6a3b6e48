//! Error types for Trust Score Core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrustError {
    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("Score out of range: {0} (expected 0-100)")]
    ScoreOutOfRange(u64),

    #[error("Batch length mismatch: {wallets} wallets, {scores} scores")]
    BatchLengthMismatch { wallets: usize, scores: usize },

    #[error("Batch must contain at least one wallet")]
    EmptyBatch,

    #[error("Unknown chain id: {0}")]
    UnknownChain(u64),
}

pub type TrustResult<T> = Result<T, TrustError>;

//! Trust registry client.
//!
//! Reads and privileged writes against the TrustRegistry contract sit behind
//! [`RegistryReader`] and [`RegistryWriter`]. Every method is one remote call
//! with its error passed through unchanged: no retry, no caching.

pub mod contract;

use alloy::primitives::B256;
use async_trait::async_trait;
use futures::future::BoxFuture;
use trustscore_core::{BatchScoreUpdate, TrustRecord, TrustResult, TrustUpdate, WalletAddress};

pub use contract::{connect_reader, connect_writer};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),

    #[error("RPC transport error: {0}")]
    Transport(#[from] alloy::transports::TransportError),

    #[error("Transaction confirmation failed: {0}")]
    Confirmation(#[from] alloy::providers::PendingTransactionError),

    #[error("Transaction {0} reverted")]
    Reverted(B256),

    #[error("Signer {signer} is not the registry owner ({owner})")]
    Unauthorized {
        signer: WalletAddress,
        owner: WalletAddress,
    },

    #[error("Invalid signer key: {0}")]
    InvalidSigner(String),

    #[error("Registry unavailable: {0}")]
    Unavailable(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[async_trait]
pub trait RegistryReader: Send + Sync {
    /// `getTrustScore`
    async fn trust_score(&self, wallet: WalletAddress) -> RegistryResult<u64>;

    /// `getTrustData`, or `None` when the wallet was never registered.
    async fn trust_record(&self, wallet: WalletAddress) -> RegistryResult<Option<TrustRecord>>;

    /// `isRegistered`
    async fn is_registered(&self, wallet: WalletAddress) -> RegistryResult<bool>;

    /// `getTotalRegistered`
    async fn total_registered(&self) -> RegistryResult<u64>;

    /// `owner`
    async fn owner(&self) -> RegistryResult<WalletAddress>;

    /// Latest block number, used to check RPC connectivity.
    async fn health_check(&self) -> RegistryResult<u64>;
}

/// A state-changing registry call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    UpdateTrustScore {
        wallet: WalletAddress,
        update: TrustUpdate,
    },
    SetVerification {
        wallet: WalletAddress,
        verified: bool,
    },
    BatchUpdateScores(BatchScoreUpdate),
}

impl WriteCall {
    pub fn validate(&self) -> TrustResult<()> {
        match self {
            WriteCall::UpdateTrustScore { update, .. } => update.validate(),
            WriteCall::SetVerification { .. } => Ok(()),
            WriteCall::BatchUpdateScores(batch) => batch.validate(),
        }
    }

    /// Contract function name, for logs and the write tracker.
    pub fn function_name(&self) -> &'static str {
        match self {
            WriteCall::UpdateTrustScore { .. } => "updateTrustScore",
            WriteCall::SetVerification { .. } => "setVerificationStatus",
            WriteCall::BatchUpdateScores(_) => "batchUpdateScores",
        }
    }
}

/// A write accepted by the node.
///
/// `tx_hash` is the pending phase. `confirmation` resolves to the inclusion
/// block once the library reports the receipt.
pub struct SubmittedWrite {
    pub tx_hash: B256,
    pub confirmation: BoxFuture<'static, RegistryResult<Option<u64>>>,
}

#[async_trait]
pub trait RegistryWriter: Send + Sync {
    /// Account that signs registry writes.
    fn signer(&self) -> WalletAddress;

    async fn submit(&self, call: WriteCall) -> RegistryResult<SubmittedWrite>;
}

/// Submit `call` after checking that the writer's signer owns the registry.
///
/// A non-owner signer is rejected without sending anything.
pub async fn submit_as_owner(
    reader: &dyn RegistryReader,
    writer: &dyn RegistryWriter,
    call: WriteCall,
) -> RegistryResult<SubmittedWrite> {
    let owner = reader.owner().await?;
    let signer = writer.signer();
    if owner != signer {
        tracing::warn!(
            signer = %signer,
            owner = %owner,
            function = call.function_name(),
            "Rejecting registry write from non-owner signer"
        );
        return Err(RegistryError::Unauthorized { signer, owner });
    }

    tracing::debug!(function = call.function_name(), signer = %signer, "Submitting registry write");
    writer.submit(call).await
}


#[cfg(test)]
mod tests {
    use trustscore_core::TrustError;

    use super::testing::{MemoryRegistry, MemoryWriter};
    use super::*;

    fn addr(byte: u8) -> WalletAddress {
        alloy::primitives::Address::repeat_byte(byte).into()
    }

    #[tokio::test]
    async fn test_owner_can_submit() {
        let reader = MemoryRegistry::default().with_owner(addr(0xaa));
        let writer = MemoryWriter::new(addr(0xaa));

        let call = WriteCall::SetVerification { wallet: addr(0x01), verified: true };
        let submitted = submit_as_owner(&reader, &writer, call.clone()).await.unwrap();

        assert_eq!(submitted.tx_hash, B256::with_last_byte(1));
        assert_eq!(writer.submitted(), vec![call]);
        assert_eq!(submitted.confirmation.await.unwrap(), Some(100));
    }

    #[tokio::test]
    async fn test_non_owner_is_rejected_before_submission() {
        let reader = MemoryRegistry::default().with_owner(addr(0xaa));
        let writer = MemoryWriter::new(addr(0xbb));

        let call = WriteCall::UpdateTrustScore {
            wallet: addr(0x01),
            update: TrustUpdate { score: 80, total_tx: 10, wallet_age_days: 30 },
        };
        let result = submit_as_owner(&reader, &writer, call).await;

        assert!(matches!(
            result,
            Err(RegistryError::Unauthorized { signer, owner }) if signer == addr(0xbb) && owner == addr(0xaa)
        ));
        assert!(writer.submitted().is_empty());
    }

    #[test]
    fn test_write_call_validation() {
        let call = WriteCall::UpdateTrustScore {
            wallet: addr(0x01),
            update: TrustUpdate { score: 120, total_tx: 0, wallet_age_days: 0 },
        };
        assert_eq!(call.validate(), Err(TrustError::ScoreOutOfRange(120)));
        assert_eq!(call.function_name(), "updateTrustScore");

        let batch = WriteCall::BatchUpdateScores(BatchScoreUpdate {
            wallets: vec![addr(0x01), addr(0x02)],
            scores: vec![10],
        });
        assert!(matches!(batch.validate(), Err(TrustError::BatchLengthMismatch { .. })));
    }
}

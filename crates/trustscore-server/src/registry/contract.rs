//! Alloy bindings for the TrustRegistry contract.

use std::sync::Arc;

use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::U256;
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use alloy::sol;
use alloy::transports::http::{Client, Http};
use async_trait::async_trait;
use futures::FutureExt;
use trustscore_core::{saturating_u64, TrustRecord, WalletAddress};

use super::{
    RegistryError, RegistryReader, RegistryResult, RegistryWriter, SubmittedWrite, WriteCall,
};

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract TrustRegistry {
        struct TrustData {
            uint256 score;
            uint256 lastUpdated;
            uint256 totalTx;
            uint256 walletAge;
            bool isVerified;
        }

        function getTrustData(address _wallet) external view returns (TrustData memory);
        function getTrustScore(address _wallet) external view returns (uint256 score);
        function getTotalRegistered() external view returns (uint256);
        function isRegistered(address wallet) external view returns (bool);
        function owner() external view returns (address);

        function updateTrustScore(address _wallet, uint256 _score, uint256 _totalTx, uint256 _walletAge) external;
        function setVerificationStatus(address _wallet, bool _status) external;
        function batchUpdateScores(address[] _wallets, uint256[] _scores) external;

        event TrustScoreUpdated(address indexed wallet, uint256 score, uint256 timestamp);
        event WalletVerified(address indexed wallet, bool status);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }
}

fn parse_rpc_url(rpc_url: &str) -> RegistryResult<alloy::transports::http::reqwest::Url> {
    rpc_url
        .parse()
        .map_err(|e| RegistryError::Unavailable(format!("Invalid RPC URL {}: {}", rpc_url, e)))
}

// ============================================================================
// Reader
// ============================================================================

/// Read-only registry client over an HTTP provider.
#[derive(Clone)]
pub struct AlloyRegistry {
    provider: RootProvider<Http<Client>>,
    contract: TrustRegistry::TrustRegistryInstance<Http<Client>, RootProvider<Http<Client>>>,
}

impl AlloyRegistry {
    pub fn new(rpc_url: &str, address: WalletAddress) -> RegistryResult<Self> {
        let provider = ProviderBuilder::new().on_http(parse_rpc_url(rpc_url)?);
        let contract = TrustRegistry::new(address.as_address(), provider.clone());

        Ok(Self { provider, contract })
    }
}

pub fn connect_reader(rpc_url: &str, address: WalletAddress) -> RegistryResult<Arc<dyn RegistryReader>> {
    Ok(Arc::new(AlloyRegistry::new(rpc_url, address)?))
}

#[async_trait]
impl RegistryReader for AlloyRegistry {
    async fn trust_score(&self, wallet: WalletAddress) -> RegistryResult<u64> {
        let result = self.contract.getTrustScore(wallet.as_address()).call().await?;
        Ok(saturating_u64(result.score))
    }

    async fn trust_record(&self, wallet: WalletAddress) -> RegistryResult<Option<TrustRecord>> {
        let data = self.contract.getTrustData(wallet.as_address()).call().await?._0;

        let record = TrustRecord::from_onchain(
            data.score,
            data.lastUpdated,
            data.totalTx,
            data.walletAge,
            data.isVerified,
        );

        Ok(record.is_registered().then_some(record))
    }

    async fn is_registered(&self, wallet: WalletAddress) -> RegistryResult<bool> {
        Ok(self.contract.isRegistered(wallet.as_address()).call().await?._0)
    }

    async fn total_registered(&self) -> RegistryResult<u64> {
        let total = self.contract.getTotalRegistered().call().await?._0;
        Ok(saturating_u64(total))
    }

    async fn owner(&self) -> RegistryResult<WalletAddress> {
        Ok(self.contract.owner().call().await?._0.into())
    }

    async fn health_check(&self) -> RegistryResult<u64> {
        Ok(self.provider.get_block_number().await?)
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Signing registry client. Generic over the filled provider so the alloy
/// filler stack never has to be spelled out.
pub struct AlloyRegistryWriter<P> {
    contract: TrustRegistry::TrustRegistryInstance<Http<Client>, P>,
    signer: WalletAddress,
    confirmations: u64,
}

/// Build a writer that signs with `private_key` (hex, `0x` optional).
pub fn connect_writer(
    rpc_url: &str,
    address: WalletAddress,
    private_key: &str,
    confirmations: u64,
) -> RegistryResult<Arc<dyn RegistryWriter>> {
    let signer: PrivateKeySigner = private_key
        .trim_start_matches("0x")
        .parse()
        .map_err(|e| RegistryError::InvalidSigner(format!("{}", e)))?;
    let signer_address = signer.address();

    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(EthereumWallet::from(signer))
        .on_http(parse_rpc_url(rpc_url)?);

    let contract = TrustRegistry::new(address.as_address(), provider);

    tracing::info!(signer = %signer_address, "Registry writer configured");

    Ok(Arc::new(AlloyRegistryWriter {
        contract,
        signer: signer_address.into(),
        confirmations: confirmations.max(1),
    }))
}

#[async_trait]
impl<P> RegistryWriter for AlloyRegistryWriter<P>
where
    P: Provider<Http<Client>> + Clone + 'static,
{
    fn signer(&self) -> WalletAddress {
        self.signer
    }

    async fn submit(&self, call: WriteCall) -> RegistryResult<SubmittedWrite> {
        let pending = match call {
            WriteCall::UpdateTrustScore { wallet, update } => {
                self.contract
                    .updateTrustScore(
                        wallet.as_address(),
                        U256::from(update.score),
                        U256::from(update.total_tx),
                        U256::from(update.wallet_age_days),
                    )
                    .send()
                    .await?
            }
            WriteCall::SetVerification { wallet, verified } => {
                self.contract
                    .setVerificationStatus(wallet.as_address(), verified)
                    .send()
                    .await?
            }
            WriteCall::BatchUpdateScores(batch) => {
                let wallets = batch.wallets.iter().map(|w| w.as_address()).collect();
                let scores = batch.scores.iter().map(|s| U256::from(*s)).collect();
                self.contract.batchUpdateScores(wallets, scores).send().await?
            }
        };

        let tx_hash = *pending.tx_hash();
        let confirmations = self.confirmations;

        let confirmation = async move {
            let receipt = pending
                .with_required_confirmations(confirmations)
                .get_receipt()
                .await?;
            if !receipt.status() {
                return Err(RegistryError::Reverted(tx_hash));
            }
            Ok(receipt.block_number())
        }
        .boxed();

        Ok(SubmittedWrite { tx_hash, confirmation })
    }
}

use std::{sync::Arc, time::Duration};

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, Bytes, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
};
use eyre::Result;
use tracing::{debug, info, instrument};

use crate::{config::Config, error::CheckError};

/// JSON-RPC client for the node under test
///
/// This client pairs a typed alloy provider with one local signer. Every
/// transaction it sends is signed by that signer, and every estimate or call
/// is issued from its address.
#[derive(Clone)]
pub struct NodeClient {
    /// Typed provider with the wallet filler attached
    pub provider: Arc<dyn Provider<Ethereum>>,
    /// Key that signs outgoing transactions
    signer: PrivateKeySigner,
    /// Endpoint kept around so sibling clients can be created
    rpc_url: String,
    /// Upper bound on how long a receipt may take
    receipt_timeout: Duration,
}

impl NodeClient {
    /// Create a new client with an HTTP provider
    ///
    /// This constructor connects to the node and verifies the connection is
    /// working by fetching the latest block number.
    ///
    /// # Arguments
    ///
    /// * `rpc_url` - URL of the node's JSON-RPC endpoint
    /// * `signer` - Key used to sign transactions
    /// * `receipt_timeout` - How long to wait for each receipt
    pub async fn connect(
        rpc_url: &str,
        signer: PrivateKeySigner,
        receipt_timeout: Duration,
    ) -> Result<Self> {
        let wallet = EthereumWallet::from(signer.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .on_http(rpc_url.parse()?);

        // Test the connection by fetching the latest block number
        let block_number = provider
            .get_block_number()
            .await
            .map_err(|e| CheckError::Rpc(format!("cannot reach {rpc_url}: {e}")))?;
        info!(%rpc_url, signer = %signer.address(), block_number, "Connected to node");

        Ok(Self {
            provider: Arc::new(provider),
            signer,
            rpc_url: rpc_url.to_string(),
            receipt_timeout,
        })
    }

    /// Connect using the endpoint, key and timeout from a [`Config`]
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::connect(&config.rpc_url, config.signer()?, config.receipt_timeout()).await
    }

    /// Create a client for another key on the same endpoint
    pub async fn with_signer(&self, signer: PrivateKeySigner) -> Result<Self> {
        Self::connect(&self.rpc_url, signer, self.receipt_timeout).await
    }

    /// Address of the signing account
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Balance of any account at the latest block
    pub async fn balance(&self, address: Address) -> Result<U256> {
        Ok(self.provider.get_balance(address).await?)
    }

    /// Balance of the signing account at the latest block
    pub async fn signer_balance(&self) -> Result<U256> {
        self.balance(self.address()).await
    }

    /// Ask the node how much gas a transaction from the signer needs
    #[instrument(skip(self, tx), err)]
    pub async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64> {
        let tx = self.from_signer(tx.clone());
        let gas = self.provider.estimate_gas(tx).await?;
        debug!(gas, "Node returned gas estimate");
        Ok(gas)
    }

    /// Submit a transaction and wait for its receipt
    ///
    /// The receipt is returned whatever its status, so callers can inspect
    /// failed executions too.
    #[instrument(skip(self, tx), err)]
    pub async fn send(&self, tx: TransactionRequest) -> Result<TransactionReceipt> {
        let tx = self.from_signer(tx);
        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, "Transaction submitted");

        let receipt = pending
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await?;
        debug!(
            %tx_hash,
            status = receipt.status(),
            gas_used = receipt.gas_used,
            effective_gas_price = %receipt.effective_gas_price,
            "Receipt received"
        );
        Ok(receipt)
    }

    /// Submit a transaction and require a successful receipt
    pub async fn send_expecting_success(&self, tx: TransactionRequest) -> Result<TransactionReceipt> {
        let receipt = self.send(tx).await?;
        if !receipt.status() {
            return Err(CheckError::UnexpectedStatus {
                tx_hash: receipt.transaction_hash.to_string(),
                expected: true,
                actual: false,
            }
            .into());
        }
        Ok(receipt)
    }

    /// Execute a read-only call from the signer against the latest block
    pub async fn call(&self, tx: &TransactionRequest) -> Result<Bytes> {
        let tx = self.from_signer(tx.clone());
        Ok(self.provider.call(tx).await?)
    }

    /// Runtime code stored at an address
    pub async fn code_at(&self, address: Address) -> Result<Bytes> {
        Ok(self.provider.get_code_at(address).await?)
    }

    /// Value of one storage slot of an account
    pub async fn storage_at(&self, address: Address, slot: U256) -> Result<U256> {
        Ok(self.provider.get_storage_at(address, slot).await?)
    }

    fn from_signer(&self, mut tx: TransactionRequest) -> TransactionRequest {
        if tx.from.is_none() {
            tx.from = Some(self.address());
        }
        tx
    }
}

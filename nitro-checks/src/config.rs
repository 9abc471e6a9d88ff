use crate::error::CheckError;
use alloy::signers::local::PrivateKeySigner;
use serde::Deserialize;
use std::time::Duration;

/// Private key of the first account on anvil, hardhat and the nitro dev node
pub const DEV_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Check configuration structure
///
/// This structure contains all the parameters the conformance checks need.
/// Values come from `NITRO_*` environment variables (optionally loaded from a
/// `.env` file) layered over built-in defaults.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// JSON-RPC endpoint of the node under test (default: http://localhost:8545)
    pub rpc_url: String,

    /// Hex private key of the funded account that pays for every check
    pub private_key: String,

    /// How long to wait for a receipt before giving up
    pub receipt_timeout_secs: u64,

    /// Number of throwaway accounts used by the stress scenario
    pub stress_accounts: usize,

    /// Number of fan-out rounds in the stress scenario
    pub stress_rounds: usize,

    /// Wei sent to each stress account before the rounds start
    pub stress_funding_wei: u64,

    /// Allowed overshoot of `eth_estimateGas` over `gasUsed`, in basis points
    ///
    /// Zero demands an exact estimate. Nodes whose estimator stops its binary
    /// search early (geth, anvil) need a small allowance.
    pub gas_estimate_tolerance_bps: u64,

    /// Gas limit of the deployment that is expected to fail
    pub failed_deploy_gas_limit: u64,

    /// Slot count passed to `StorageSpam.spam`
    pub storage_spam_slots: u64,

    /// Whether the runner also executes the stress scenario
    pub include_stress: bool,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// * `NITRO_RPC_URL` - node endpoint (default: "http://localhost:8545")
    /// * `NITRO_PRIVATE_KEY` - paying account (default: first dev key)
    /// * `NITRO_RECEIPT_TIMEOUT_SECS` - receipt wait bound (default: 60)
    /// * `NITRO_STRESS_ACCOUNTS` / `NITRO_STRESS_ROUNDS` (default: 10 / 100)
    /// * `NITRO_STRESS_FUNDING_WEI` (default: 0.01 ether)
    /// * `NITRO_GAS_ESTIMATE_TOLERANCE_BPS` (default: 0, exact)
    /// * `NITRO_FAILED_DEPLOY_GAS_LIMIT` (default: 268435456, i.e. 0x10000000)
    /// * `NITRO_STORAGE_SPAM_SLOTS` (default: 888)
    /// * `NITRO_INCLUDE_STRESS` (default: false)
    ///
    /// Numeric values are parsed as decimal integers; hex such as
    /// `0x10000000` is rejected with [`CheckError::Config`].
    pub fn from_env() -> Result<Self, CheckError> {
        // Load .env file if it exists (useful for development)
        let _ = dotenv::dotenv();

        let settings = config::Config::builder()
            .set_default("rpc_url", "http://localhost:8545")?
            .set_default("private_key", DEV_PRIVATE_KEY)?
            .set_default("receipt_timeout_secs", 60_i64)?
            .set_default("stress_accounts", 10_i64)?
            .set_default("stress_rounds", 100_i64)?
            .set_default("stress_funding_wei", 10_000_000_000_000_000_i64)?
            .set_default("gas_estimate_tolerance_bps", 0_i64)?
            .set_default("failed_deploy_gas_limit", 0x1000_0000_i64)?
            .set_default("storage_spam_slots", 888_i64)?
            .set_default("include_stress", false)?
            .add_source(config::Environment::with_prefix("NITRO").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parse the configured private key into a local signer
    pub fn signer(&self) -> Result<PrivateKeySigner, CheckError> {
        self.private_key
            .parse::<PrivateKeySigner>()
            .map_err(|e| CheckError::Signer(format!("invalid NITRO_PRIVATE_KEY: {e}")))
    }

    /// Receipt wait bound as a [`Duration`]
    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }
}

//! Transaction-processing scenarios run against the node under test
//!
//! Each scenario is an async function returning `Ok(())` when every identity
//! it checks holds. [`Scenario`] names them for the runner and the tests.

pub mod contracts;
pub mod gas_accounting;
pub mod stress;

use std::fmt;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use eyre::Result;
use tracing::{error, info};

use crate::{config::Config, error::CheckError, rpc::NodeClient};

/// Value sent by the non-zero transfer scenario
pub const NONZERO_TRANSFER_VALUE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    DeployWithExactEstimate,
    TransferZeroValue,
    TransferNonzeroValue,
    SelfDestructToFreshAccount,
    CreateTwo,
    FailedDeployRefundsValue,
    StorageSpam,
    EcRecover,
    SendManyTransactions,
}

impl Scenario {
    /// Every scenario in run order
    pub const ALL: [Scenario; 9] = [
        Scenario::SendManyTransactions,
        Scenario::DeployWithExactEstimate,
        Scenario::TransferZeroValue,
        Scenario::TransferNonzeroValue,
        Scenario::SelfDestructToFreshAccount,
        Scenario::CreateTwo,
        Scenario::FailedDeployRefundsValue,
        Scenario::StorageSpam,
        Scenario::EcRecover,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::DeployWithExactEstimate => "deploy NitroTest with correct gas estimate and usage",
            Scenario::TransferZeroValue => "transfer 0 value with correct gas estimate and accounting",
            Scenario::TransferNonzeroValue => "transfer >0 value with correct gas estimate and accounting",
            Scenario::SelfDestructToFreshAccount => "self-destruct to fresh account",
            Scenario::CreateTwo => "create2",
            Scenario::FailedDeployRefundsValue => "failed deploy refunds value",
            Scenario::StorageSpam => "storage spam",
            Scenario::EcRecover => "ecrecover",
            Scenario::SendManyTransactions => "send a lot of transactions",
        }
    }

    /// Long-running load scenario, skipped unless asked for
    pub fn is_stress(&self) -> bool {
        matches!(self, Scenario::SendManyTransactions)
    }

    /// Scenarios the runner executes for this configuration
    pub fn enabled(config: &Config) -> Vec<Scenario> {
        Self::ALL
            .into_iter()
            .filter(|scenario| config.include_stress || !scenario.is_stress())
            .collect()
    }

    pub async fn run(self, client: &NodeClient, config: &Config) -> Result<()> {
        match self {
            Scenario::DeployWithExactEstimate => gas_accounting::deploy_with_exact_estimate(client, config).await,
            Scenario::TransferZeroValue => gas_accounting::transfer_with_exact_estimate(client, config, 0).await,
            Scenario::TransferNonzeroValue => {
                gas_accounting::transfer_with_exact_estimate(client, config, NONZERO_TRANSFER_VALUE).await
            }
            Scenario::SelfDestructToFreshAccount => contracts::self_destruct_to_fresh_account(client).await,
            Scenario::CreateTwo => contracts::create_two(client).await,
            Scenario::FailedDeployRefundsValue => {
                gas_accounting::failed_deploy_refunds_value(client, config).await
            }
            Scenario::StorageSpam => contracts::storage_spam(client, config).await,
            Scenario::EcRecover => contracts::ecrecover(client).await,
            Scenario::SendManyTransactions => stress::send_many_transactions(client, config).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one scenario in a runner pass
#[derive(Debug)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    /// `None` when the scenario passed
    pub failure: Option<String>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Run every enabled scenario in order, continuing past failures
pub async fn run_all(client: &NodeClient, config: &Config) -> Vec<ScenarioReport> {
    let mut reports = Vec::new();
    for scenario in Scenario::enabled(config) {
        let failure = match scenario.run(client, config).await {
            Ok(()) => {
                info!(%scenario, "PASS");
                None
            }
            Err(e) => {
                error!(%scenario, "FAIL: {e:#}");
                Some(format!("{e:#}"))
            }
        };
        reports.push(ScenarioReport { scenario, failure });
    }
    reports
}

/// Call to `to` with ABI-encoded `input`
pub(crate) fn call_request(to: Address, input: Vec<u8>) -> TransactionRequest {
    TransactionRequest::default()
        .with_to(to)
        .with_input(Bytes::from(input))
}

pub(crate) fn deployed_address(receipt: &TransactionReceipt) -> Result<Address, CheckError> {
    receipt
        .contract_address
        .ok_or_else(|| CheckError::MissingContractAddress(receipt.transaction_hash.to_string()))
}

/// Deploy `init_code` with `gasLimit` set to the node's estimate
pub(crate) async fn deploy_with_estimate(client: &NodeClient, init_code: Bytes) -> Result<Address> {
    let deploy = TransactionRequest::default().with_deploy_code(init_code);
    let estimate = client.estimate_gas(&deploy).await?;
    let receipt = client
        .send_expecting_success(deploy.with_gas_limit(estimate))
        .await?;
    Ok(deployed_address(&receipt)?)
}

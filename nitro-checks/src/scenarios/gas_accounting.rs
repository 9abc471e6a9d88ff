//! Checks that the sender pays exactly `gasUsed * effectiveGasPrice` and that
//! `eth_estimateGas` predicts `gasUsed`

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, U256},
    rpc::types::TransactionRequest,
    sol_types::SolCall,
};
use eyre::Result;
use tracing::{info, instrument};

use crate::{
    accounting::{expect_balance_delta, expect_eq, expect_gas_matches_estimate, GasCharge},
    config::Config,
    error::CheckError,
    fixtures::{self, NitroTest},
    rpc::NodeClient,
};

use super::{call_request, deployed_address};

/// Deploy `NitroTest` and call `foo()`, each with `gasLimit` set to the
/// node's own estimate
#[instrument(skip_all, err)]
pub async fn deploy_with_exact_estimate(client: &NodeClient, config: &Config) -> Result<()> {
    let deploy = TransactionRequest::default().with_deploy_code(fixtures::nitro_test()?);

    let balance_before = client.signer_balance().await?;
    let estimate = client.estimate_gas(&deploy).await?;
    let receipt = client
        .send_expecting_success(deploy.with_gas_limit(estimate))
        .await?;
    let charge = GasCharge::from_receipt(&receipt);
    expect_balance_delta(balance_before, client.signer_balance().await?, U256::ZERO, charge)?;
    expect_gas_matches_estimate(estimate, charge, config.gas_estimate_tolerance_bps)?;
    let contract = deployed_address(&receipt)?;
    info!(%contract, gas_used = charge.gas_used, "NitroTest deployed");

    let foo = call_request(contract, NitroTest::fooCall {}.abi_encode());
    let balance_before = client.signer_balance().await?;
    let estimate = client.estimate_gas(&foo).await?;
    let receipt = client
        .send_expecting_success(foo.with_gas_limit(estimate))
        .await?;
    let charge = GasCharge::from_receipt(&receipt);
    expect_balance_delta(balance_before, client.signer_balance().await?, U256::ZERO, charge)?;
    expect_gas_matches_estimate(estimate, charge, config.gas_estimate_tolerance_bps)?;

    let output = client
        .call(&call_request(contract, NitroTest::counterCall {}.abi_encode()))
        .await?;
    let counter = NitroTest::counterCall::abi_decode_returns(&output, true)?.value;
    expect_eq("NitroTest.counter() after one foo()", U256::from(1), counter)?;
    Ok(())
}

/// Send `value` wei to the zero address with `gasLimit` set to the estimate
#[instrument(skip(client, config), err)]
pub async fn transfer_with_exact_estimate(
    client: &NodeClient,
    config: &Config,
    value: u64,
) -> Result<()> {
    let value = U256::from(value);
    let transfer = TransactionRequest::default()
        .with_to(Address::ZERO)
        .with_value(value);

    let balance_before = client.signer_balance().await?;
    let estimate = client.estimate_gas(&transfer).await?;
    let receipt = client
        .send_expecting_success(transfer.with_gas_limit(estimate))
        .await?;
    let charge = GasCharge::from_receipt(&receipt);
    expect_balance_delta(balance_before, client.signer_balance().await?, value, charge)?;
    expect_gas_matches_estimate(estimate, charge, config.gas_estimate_tolerance_bps)?;
    Ok(())
}

/// Deploy init code that halts immediately, attaching 1 wei
///
/// The receipt must report failure, the sender must pay exactly the fee (the
/// value comes back), and nothing may be left at the would-be address.
#[instrument(skip_all, err)]
pub async fn failed_deploy_refunds_value(client: &NodeClient, config: &Config) -> Result<()> {
    let value = U256::from(1);
    let deploy = TransactionRequest::default()
        .with_deploy_code(fixtures::malformed_init_code())
        .with_gas_limit(config.failed_deploy_gas_limit)
        .with_value(value);

    let balance_before = client.signer_balance().await?;
    let receipt = client.send(deploy).await?;
    if receipt.status() {
        return Err(CheckError::UnexpectedStatus {
            tx_hash: receipt.transaction_hash.to_string(),
            expected: false,
            actual: true,
        }
        .into());
    }

    let charge = GasCharge::from_receipt(&receipt);
    expect_balance_delta(balance_before, client.signer_balance().await?, U256::ZERO, charge)?;
    if let Some(address) = receipt.contract_address {
        expect_eq("code length at failed deployment", 0, client.code_at(address).await?.len())?;
    }
    info!(gas_used = charge.gas_used, "Failed deployment charged gas only");
    Ok(())
}

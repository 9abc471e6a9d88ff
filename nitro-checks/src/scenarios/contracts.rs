//! Checks for self-destruct, CREATE2, heavy storage writes and ecrecover

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, U256},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};
use eyre::Result;
use tracing::{debug, info, instrument};

use crate::{
    accounting::expect_eq,
    config::Config,
    fixtures::{self, CreateTwo, ECRecover, StorageSpam},
    rpc::NodeClient,
    signature::{sign_probe, PROBE_MESSAGE},
};

use super::{call_request, deploy_with_estimate, deployed_address};

/// Value the self-destructing constructor forwards
pub const SELF_DESTRUCT_VALUE: u64 = 1337;

/// Salt passed to `CreateTwo.create2`
pub const CREATE2_SALT: &str = "salt";

/// Deploy `SuicideTo(target)` with value to a never-used address; the value
/// must end up at the target and nothing at the contract
#[instrument(skip_all, err)]
pub async fn self_destruct_to_fresh_account(client: &NodeClient) -> Result<()> {
    let target = PrivateKeySigner::random().address();
    expect_eq("balance of fresh target", U256::ZERO, client.balance(target).await?)?;

    let value = U256::from(SELF_DESTRUCT_VALUE);
    let receipt = client
        .send_expecting_success(
            TransactionRequest::default()
                .with_deploy_code(fixtures::suicide_to(target)?)
                .with_value(value),
        )
        .await?;
    let contract = deployed_address(&receipt)?;

    expect_eq("balance of self-destructed contract", U256::ZERO, client.balance(contract).await?)?;
    expect_eq("balance of self-destruct target", value, client.balance(target).await?)?;
    info!(%contract, %target, "Self-destruct forwarded its value");
    Ok(())
}

/// Deploy `CreateTwo` and have it CREATE2 a child at a precomputed address
#[instrument(skip_all, err)]
pub async fn create_two(client: &NodeClient) -> Result<()> {
    let factory = deploy_with_estimate(client, fixtures::create_two()?).await?;

    let salt = fixtures::format_bytes32_string(CREATE2_SALT)?;
    let create = call_request(factory, CreateTwo::create2Call { salt }.abi_encode());
    let estimate = client.estimate_gas(&create).await?;
    client
        .send_expecting_success(create.with_gas_limit(estimate))
        .await?;

    let child = factory.create2_from_code(salt, fixtures::CREATE_TWO_CHILD_INIT_CODE);
    expect_eq(
        "code at CREATE2 address",
        Bytes::from_static(&fixtures::CREATE_TWO_CHILD_RUNTIME),
        client.code_at(child).await?,
    )?;
    info!(%factory, %child, "CREATE2 child deployed");
    Ok(())
}

/// Write many fresh storage slots in one transaction
#[instrument(skip_all, err)]
pub async fn storage_spam(client: &NodeClient, config: &Config) -> Result<()> {
    let contract = deploy_with_estimate(client, fixtures::storage_spam()?).await?;

    let count = U256::from(config.storage_spam_slots);
    let spam = call_request(contract, StorageSpam::spamCall { count }.abi_encode());
    let estimate = client.estimate_gas(&spam).await?;
    debug!(estimate, slots = config.storage_spam_slots, "Estimated storage spam");
    let receipt = client.send_expecting_success(spam).await?;

    if let Some(last) = config.storage_spam_slots.checked_sub(1) {
        expect_eq(
            "last written storage slot",
            count,
            client.storage_at(contract, U256::from(last)).await?,
        )?;
    }
    info!(gas_used = receipt.gas_used, "Storage spam confirmed");
    Ok(())
}

/// Sign a message with a random key and recover the signer both locally and
/// through the ecrecover precompile
#[instrument(skip_all, err)]
pub async fn ecrecover(client: &NodeClient) -> Result<()> {
    let signer = PrivateKeySigner::random();
    let probe = sign_probe(&signer, &PROBE_MESSAGE)?;
    expect_eq("locally recovered signer", signer.address(), probe.recovered)?;

    let contract = deploy_with_estimate(client, fixtures::ec_recover()?).await?;
    let recover = call_request(
        contract,
        ECRecover::recoverCall {
            hash: probe.hash,
            v: probe.v,
            r: probe.r,
            s: probe.s,
        }
        .abi_encode(),
    );
    let output = client.call(&recover).await?;
    let recovered: Address = ECRecover::recoverCall::abi_decode_returns(&output, true)?.signer;
    expect_eq("ECRecover.recover", signer.address(), recovered)?;
    Ok(())
}

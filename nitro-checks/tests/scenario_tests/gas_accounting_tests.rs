//! Balance-delta and gas-estimate identities

use crate::helpers::spawn_node;
use crate::init_logger;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, U256},
    rpc::types::TransactionRequest,
};
use nitro_checks::{
    accounting::{expect_balance_delta, GasCharge, TRANSFER_GAS},
    scenarios::{gas_accounting, NONZERO_TRANSFER_VALUE},
};

#[tokio::test]
async fn test_deploy_gas_matches_estimate_and_fee() {
    init_logger();
    let node = spawn_node();
    let (client, config) = node.connect().await;

    gas_accounting::deploy_with_exact_estimate(&client, &config)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_zero_value_transfer_accounting() {
    init_logger();
    let node = spawn_node();
    let (client, config) = node.connect().await;

    gas_accounting::transfer_with_exact_estimate(&client, &config, 0)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_nonzero_value_transfer_accounting() {
    init_logger();
    let node = spawn_node();
    let (client, config) = node.connect().await;

    gas_accounting::transfer_with_exact_estimate(&client, &config, NONZERO_TRANSFER_VALUE)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_plain_transfer_estimate_is_intrinsic_gas() {
    init_logger();
    let node = spawn_node();
    let (client, _config) = node.connect().await;

    let transfer = TransactionRequest::default()
        .with_to(Address::ZERO)
        .with_value(U256::from(NONZERO_TRANSFER_VALUE));
    let estimate = client.estimate_gas(&transfer).await.unwrap();
    assert_eq!(estimate, TRANSFER_GAS);

    let before = client.signer_balance().await.unwrap();
    let receipt = client.send(transfer.with_gas_limit(estimate)).await.unwrap();
    assert!(receipt.status());
    let charge = GasCharge::from_receipt(&receipt);
    assert_eq!(charge.gas_used, TRANSFER_GAS);

    // Claiming the value was not sent must break the identity
    let after = client.signer_balance().await.unwrap();
    assert!(expect_balance_delta(before, after, U256::ZERO, charge).is_err());
    expect_balance_delta(before, after, U256::from(NONZERO_TRANSFER_VALUE), charge).unwrap();
}

#[tokio::test]
async fn test_failed_deploy_charges_fee_and_refunds_value() {
    init_logger();
    let node = spawn_node();
    let (client, config) = node.connect().await;

    gas_accounting::failed_deploy_refunds_value(&client, &config)
        .await
        .unwrap();
}

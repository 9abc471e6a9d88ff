//! Fixture-contract scenarios: self-destruct, CREATE2, storage, ecrecover

use crate::helpers::spawn_node;
use crate::init_logger;

use nitro_checks::scenarios::contracts;

#[tokio::test]
async fn test_self_destruct_forwards_value_to_fresh_account() {
    init_logger();
    let node = spawn_node();
    let (client, _config) = node.connect().await;

    contracts::self_destruct_to_fresh_account(&client).await.unwrap();
}

#[tokio::test]
async fn test_create2_child_lands_at_derived_address() {
    init_logger();
    let node = spawn_node();
    let (client, _config) = node.connect().await;

    contracts::create_two(&client).await.unwrap();
}

#[tokio::test]
async fn test_storage_spam_writes_every_slot() {
    init_logger();
    let node = spawn_node();
    let (client, config) = node.connect().await;

    contracts::storage_spam(&client, &config).await.unwrap();
}

#[tokio::test]
async fn test_ecrecover_returns_signer() {
    init_logger();
    let node = spawn_node();
    let (client, _config) = node.connect().await;

    contracts::ecrecover(&client).await.unwrap();
}

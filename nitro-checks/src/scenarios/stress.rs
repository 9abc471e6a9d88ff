use alloy::{
    network::TransactionBuilder, primitives::U256, rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use eyre::Result;
use futures::future::try_join_all;
use tracing::{debug, info, instrument};

use crate::{config::Config, rpc::NodeClient};

/// Fund throwaway accounts, then run rounds where every account sends itself
/// an empty transfer concurrently
///
/// Each round waits for all receipts before the next starts, so nonces stay
/// in order per account.
#[instrument(skip_all, fields(accounts = config.stress_accounts, rounds = config.stress_rounds), err)]
pub async fn send_many_transactions(client: &NodeClient, config: &Config) -> Result<()> {
    let mut accounts = Vec::with_capacity(config.stress_accounts);
    for _ in 0..config.stress_accounts {
        let signer = PrivateKeySigner::random();
        client
            .send_expecting_success(
                TransactionRequest::default()
                    .with_to(signer.address())
                    .with_value(U256::from(config.stress_funding_wei)),
            )
            .await?;
        accounts.push(client.with_signer(signer).await?);
    }
    info!("Stress accounts funded");

    for round in 0..config.stress_rounds {
        let sends = accounts.iter().map(|account| {
            account.send_expecting_success(TransactionRequest::default().with_to(account.address()))
        });
        try_join_all(sends).await?;
        debug!(round, "Stress round confirmed");
    }

    info!(
        transactions = config.stress_accounts * config.stress_rounds,
        "Stress run finished"
    );
    Ok(())
}

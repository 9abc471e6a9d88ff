use nitro_checks::{config::Config, rpc::NodeClient, scenarios};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Runner entry point
///
/// This is the main function that:
/// 1. Sets up logging
/// 2. Loads configuration
/// 3. Connects to the node under test
/// 4. Runs every enabled scenario in order
/// 5. Exits non-zero if any scenario failed
#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Debug-friendly level for our crate, quieter transports
    let filter = EnvFilter::from_default_env()
        .add_directive("nitro_checks=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    let client = NodeClient::from_config(&config).await?;

    let reports = scenarios::run_all(&client, &config).await;
    let failed: Vec<_> = reports.iter().filter(|report| !report.passed()).collect();

    info!(
        total = reports.len(),
        failed = failed.len(),
        "Finished running scenarios"
    );
    if failed.is_empty() {
        return Ok(());
    }

    for report in &failed {
        error!(
            scenario = %report.scenario,
            reason = report.failure.as_deref().unwrap_or_default(),
            "Scenario failed"
        );
    }
    std::process::exit(1);
}

//! The runner executes every enabled scenario and reports each one

use crate::helpers::spawn_node;
use crate::init_logger;

use nitro_checks::scenarios::{run_all, Scenario};

#[tokio::test]
async fn test_run_all_passes_every_default_scenario() {
    init_logger();
    let node = spawn_node();
    let (client, config) = node.connect().await;

    let reports = run_all(&client, &config).await;

    let ran: Vec<Scenario> = reports.iter().map(|report| report.scenario).collect();
    assert_eq!(ran, Scenario::enabled(&config));
    for report in &reports {
        assert!(report.passed(), "{} failed: {:?}", report.scenario, report.failure);
    }
}

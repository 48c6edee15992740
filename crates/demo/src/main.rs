//! Saga demo entry point.

use demo::config::Config;
use saga::TravelAgency;

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    demo::init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Book every order through the travel saga
    tracing::info!(
        orders = config.orders.len(),
        compensation = %config.orchestrator.compensation,
        "starting travel saga demo"
    );
    let agency = TravelAgency::new();
    let outcomes = demo::run_orders(&agency, &config).await;

    // 4. Report
    for outcome in &outcomes {
        match serde_json::to_string(outcome) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, order = %outcome.order, "failed to encode outcome"),
        }
    }

    if config.print_metrics {
        println!("{}", metrics_handle.render());
    }
}

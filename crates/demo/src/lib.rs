//! Travel-agency saga demo with structured logging and Prometheus metrics.
//!
//! Books each configured order through the travel saga and reports the
//! terminal result of every run.

pub mod config;

use common::SagaId;
use saga::{SagaOrchestrator, SagaResult, TravelAgency};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::{Config, LogFormat};

/// Summary of one order's saga run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderOutcome {
    pub order: String,
    pub saga_id: SagaId,
    pub result: SagaResult,
    pub failed_chapter: Option<String>,
    pub missing_chapter: Option<String>,
    pub failed_compensations: Vec<String>,
}

/// Installs the global tracing subscriber.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Builds the travel orchestrator over `agency` using the demo settings.
pub fn orchestrator(agency: &TravelAgency, config: &Config) -> SagaOrchestrator<String> {
    SagaOrchestrator::new(saga::travel::travel_saga(), agency.discovery())
        .with_config(config.orchestrator)
}

/// Books every configured order, one saga run each, in order.
pub async fn run_orders(agency: &TravelAgency, config: &Config) -> Vec<OrderOutcome> {
    let orchestrator = orchestrator(agency, config);
    let mut outcomes = Vec::with_capacity(config.orders.len());

    for order in &config.orders {
        let execution = orchestrator.run(order.clone()).await;
        tracing::info!(
            order = %order,
            saga_id = %execution.saga_id,
            result = %execution.result,
            "order processed"
        );

        outcomes.push(OrderOutcome {
            order: order.clone(),
            saga_id: execution.saga_id,
            result: execution.result,
            failed_chapter: execution.record.failed_chapter().map(str::to_string),
            missing_chapter: execution.record.missing_chapter().map(str::to_string),
            failed_compensations: execution.record.failed_compensations().to_vec(),
        });
    }

    outcomes
}

//! Demo configuration loaded from environment variables.

use std::str::FromStr;

use saga::travel::{BAD_ORDER, CRASHED_ORDER, GOOD_ORDER, travel_config};
use saga::{OrchestratorConfig, SagaError};

const ENV_COMPENSATION_POLICY: &str = "SAGA_COMPENSATION_POLICY";

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = SagaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(SagaError::invalid_config(
                "LOG_FORMAT",
                format!("unknown log format '{other}'"),
            )),
        }
    }
}

/// Demo configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
/// - `PRINT_METRICS`: print the Prometheus snapshot after the run (default: `false`)
/// - `DEMO_ORDERS`: comma-separated orders to book (default: `good_order,bad_order,crashed_order`)
/// - `SAGA_*`: orchestrator settings, see [`OrchestratorConfig::from_env`];
///   compensation escalates unless `SAGA_COMPENSATION_POLICY` names a valid policy
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub print_metrics: bool,
    pub orders: Vec<String>,
    pub orchestrator: OrchestratorConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut orchestrator = OrchestratorConfig::from_env();
        orchestrator.compensation = std::env::var(ENV_COMPENSATION_POLICY)
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.orchestrator.compensation);

        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: std::env::var("LOG_FORMAT")
                .ok()
                .and_then(|f| f.parse().ok())
                .unwrap_or(defaults.log_format),
            print_metrics: std::env::var("PRINT_METRICS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.print_metrics),
            orders: std::env::var("DEMO_ORDERS")
                .ok()
                .map(|v| parse_orders(&v))
                .filter(|orders| !orders.is_empty())
                .unwrap_or(defaults.orders),
            orchestrator,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            print_metrics: false,
            orders: vec![
                GOOD_ORDER.to_string(),
                BAD_ORDER.to_string(),
                CRASHED_ORDER.to_string(),
            ],
            orchestrator: travel_config(),
        }
    }
}

/// Splits a comma-separated order list, dropping blanks.
pub fn parse_orders(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|order| !order.is_empty())
        .map(str::to_string)
        .collect()
}

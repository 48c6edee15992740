//! Orchestrator configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SagaError;

/// How compensation failures affect the terminal result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompensationPolicy {
    /// Failed compensations are logged; the run still ends in `Rollback`.
    #[default]
    BestEffort,

    /// The sweep still visits every chapter, but any failed compensation
    /// ends the run in `Crashed`.
    Escalate,
}

impl CompensationPolicy {
    /// Returns the policy name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompensationPolicy::BestEffort => "best_effort",
            CompensationPolicy::Escalate => "escalate",
        }
    }
}

impl FromStr for CompensationPolicy {
    type Err = SagaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(CompensationPolicy::BestEffort),
            "escalate" => Ok(CompensationPolicy::Escalate),
            other => Err(SagaError::invalid_config(
                ENV_COMPENSATION_POLICY,
                format!("unknown compensation policy '{other}'"),
            )),
        }
    }
}

impl std::fmt::Display for CompensationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const ENV_COMPENSATION_POLICY: &str = "SAGA_COMPENSATION_POLICY";
const ENV_COMPENSATE_FAILED_CHAPTER: &str = "SAGA_COMPENSATE_FAILED_CHAPTER";
const ENV_CHAPTER_TIMEOUT_MS: &str = "SAGA_CHAPTER_TIMEOUT_MS";

/// Orchestrator settings with defaults matching plain best-effort sagas.
///
/// Reads from environment variables:
/// - `SAGA_COMPENSATION_POLICY`: `best_effort` or `escalate` (default: `best_effort`)
/// - `SAGA_COMPENSATE_FAILED_CHAPTER`: also roll back the failing chapter (default: `false`)
/// - `SAGA_CHAPTER_TIMEOUT_MS`: per-call deadline in milliseconds (default: none)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrchestratorConfig {
    pub compensation: CompensationPolicy,
    pub compensate_failed_chapter: bool,
    pub chapter_timeout: Option<Duration>,
}

impl OrchestratorConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            compensation: std::env::var(ENV_COMPENSATION_POLICY)
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
            compensate_failed_chapter: std::env::var(ENV_COMPENSATE_FAILED_CHAPTER)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(false),
            chapter_timeout: std::env::var(ENV_CHAPTER_TIMEOUT_MS)
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis),
        }
    }

    /// Sets the compensation policy.
    pub fn with_compensation(mut self, policy: CompensationPolicy) -> Self {
        self.compensation = policy;
        self
    }

    /// Sets whether the failing chapter is compensated too.
    pub fn with_compensate_failed_chapter(mut self, enabled: bool) -> Self {
        self.compensate_failed_chapter = enabled;
        self
    }

    /// Sets the per-call deadline.
    pub fn with_chapter_timeout(mut self, timeout: Duration) -> Self {
        self.chapter_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn set_env(policy: &str, compensate_failed: &str, timeout_ms: &str) {
        unsafe {
            std::env::set_var(ENV_COMPENSATION_POLICY, policy);
            std::env::set_var(ENV_COMPENSATE_FAILED_CHAPTER, compensate_failed);
            std::env::set_var(ENV_CHAPTER_TIMEOUT_MS, timeout_ms);
        }
    }

    fn clear_env() {
        unsafe {
            std::env::remove_var(ENV_COMPENSATION_POLICY);
            std::env::remove_var(ENV_COMPENSATE_FAILED_CHAPTER);
            std::env::remove_var(ENV_CHAPTER_TIMEOUT_MS);
        }
    }

    #[test]
    fn test_default_values() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.compensation, CompensationPolicy::BestEffort);
        assert!(!config.compensate_failed_chapter);
        assert!(config.chapter_timeout.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_valid_values() {
        set_env("escalate", "true", "25");
        let config = OrchestratorConfig::from_env();
        clear_env();

        assert_eq!(config.compensation, CompensationPolicy::Escalate);
        assert!(config.compensate_failed_chapter);
        assert_eq!(config.chapter_timeout, Some(Duration::from_millis(25)));
    }

    #[test]
    #[serial]
    fn test_from_env_falls_back_on_invalid_values() {
        set_env("bogus", "maybe", "-5");
        let config = OrchestratorConfig::from_env();
        clear_env();

        assert_eq!(config, OrchestratorConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_without_variables_uses_defaults() {
        clear_env();
        assert_eq!(OrchestratorConfig::from_env(), OrchestratorConfig::default());
    }

    #[test]
    fn test_builder_methods() {
        let config = OrchestratorConfig::default()
            .with_compensation(CompensationPolicy::Escalate)
            .with_compensate_failed_chapter(true)
            .with_chapter_timeout(Duration::from_millis(250));

        assert_eq!(config.compensation, CompensationPolicy::Escalate);
        assert!(config.compensate_failed_chapter);
        assert_eq!(config.chapter_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "escalate".parse::<CompensationPolicy>().unwrap(),
            CompensationPolicy::Escalate
        );
        assert_eq!(
            " Best_Effort ".parse::<CompensationPolicy>().unwrap(),
            CompensationPolicy::BestEffort
        );
        assert_eq!(
            "best-effort".parse::<CompensationPolicy>().unwrap(),
            CompensationPolicy::BestEffort
        );
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let err = "retry".parse::<CompensationPolicy>().unwrap_err();
        assert!(matches!(err, SagaError::InvalidConfig { .. }));
        assert!(err.to_string().contains("retry"));
    }

    #[test]
    fn test_policy_display_matches_parse() {
        for policy in [CompensationPolicy::BestEffort, CompensationPolicy::Escalate] {
            assert_eq!(policy.to_string().parse::<CompensationPolicy>().unwrap(), policy);
        }
    }
}

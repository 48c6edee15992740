//! Saga execution state machine.

use serde::{Deserialize, Serialize};

use crate::saga::SagaResult;

/// The state of a saga run.
///
/// State transitions:
/// ```text
/// RunningForward ──┬──► Finished
///                  ├──► Crashed                      (service not found)
///                  └──► RollingBack ──┬──► Rollback
///                                     └──► Crashed   (escalated compensation failure)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ExecutionState {
    /// Chapters are being processed in declaration order.
    #[default]
    RunningForward,

    /// A chapter failed and completed chapters are being compensated.
    RollingBack,

    /// All chapters processed (terminal state).
    Finished,

    /// Compensation finished after a failure (terminal state).
    Rollback,

    /// Execution stopped on a configuration error or an escalated
    /// compensation failure (terminal state).
    Crashed,
}

impl ExecutionState {
    /// Returns true if a chapter failure can start compensation.
    pub fn can_compensate(&self) -> bool {
        matches!(self, ExecutionState::RunningForward)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.terminal_result().is_some()
    }

    /// Returns the caller-visible result for terminal states.
    pub fn terminal_result(&self) -> Option<SagaResult> {
        match self {
            ExecutionState::Finished => Some(SagaResult::Finished),
            ExecutionState::Rollback => Some(SagaResult::Rollback),
            ExecutionState::Crashed => Some(SagaResult::Crashed),
            ExecutionState::RunningForward | ExecutionState::RollingBack => None,
        }
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionState::RunningForward => "RunningForward",
            ExecutionState::RollingBack => "RollingBack",
            ExecutionState::Finished => "Finished",
            ExecutionState::Rollback => "Rollback",
            ExecutionState::Crashed => "Crashed",
        }
    }
}

impl From<SagaResult> for ExecutionState {
    fn from(result: SagaResult) -> Self {
        match result {
            SagaResult::Finished => ExecutionState::Finished,
            SagaResult::Rollback => ExecutionState::Rollback,
            SagaResult::Crashed => ExecutionState::Crashed,
        }
    }
}

impl std::fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_running_forward() {
        assert_eq!(ExecutionState::default(), ExecutionState::RunningForward);
    }

    #[test]
    fn test_can_compensate() {
        assert!(ExecutionState::RunningForward.can_compensate());
        assert!(!ExecutionState::RollingBack.can_compensate());
        assert!(!ExecutionState::Finished.can_compensate());
        assert!(!ExecutionState::Rollback.can_compensate());
        assert!(!ExecutionState::Crashed.can_compensate());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ExecutionState::RunningForward.is_terminal());
        assert!(!ExecutionState::RollingBack.is_terminal());
        assert!(ExecutionState::Finished.is_terminal());
        assert!(ExecutionState::Rollback.is_terminal());
        assert!(ExecutionState::Crashed.is_terminal());
    }

    #[test]
    fn test_terminal_result_roundtrip() {
        for result in [SagaResult::Finished, SagaResult::Rollback, SagaResult::Crashed] {
            assert_eq!(ExecutionState::from(result).terminal_result(), Some(result));
        }
        assert_eq!(ExecutionState::RollingBack.terminal_result(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExecutionState::RunningForward.to_string(), "RunningForward");
        assert_eq!(ExecutionState::RollingBack.to_string(), "RollingBack");
        assert_eq!(ExecutionState::Crashed.to_string(), "Crashed");
    }
}

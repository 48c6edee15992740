//! Saga run state rebuilt from its events.

use common::SagaId;
use serde::{Deserialize, Serialize};

use crate::events::SagaEvent;
use crate::saga::SagaResult;
use crate::state::ExecutionState;

/// What happened during one saga run.
///
/// Built by applying [`SagaEvent`]s in order, either live by the
/// orchestrator or by replaying a journal. Gives callers the detail the
/// terminal result alone does not carry: which chapter failed and which
/// compensations did not go through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SagaRecord {
    id: Option<SagaId>,
    state: ExecutionState,
    chapter_count: usize,
    current_chapter: Option<usize>,
    completed_chapters: Vec<String>,
    failed_chapter: Option<String>,
    failure_reason: Option<String>,
    missing_chapter: Option<String>,
    compensated_chapters: Vec<String>,
    failed_compensations: Vec<String>,
    result: Option<SagaResult>,
}

impl SagaRecord {
    /// Rebuilds a record from an ordered event sequence.
    pub fn replay<'a>(events: impl IntoIterator<Item = &'a SagaEvent>) -> Self {
        let mut record = Self::default();
        for event in events {
            record.apply(event.clone());
        }
        record
    }

    /// Applies a single event.
    pub fn apply(&mut self, event: SagaEvent) {
        match event {
            SagaEvent::SagaStarted(data) => {
                self.id = Some(data.saga_id);
                self.chapter_count = data.chapter_count;
                self.state = ExecutionState::RunningForward;
            }
            SagaEvent::ChapterStarted(data) => {
                self.current_chapter = Some(data.index);
            }
            SagaEvent::ChapterCompleted(data) => {
                self.completed_chapters.push(data.chapter);
            }
            SagaEvent::ChapterFailed(data) => {
                self.failed_chapter = Some(data.chapter);
                self.failure_reason = Some(data.reason);
            }
            SagaEvent::ServiceNotFound(data) => {
                self.current_chapter = Some(data.index);
                self.missing_chapter = Some(data.chapter);
            }
            SagaEvent::CompensationStarted(data) => {
                if self.state.can_compensate() {
                    self.state = ExecutionState::RollingBack;
                } else {
                    tracing::warn!(
                        saga_id = ?self.id,
                        state = %self.state,
                        from_chapter = %data.from_chapter,
                        "ignoring compensation start outside the forward pass"
                    );
                }
            }
            SagaEvent::CompensationStepCompleted(data) => {
                self.compensated_chapters.push(data.chapter);
            }
            SagaEvent::CompensationStepFailed(data) => {
                // The sweep keeps going; only the terminal result may change.
                self.failed_compensations.push(data.chapter);
            }
            SagaEvent::SagaFinished(data) => {
                self.result = Some(data.result);
                self.state = data.result.into();
            }
        }
    }
}

// Query methods
impl SagaRecord {
    /// Returns the saga run ID.
    pub fn id(&self) -> Option<SagaId> {
        self.id
    }

    /// Returns the execution state.
    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// Returns the number of chapters in the script.
    pub fn chapter_count(&self) -> usize {
        self.chapter_count
    }

    /// Returns the index of the last chapter the run reached.
    pub fn current_chapter(&self) -> Option<usize> {
        self.current_chapter
    }

    /// Returns the chapters whose `process` succeeded, in order.
    pub fn completed_chapters(&self) -> &[String] {
        &self.completed_chapters
    }

    /// Returns the chapter whose `process` failed, if any.
    pub fn failed_chapter(&self) -> Option<&str> {
        self.failed_chapter.as_deref()
    }

    /// Returns the reason recorded for the failed chapter.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Returns the chapter that had no registered service, if any.
    pub fn missing_chapter(&self) -> Option<&str> {
        self.missing_chapter.as_deref()
    }

    /// Returns the chapters successfully compensated, in rollback order.
    pub fn compensated_chapters(&self) -> &[String] {
        &self.compensated_chapters
    }

    /// Returns the chapters whose `rollback` failed, in rollback order.
    pub fn failed_compensations(&self) -> &[String] {
        &self.failed_compensations
    }

    /// Returns the terminal result once the run is over.
    pub fn result(&self) -> Option<SagaResult> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_empty() {
        let record = SagaRecord::default();
        assert!(record.id().is_none());
        assert_eq!(record.state(), ExecutionState::RunningForward);
        assert!(record.result().is_none());
        assert!(record.completed_chapters().is_empty());
    }

    #[test]
    fn test_finished_run() {
        let saga_id = SagaId::new();
        let events = vec![
            SagaEvent::saga_started(saga_id, 2),
            SagaEvent::chapter_started(0, "a"),
            SagaEvent::chapter_completed(0, "a"),
            SagaEvent::chapter_started(1, "b"),
            SagaEvent::chapter_completed(1, "b"),
            SagaEvent::saga_finished(SagaResult::Finished),
        ];

        let record = SagaRecord::replay(&events);
        assert_eq!(record.id(), Some(saga_id));
        assert_eq!(record.chapter_count(), 2);
        assert_eq!(record.state(), ExecutionState::Finished);
        assert_eq!(record.result(), Some(SagaResult::Finished));
        assert_eq!(record.completed_chapters(), &["a", "b"]);
        assert_eq!(record.current_chapter(), Some(1));
        assert!(record.failed_chapter().is_none());
    }

    #[test]
    fn test_rolled_back_run() {
        let events = vec![
            SagaEvent::saga_started(SagaId::new(), 3),
            SagaEvent::chapter_started(0, "a"),
            SagaEvent::chapter_completed(0, "a"),
            SagaEvent::chapter_started(1, "b"),
            SagaEvent::chapter_completed(1, "b"),
            SagaEvent::chapter_started(2, "c"),
            SagaEvent::chapter_failed(2, "c", "declined"),
            SagaEvent::compensation_started("c", 2),
            SagaEvent::compensation_step_failed(1, "b", "unavailable"),
            SagaEvent::compensation_step_completed(0, "a"),
            SagaEvent::saga_finished(SagaResult::Rollback),
        ];

        let record = SagaRecord::replay(&events);
        assert_eq!(record.state(), ExecutionState::Rollback);
        assert_eq!(record.failed_chapter(), Some("c"));
        assert_eq!(record.failure_reason(), Some("declined"));
        assert_eq!(record.compensated_chapters(), &["a"]);
        assert_eq!(record.failed_compensations(), &["b"]);
    }

    #[test]
    fn test_compensation_started_moves_to_rolling_back() {
        let mut record = SagaRecord::default();
        record.apply(SagaEvent::saga_started(SagaId::new(), 1));
        record.apply(SagaEvent::chapter_failed(0, "a", "boom"));
        record.apply(SagaEvent::compensation_started("a", 0));
        assert_eq!(record.state(), ExecutionState::RollingBack);
    }

    #[test]
    fn test_compensation_start_after_terminal_state_is_ignored() {
        let mut record = SagaRecord::default();
        record.apply(SagaEvent::saga_started(SagaId::new(), 1));
        record.apply(SagaEvent::saga_finished(SagaResult::Finished));
        record.apply(SagaEvent::compensation_started("a", 0));
        assert_eq!(record.state(), ExecutionState::Finished);
    }

    #[test]
    fn test_missing_service_run() {
        let events = vec![
            SagaEvent::saga_started(SagaId::new(), 2),
            SagaEvent::chapter_started(0, "a"),
            SagaEvent::chapter_completed(0, "a"),
            SagaEvent::service_not_found(1, "ghost"),
            SagaEvent::saga_finished(SagaResult::Crashed),
        ];

        let record = SagaRecord::replay(&events);
        assert_eq!(record.state(), ExecutionState::Crashed);
        assert_eq!(record.missing_chapter(), Some("ghost"));
        assert_eq!(record.current_chapter(), Some(1));
        assert!(record.compensated_chapters().is_empty());
    }

    #[test]
    fn test_serialization() {
        let record = SagaRecord::replay(&[SagaEvent::saga_started(SagaId::new(), 1)]);
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: SagaRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}

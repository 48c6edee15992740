//! Events emitted while a saga runs.

use chrono::{DateTime, Utc};
use common::SagaId;
use serde::{Deserialize, Serialize};

use crate::saga::SagaResult;

/// Events that can occur during saga execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SagaEvent {
    /// Saga execution started.
    SagaStarted(SagaStartedData),

    /// A chapter's `process` call started.
    ChapterStarted(ChapterData),

    /// A chapter's `process` call succeeded.
    ChapterCompleted(ChapterData),

    /// A chapter's `process` call failed.
    ChapterFailed(ChapterFailedData),

    /// No service is registered for a chapter.
    ServiceNotFound(ChapterData),

    /// Compensation started after a chapter failure.
    CompensationStarted(CompensationData),

    /// A chapter's `rollback` call succeeded.
    CompensationStepCompleted(ChapterData),

    /// A chapter's `rollback` call failed (compensation continues).
    CompensationStepFailed(ChapterFailedData),

    /// Saga reached a terminal result.
    SagaFinished(SagaFinishedData),
}

impl SagaEvent {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            SagaEvent::SagaStarted(_) => "SagaStarted",
            SagaEvent::ChapterStarted(_) => "ChapterStarted",
            SagaEvent::ChapterCompleted(_) => "ChapterCompleted",
            SagaEvent::ChapterFailed(_) => "ChapterFailed",
            SagaEvent::ServiceNotFound(_) => "ServiceNotFound",
            SagaEvent::CompensationStarted(_) => "CompensationStarted",
            SagaEvent::CompensationStepCompleted(_) => "CompensationStepCompleted",
            SagaEvent::CompensationStepFailed(_) => "CompensationStepFailed",
            SagaEvent::SagaFinished(_) => "SagaFinished",
        }
    }
}

/// Data for SagaStarted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SagaStartedData {
    /// The saga run ID.
    pub saga_id: SagaId,
    /// Number of chapters in the script.
    pub chapter_count: usize,
    /// When the saga started.
    pub started_at: DateTime<Utc>,
}

/// Identifies one chapter occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterData {
    /// Zero-based position in the saga.
    pub index: usize,
    /// The chapter name.
    pub chapter: String,
}

/// Data for failed process or rollback calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterFailedData {
    /// Zero-based position in the saga.
    pub index: usize,
    /// The chapter name.
    pub chapter: String,
    /// What went wrong.
    pub reason: String,
}

/// Data for CompensationStarted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationData {
    /// The chapter whose failure triggered compensation.
    pub from_chapter: String,
    /// Number of chapters to compensate.
    pub pending: usize,
}

/// Data for SagaFinished event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SagaFinishedData {
    /// The terminal result.
    pub result: SagaResult,
    /// When the saga finished.
    pub finished_at: DateTime<Utc>,
}

// Convenience constructors
impl SagaEvent {
    /// Creates a SagaStarted event.
    pub fn saga_started(saga_id: SagaId, chapter_count: usize) -> Self {
        SagaEvent::SagaStarted(SagaStartedData {
            saga_id,
            chapter_count,
            started_at: Utc::now(),
        })
    }

    /// Creates a ChapterStarted event.
    pub fn chapter_started(index: usize, chapter: impl Into<String>) -> Self {
        SagaEvent::ChapterStarted(ChapterData {
            index,
            chapter: chapter.into(),
        })
    }

    /// Creates a ChapterCompleted event.
    pub fn chapter_completed(index: usize, chapter: impl Into<String>) -> Self {
        SagaEvent::ChapterCompleted(ChapterData {
            index,
            chapter: chapter.into(),
        })
    }

    /// Creates a ChapterFailed event.
    pub fn chapter_failed(
        index: usize,
        chapter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SagaEvent::ChapterFailed(ChapterFailedData {
            index,
            chapter: chapter.into(),
            reason: reason.into(),
        })
    }

    /// Creates a ServiceNotFound event.
    pub fn service_not_found(index: usize, chapter: impl Into<String>) -> Self {
        SagaEvent::ServiceNotFound(ChapterData {
            index,
            chapter: chapter.into(),
        })
    }

    /// Creates a CompensationStarted event.
    pub fn compensation_started(from_chapter: impl Into<String>, pending: usize) -> Self {
        SagaEvent::CompensationStarted(CompensationData {
            from_chapter: from_chapter.into(),
            pending,
        })
    }

    /// Creates a CompensationStepCompleted event.
    pub fn compensation_step_completed(index: usize, chapter: impl Into<String>) -> Self {
        SagaEvent::CompensationStepCompleted(ChapterData {
            index,
            chapter: chapter.into(),
        })
    }

    /// Creates a CompensationStepFailed event.
    pub fn compensation_step_failed(
        index: usize,
        chapter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SagaEvent::CompensationStepFailed(ChapterFailedData {
            index,
            chapter: chapter.into(),
            reason: reason.into(),
        })
    }

    /// Creates a SagaFinished event.
    pub fn saga_finished(result: SagaResult) -> Self {
        SagaEvent::SagaFinished(SagaFinishedData {
            result,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        assert_eq!(
            SagaEvent::saga_started(SagaId::new(), 4).event_type(),
            "SagaStarted"
        );
        assert_eq!(SagaEvent::chapter_started(0, "1").event_type(), "ChapterStarted");
        assert_eq!(
            SagaEvent::chapter_completed(0, "1").event_type(),
            "ChapterCompleted"
        );
        assert_eq!(
            SagaEvent::chapter_failed(3, "4", "declined").event_type(),
            "ChapterFailed"
        );
        assert_eq!(
            SagaEvent::service_not_found(1, "missing").event_type(),
            "ServiceNotFound"
        );
        assert_eq!(
            SagaEvent::compensation_started("4", 3).event_type(),
            "CompensationStarted"
        );
        assert_eq!(
            SagaEvent::compensation_step_completed(2, "3").event_type(),
            "CompensationStepCompleted"
        );
        assert_eq!(
            SagaEvent::compensation_step_failed(2, "3", "timeout").event_type(),
            "CompensationStepFailed"
        );
        assert_eq!(
            SagaEvent::saga_finished(SagaResult::Rollback).event_type(),
            "SagaFinished"
        );
    }

    #[test]
    fn test_tagged_json_layout() {
        let event = SagaEvent::chapter_failed(3, "withdrawing Money", "declined");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "ChapterFailed");
        assert_eq!(json["data"]["index"], 3);
        assert_eq!(json["data"]["chapter"], "withdrawing Money");
        assert_eq!(json["data"]["reason"], "declined");
    }

    #[test]
    fn test_saga_finished_data() {
        let event = SagaEvent::saga_finished(SagaResult::Crashed);

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: SagaEvent = serde_json::from_str(&json).unwrap();

        if let SagaEvent::SagaFinished(data) = deserialized {
            assert_eq!(data.result, SagaResult::Crashed);
        } else {
            panic!("Expected SagaFinished event");
        }
    }
}

//! The contract a chapter's executing service fulfils.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::chapter::ChapterResult;

/// Values threaded through a saga's chapters.
pub trait SagaValue: Clone + Debug + Send + Sync + 'static {}

impl<T> SagaValue for T where T: Clone + Debug + Send + Sync + 'static {}

/// A named unit of work bound to a chapter.
///
/// Implementations may be in-process or adapters over a remote transport;
/// the orchestrator only relies on this contract. `rollback` receives the
/// value produced by the `process` call it compensates.
///
/// The default implementations log the call and succeed with the input
/// value unchanged.
#[async_trait]
pub trait Service<T: SagaValue>: Send + Sync {
    /// Returns the name the service is discovered under.
    fn name(&self) -> &str;

    /// Runs the forward step.
    async fn process(&self, value: T) -> ChapterResult<T> {
        tracing::info!(
            chapter = self.name(),
            ?value,
            "chapter processed, data stored"
        );
        ChapterResult::success(value)
    }

    /// Runs the compensating step.
    async fn rollback(&self, value: T) -> ChapterResult<T> {
        tracing::info!(
            chapter = self.name(),
            ?value,
            "chapter rolled back, data reverted"
        );
        ChapterResult::success(value)
    }
}

//! Saga orchestrator: drives chapters forward and compensates on failure.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use common::SagaId;

use crate::chapter::ChapterResult;
use crate::config::{CompensationPolicy, OrchestratorConfig};
use crate::discovery::ServiceDiscovery;
use crate::events::SagaEvent;
use crate::journal::SagaJournal;
use crate::record::SagaRecord;
use crate::saga::{Saga, SagaResult};
use crate::service::{SagaValue, Service};

/// Outcome of [`SagaOrchestrator::run`].
#[derive(Debug, Clone)]
pub struct SagaExecution<T> {
    /// The ID assigned to this run.
    pub saga_id: SagaId,
    /// The terminal result.
    pub result: SagaResult,
    /// The value the forward pass ended with: the last chapter's output on
    /// success, the failing chapter's value otherwise.
    pub value: T,
    /// Everything that happened during the run.
    pub record: SagaRecord,
}

/// A chapter waiting on the compensation stack.
struct Compensable<T: SagaValue> {
    index: usize,
    chapter: String,
    service: Arc<dyn Service<T>>,
    value: T,
}

/// Runs a saga script against a service registry.
///
/// Chapters execute strictly in declaration order; compensation runs in
/// exactly the reverse order over the chapters whose `process` succeeded.
/// A chapter with no registered service stops the run as `Crashed`
/// without compensating anything. Each run is independent: the
/// orchestrator holds no per-run state between calls.
pub struct SagaOrchestrator<T: SagaValue> {
    saga: Saga,
    discovery: ServiceDiscovery<T>,
    config: OrchestratorConfig,
    journal: Option<Arc<dyn SagaJournal>>,
}

impl<T: SagaValue> SagaOrchestrator<T> {
    /// Creates an orchestrator with the default configuration.
    pub fn new(saga: Saga, discovery: ServiceDiscovery<T>) -> Self {
        Self {
            saga,
            discovery,
            config: OrchestratorConfig::default(),
            journal: None,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Journals every event of every run.
    pub fn with_journal(mut self, journal: Arc<dyn SagaJournal>) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Returns the saga script.
    pub fn saga(&self) -> &Saga {
        &self.saga
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Executes the saga and returns its terminal result.
    pub async fn execute(&self, value: T) -> SagaResult {
        self.run(value).await.result
    }

    /// Executes the saga and returns the result together with its record.
    #[tracing::instrument(
        skip(self, value),
        fields(saga_id = tracing::field::Empty, chapters = self.saga.len())
    )]
    pub async fn run(&self, value: T) -> SagaExecution<T> {
        metrics::counter!("saga_executions_total").increment(1);
        let started = Instant::now();
        let saga_id = SagaId::new();
        tracing::Span::current().record("saga_id", tracing::field::display(saga_id));
        tracing::info!(%saga_id, "new saga is about to start");

        let mut record = SagaRecord::default();
        self.emit(
            saga_id,
            &mut record,
            SagaEvent::saga_started(saga_id, self.saga.len()),
        )
        .await;

        let mut stack: Vec<Compensable<T>> = Vec::with_capacity(self.saga.len());
        let mut current = value;

        for (index, chapter) in self.saga.chapters().iter().enumerate() {
            let name = chapter.name();

            let Some(service) = self.discovery.find(name) else {
                tracing::error!(%saga_id, index, chapter = name, "no service registered for chapter");
                self.emit(
                    saga_id,
                    &mut record,
                    SagaEvent::service_not_found(index, name),
                )
                .await;
                let result = SagaResult::Crashed;
                return self.finish(saga_id, record, result, current, started).await;
            };

            tracing::info!(%saga_id, index, chapter = name, "chapter started");
            self.emit(saga_id, &mut record, SagaEvent::chapter_started(index, name))
                .await;

            let outcome = self.call(service.process(current.clone())).await;
            let (failed_value, reason) = match outcome {
                Some(ChapterResult::Success(next)) => {
                    tracing::info!(%saga_id, index, chapter = name, "chapter completed");
                    self.emit(
                        saga_id,
                        &mut record,
                        SagaEvent::chapter_completed(index, name),
                    )
                    .await;
                    stack.push(Compensable {
                        index,
                        chapter: name.to_string(),
                        service,
                        value: next.clone(),
                    });
                    current = next;
                    continue;
                }
                Some(ChapterResult::Failure(failed)) => {
                    (failed, "service reported failure".to_string())
                }
                None => (current, self.timeout_reason()),
            };

            tracing::warn!(%saga_id, index, chapter = name, %reason, "chapter failed");
            self.emit(
                saga_id,
                &mut record,
                SagaEvent::chapter_failed(index, name, reason),
            )
            .await;

            if self.config.compensate_failed_chapter {
                stack.push(Compensable {
                    index,
                    chapter: name.to_string(),
                    service,
                    value: failed_value.clone(),
                });
            }

            let result = self.compensate(saga_id, &mut record, name, stack).await;
            return self
                .finish(saga_id, record, result, failed_value, started)
                .await;
        }

        self.finish(saga_id, record, SagaResult::Finished, current, started)
            .await
    }

    /// Pops the compensation stack, rolling back each chapter.
    ///
    /// A failed rollback never stops the sweep.
    async fn compensate(
        &self,
        saga_id: SagaId,
        record: &mut SagaRecord,
        failed_chapter: &str,
        mut stack: Vec<Compensable<T>>,
    ) -> SagaResult {
        tracing::info!(
            %saga_id,
            from_chapter = failed_chapter,
            pending = stack.len(),
            "compensation started"
        );
        self.emit(
            saga_id,
            record,
            SagaEvent::compensation_started(failed_chapter, stack.len()),
        )
        .await;

        let mut failures = 0u64;
        while let Some(entry) = stack.pop() {
            let Compensable {
                index,
                chapter,
                service,
                value,
            } = entry;

            let outcome = self.call(service.rollback(value)).await;
            let reason = match outcome {
                Some(ChapterResult::Success(_)) => {
                    tracing::info!(%saga_id, index, chapter = %chapter, "chapter compensated");
                    self.emit(
                        saga_id,
                        record,
                        SagaEvent::compensation_step_completed(index, &chapter),
                    )
                    .await;
                    continue;
                }
                Some(ChapterResult::Failure(_)) => "rollback reported failure".to_string(),
                None => self.timeout_reason(),
            };

            failures += 1;
            tracing::warn!(%saga_id, index, chapter = %chapter, %reason, "compensation failed");
            self.emit(
                saga_id,
                record,
                SagaEvent::compensation_step_failed(index, &chapter, reason),
            )
            .await;
        }

        if failures > 0 {
            metrics::counter!("saga_compensation_failures_total").increment(failures);
        }

        match self.config.compensation {
            CompensationPolicy::Escalate if failures > 0 => SagaResult::Crashed,
            _ => SagaResult::Rollback,
        }
    }

    /// Runs a service call under the configured deadline.
    ///
    /// Returns `None` if the deadline elapsed.
    async fn call<F>(&self, call: F) -> Option<ChapterResult<T>>
    where
        F: Future<Output = ChapterResult<T>>,
    {
        match self.config.chapter_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.ok(),
            None => Some(call.await),
        }
    }

    fn timeout_reason(&self) -> String {
        match self.config.chapter_timeout {
            Some(limit) => format!("timed out after {}ms", limit.as_millis()),
            None => "timed out".to_string(),
        }
    }

    /// Applies an event to the live record and journals it.
    async fn emit(&self, saga_id: SagaId, record: &mut SagaRecord, event: SagaEvent) {
        if let Some(journal) = &self.journal {
            if let Err(e) = journal.append(saga_id, event.clone()).await {
                tracing::warn!(%saga_id, event = event.event_type(), error = %e, "failed to journal saga event");
            }
        }
        record.apply(event);
    }

    async fn finish(
        &self,
        saga_id: SagaId,
        mut record: SagaRecord,
        result: SagaResult,
        value: T,
        started: Instant,
    ) -> SagaExecution<T> {
        self.emit(saga_id, &mut record, SagaEvent::saga_finished(result))
            .await;

        let duration = started.elapsed().as_secs_f64();
        metrics::histogram!("saga_duration_seconds").record(duration);
        match result {
            SagaResult::Finished => {
                metrics::counter!("saga_finished").increment(1);
                tracing::info!(%saga_id, duration, %result, "saga finished");
            }
            SagaResult::Rollback => {
                metrics::counter!("saga_rolled_back").increment(1);
                tracing::warn!(%saga_id, duration, %result, "saga rolled back");
            }
            SagaResult::Crashed => {
                metrics::counter!("saga_crashed").increment(1);
                tracing::error!(%saga_id, duration, %result, "saga crashed");
            }
        }

        SagaExecution {
            saga_id,
            result,
            value,
            record,
        }
    }
}

impl<T: SagaValue> std::fmt::Debug for SagaOrchestrator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SagaOrchestrator")
            .field("saga", &self.saga)
            .field("discovery", &self.discovery)
            .field("config", &self.config)
            .field("journaled", &self.journal.is_some())
            .finish()
    }
}

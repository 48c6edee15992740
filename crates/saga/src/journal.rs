//! Append-only journal of saga events.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::SagaId;
use tokio::sync::RwLock;

use crate::error::{Result, SagaError};
use crate::events::SagaEvent;
use crate::record::SagaRecord;

/// Storage for the events of saga runs.
#[async_trait]
pub trait SagaJournal: Send + Sync {
    /// Appends an event to a run's stream.
    async fn append(&self, saga_id: SagaId, event: SagaEvent) -> Result<()>;

    /// Returns a run's events in append order.
    async fn events(&self, saga_id: SagaId) -> Result<Vec<SagaEvent>>;

    /// Rebuilds a run's record, or `None` if the run is unknown.
    async fn load(&self, saga_id: SagaId) -> Result<Option<SagaRecord>> {
        let events = self.events(saga_id).await?;

        if events.is_empty() {
            return Ok(None);
        }

        Ok(Some(SagaRecord::replay(&events)))
    }
}

#[derive(Debug, Default)]
struct InMemoryJournalState {
    streams: HashMap<SagaId, Vec<SagaEvent>>,
    order: Vec<SagaId>,
    fail_on_append: bool,
}

/// In-memory journal for tests and the demo.
#[derive(Debug, Clone, Default)]
pub struct InMemorySagaJournal {
    state: Arc<RwLock<InMemoryJournalState>>,
}

impl InMemorySagaJournal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the journal to reject appends.
    pub async fn set_fail_on_append(&self, fail: bool) {
        self.state.write().await.fail_on_append = fail;
    }

    /// Returns the total number of stored events.
    pub async fn event_count(&self) -> usize {
        self.state
            .read()
            .await
            .streams
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Returns the IDs of journaled runs in first-seen order.
    pub async fn saga_ids(&self) -> Vec<SagaId> {
        self.state.read().await.order.clone()
    }

    /// Clears all events.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.streams.clear();
        state.order.clear();
    }
}

#[async_trait]
impl SagaJournal for InMemorySagaJournal {
    async fn append(&self, saga_id: SagaId, event: SagaEvent) -> Result<()> {
        let mut state = self.state.write().await;

        if state.fail_on_append {
            return Err(SagaError::Journal {
                saga_id,
                reason: "journal unavailable".to_string(),
            });
        }

        if !state.streams.contains_key(&saga_id) {
            state.order.push(saga_id);
        }
        state.streams.entry(saga_id).or_default().push(event);
        Ok(())
    }

    async fn events(&self, saga_id: SagaId) -> Result<Vec<SagaEvent>> {
        Ok(self
            .state
            .read()
            .await
            .streams
            .get(&saga_id)
            .cloned()
            .unwrap_or_default())
    }
}

//! Saga orchestration with compensating rollback.
//!
//! A [`Saga`] is an ordered script of named chapters. The
//! [`SagaOrchestrator`] resolves each chapter through a
//! [`ServiceDiscovery`] and calls the service's `process` step in order.
//! On the first failure it compensates the completed chapters in reverse
//! order with their `rollback` step.
//!
//! Every run ends in a [`SagaResult`]:
//! - `Finished`: all chapters processed
//! - `Rollback`: a chapter failed and earlier chapters were compensated
//! - `Crashed`: a chapter had no registered service (nothing is
//!   compensated), or a compensation failed under
//!   [`CompensationPolicy::Escalate`]

pub mod chapter;
pub mod config;
pub mod discovery;
pub mod error;
pub mod events;
pub mod journal;
pub mod orchestrator;
pub mod record;
pub mod saga;
pub mod service;
pub mod services;
pub mod state;
pub mod travel;

pub use chapter::ChapterResult;
pub use common::SagaId;
pub use config::{CompensationPolicy, OrchestratorConfig};
pub use discovery::ServiceDiscovery;
pub use error::{Result, SagaError};
pub use events::SagaEvent;
pub use journal::{InMemorySagaJournal, SagaJournal};
pub use orchestrator::{SagaExecution, SagaOrchestrator};
pub use record::SagaRecord;
pub use saga::{Chapter, Saga, SagaBuilder, SagaResult};
pub use service::{SagaValue, Service};
pub use services::{FlyBookingService, HotelBookingService, OrderService, WithdrawMoneyService};
pub use state::ExecutionState;
pub use travel::TravelAgency;

//! Flight booking service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::chapter::ChapterResult;
use crate::service::Service;
use crate::travel::BOOK_FLY;

#[derive(Debug, Default)]
struct FlyBookingState {
    bookings: HashMap<String, String>,
    next_id: u32,
}

/// Books a flight per order; rollback cancels the booking.
#[derive(Debug, Clone, Default)]
pub struct FlyBookingService {
    state: Arc<RwLock<FlyBookingState>>,
}

impl FlyBookingService {
    /// Creates a new flight booking service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of active bookings.
    pub async fn booking_count(&self) -> usize {
        self.state.read().await.bookings.len()
    }

    /// Returns the booking reference held for an order.
    pub async fn booking_for(&self, order: &str) -> Option<String> {
        self.state.read().await.bookings.get(order).cloned()
    }
}

#[async_trait]
impl Service<String> for FlyBookingService {
    fn name(&self) -> &str {
        BOOK_FLY
    }

    async fn process(&self, value: String) -> ChapterResult<String> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let reference = format!("FLY-{:04}", state.next_id);
        state.bookings.insert(value.clone(), reference.clone());

        tracing::info!(chapter = BOOK_FLY, order = %value, %reference, "flight booked");
        ChapterResult::success(value)
    }

    async fn rollback(&self, value: String) -> ChapterResult<String> {
        let cancelled = self.state.write().await.bookings.remove(&value);
        tracing::info!(chapter = BOOK_FLY, order = %value, reference = ?cancelled, "flight cancelled");
        ChapterResult::success(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_book_and_cancel() {
        let service = FlyBookingService::new();

        service.process("good_order".to_string()).await;
        assert_eq!(
            service.booking_for("good_order").await.as_deref(),
            Some("FLY-0001")
        );

        service.rollback("good_order".to_string()).await;
        assert_eq!(service.booking_count().await, 0);
    }

    #[tokio::test]
    async fn test_sequential_references() {
        let service = FlyBookingService::new();
        service.process("a".to_string()).await;
        service.process("b".to_string()).await;

        assert_eq!(service.booking_for("b").await.as_deref(), Some("FLY-0002"));
    }
}

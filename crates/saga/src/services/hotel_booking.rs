//! Hotel booking service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::chapter::ChapterResult;
use crate::service::Service;
use crate::travel::{BOOK_HOTEL, CRASHED_ORDER};

#[derive(Debug, Default)]
struct HotelBookingState {
    rooms: HashMap<String, String>,
    next_id: u32,
}

/// Books a hotel room per order.
///
/// Cancelling the room for [`CRASHED_ORDER`] fails and leaves the room booked.
#[derive(Debug, Clone, Default)]
pub struct HotelBookingService {
    state: Arc<RwLock<HotelBookingState>>,
}

impl HotelBookingService {
    /// Creates a new hotel booking service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of booked rooms.
    pub async fn room_count(&self) -> usize {
        self.state.read().await.rooms.len()
    }

    /// Returns true if a room is booked for the order.
    pub async fn has_room(&self, order: &str) -> bool {
        self.state.read().await.rooms.contains_key(order)
    }
}

#[async_trait]
impl Service<String> for HotelBookingService {
    fn name(&self) -> &str {
        BOOK_HOTEL
    }

    async fn process(&self, value: String) -> ChapterResult<String> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let reference = format!("ROOM-{:04}", state.next_id);
        state.rooms.insert(value.clone(), reference.clone());

        tracing::info!(chapter = BOOK_HOTEL, order = %value, %reference, "hotel room booked");
        ChapterResult::success(value)
    }

    async fn rollback(&self, value: String) -> ChapterResult<String> {
        if value == CRASHED_ORDER {
            tracing::error!(chapter = BOOK_HOTEL, order = %value, "hotel cancellation failed");
            return ChapterResult::failure(value);
        }

        self.state.write().await.rooms.remove(&value);
        tracing::info!(chapter = BOOK_HOTEL, order = %value, "hotel room cancelled");
        ChapterResult::success(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_book_and_cancel() {
        let service = HotelBookingService::new();

        service.process("bad_order".to_string()).await;
        assert!(service.has_room("bad_order").await);

        let result = service.rollback("bad_order".to_string()).await;
        assert!(result.is_success());
        assert_eq!(service.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_crashed_order_cannot_be_cancelled() {
        let service = HotelBookingService::new();

        service.process(CRASHED_ORDER.to_string()).await;
        let result = service.rollback(CRASHED_ORDER.to_string()).await;

        assert_eq!(result, ChapterResult::Failure(CRASHED_ORDER.to_string()));
        assert!(service.has_room(CRASHED_ORDER).await);
    }
}

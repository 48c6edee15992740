//! Order intake service.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::chapter::ChapterResult;
use crate::service::Service;
use crate::travel::INIT_ORDER;

/// Registers incoming orders; rollback forgets them.
#[derive(Debug, Clone, Default)]
pub struct OrderService {
    orders: Arc<RwLock<HashSet<String>>>,
}

impl OrderService {
    /// Creates a new order service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of open orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Returns true if the order is open.
    pub async fn has_order(&self, order: &str) -> bool {
        self.orders.read().await.contains(order)
    }
}

#[async_trait]
impl Service<String> for OrderService {
    fn name(&self) -> &str {
        INIT_ORDER
    }

    async fn process(&self, value: String) -> ChapterResult<String> {
        self.orders.write().await.insert(value.clone());
        tracing::info!(chapter = INIT_ORDER, order = %value, "order registered");
        ChapterResult::success(value)
    }

    async fn rollback(&self, value: String) -> ChapterResult<String> {
        self.orders.write().await.remove(&value);
        tracing::info!(chapter = INIT_ORDER, order = %value, "order withdrawn");
        ChapterResult::success(value)
    }
}

//! Payment withdrawal service.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::chapter::ChapterResult;
use crate::service::Service;
use crate::travel::{BAD_ORDER, CRASHED_ORDER, WITHDRAW_MONEY};

/// Withdraws payment for an order; rollback refunds it.
///
/// Withdrawal is declined for [`BAD_ORDER`] and [`CRASHED_ORDER`].
#[derive(Debug, Clone, Default)]
pub struct WithdrawMoneyService {
    withdrawals: Arc<RwLock<HashSet<String>>>,
}

impl WithdrawMoneyService {
    /// Creates a new withdrawal service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of withdrawals not refunded.
    pub async fn withdrawal_count(&self) -> usize {
        self.withdrawals.read().await.len()
    }
}

#[async_trait]
impl Service<String> for WithdrawMoneyService {
    fn name(&self) -> &str {
        WITHDRAW_MONEY
    }

    async fn process(&self, value: String) -> ChapterResult<String> {
        if value == BAD_ORDER || value == CRASHED_ORDER {
            tracing::warn!(chapter = WITHDRAW_MONEY, order = %value, "withdrawal declined");
            return ChapterResult::failure(value);
        }

        self.withdrawals.write().await.insert(value.clone());
        tracing::info!(chapter = WITHDRAW_MONEY, order = %value, "money withdrawn");
        ChapterResult::success(value)
    }

    async fn rollback(&self, value: String) -> ChapterResult<String> {
        self.withdrawals.write().await.remove(&value);
        tracing::info!(chapter = WITHDRAW_MONEY, order = %value, "money refunded");
        ChapterResult::success(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_withdraw_good_order() {
        let service = WithdrawMoneyService::new();
        let result = service.process("good_order".to_string()).await;

        assert!(result.is_success());
        assert_eq!(service.withdrawal_count().await, 1);
    }

    #[tokio::test]
    async fn test_declined_orders() {
        let service = WithdrawMoneyService::new();

        for order in [BAD_ORDER, CRASHED_ORDER] {
            let result = service.process(order.to_string()).await;
            assert_eq!(result, ChapterResult::Failure(order.to_string()));
        }
        assert_eq!(service.withdrawal_count().await, 0);
    }
}

//! InMemory User Repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{UserId, UserRepository, UserStoreError};

/// Reward counters keyed by user id. Unknown users start at zero.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    counters: Mutex<HashMap<UserId, u64>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, user_id: UserId) -> Result<u64, UserStoreError> {
        let counters = self.counters.lock().await;
        Ok(counters.get(&user_id).copied().unwrap_or(0))
    }

    async fn increment(&self, user_id: UserId) -> Result<u64, UserStoreError> {
        let mut counters = self.counters.lock().await;
        let counter = counters.entry(user_id).or_insert(0);
        *counter += 1;
        tracing::debug!("User {} counter is now {}", user_id, counter);
        Ok(*counter)
    }
}

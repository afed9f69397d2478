use crate::domain::ports::PendingStore;
use crate::domain::reading::{PendingReading, UserId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory pending store.
///
/// Uses `Arc<RwLock<HashMap<UserId, PendingReading>>>` for shared
/// concurrent access. `take` removes under a single write lock, which
/// is the atomicity the duplicate-confirmation guarantee rests on:
/// of two racing callers only one can observe the entry.
#[derive(Default, Clone)]
pub struct InMemoryPendingStore {
    readings: Arc<RwLock<HashMap<UserId, PendingReading>>>,
}

impl InMemoryPendingStore {
    /// Creates a new, empty in-memory pending store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PendingStore for InMemoryPendingStore {
    async fn put(&self, reading: PendingReading) -> Result<()> {
        let mut readings = self.readings.write().await;
        readings.insert(reading.user_id, reading);
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<PendingReading>> {
        let readings = self.readings.read().await;
        Ok(readings.get(&user_id).cloned())
    }

    async fn take(&self, user_id: UserId) -> Result<Option<PendingReading>> {
        let mut readings = self.readings.write().await;
        Ok(readings.remove(&user_id))
    }

    async fn delete(&self, user_id: UserId) -> Result<()> {
        let mut readings = self.readings.write().await;
        readings.remove(&user_id);
        Ok(())
    }
}

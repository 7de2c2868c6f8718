use crate::domain::payment::PaymentRecord;
use crate::domain::ports::RecordStore;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory payment record store.
///
/// Uses `Arc<RwLock<Vec<PaymentRecord>>>`: appends take the write lock, so writers
/// are serialized and every record lands exactly once, in arrival order.
/// Records live only as long as the process.
#[derive(Default, Clone)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<Vec<PaymentRecord>>>,
}

impl InMemoryRecordStore {
    /// Creates a new, empty in-memory record store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn append(&self, record: PaymentRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.push(record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PaymentRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().rev().cloned().collect())
    }
}

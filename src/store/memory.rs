//! In-memory trade store
//!
//! Backs the test suite and doubles as a throwaway backend. Ids are a
//! monotonic counter rendered as strings, so they are distinct for the
//! lifetime of the store just like remote-assigned ones.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{StoreError, StoreResult, TradeStore};
use crate::types::TradeRecord;

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<TradeRecord>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, for test assertions.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TradeStore for MemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<TradeRecord>> {
        Ok(self.inner.lock().unwrap().records.clone())
    }

    async fn insert(&self, record: &TradeRecord) -> StoreResult<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id.to_string();
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        inner.records.push(stored);
        Ok(id)
    }

    async fn update(&self, id: &str, record: &TradeRecord) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let slot = inner
            .records
            .iter_mut()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut stored = record.clone();
        stored.id = Some(id.to_string());
        *slot = stored;
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.records.len();
        inner.records.retain(|r| r.id.as_deref() != Some(id));
        if inner.records.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

//! In-memory [`ProducerStore`] implementation.
//!
//! [`MemoryProducerStore`] keeps rows in a `BTreeMap` behind a
//! `parking_lot::RwLock` and hands out ids from a counter, mirroring a
//! `SERIAL` column. Useful for tests and for running the API without a
//! database. Nothing survives a restart.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use agro_core::{DashboardStats, NewProducer, Producer};
use parking_lot::RwLock;

use crate::traits::{ProducerStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i32, Producer>,
    last_id: i32,
}

/// Process-local producer table.
///
/// Locks are held only for the duration of a single operation and never
/// across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryProducerStore {
    table: RwLock<Table>,
    unavailable: AtomicBool,
}

impl MemoryProducerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`]
    /// (or succeed again when `false`). Used to exercise failure paths.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    /// Whether the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.read().rows.is_empty()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::Relaxed) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProducerStore for MemoryProducerStore {
    async fn list_all(&self) -> StoreResult<Vec<Producer>> {
        self.check_available()?;
        Ok(self.table.read().rows.values().cloned().collect())
    }

    async fn find(&self, id: i32) -> StoreResult<Option<Producer>> {
        self.check_available()?;
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn create(&self, producer: &NewProducer) -> StoreResult<Producer> {
        self.check_available()?;
        let mut table = self.table.write();
        table.last_id += 1;
        let created = producer.clone().with_id(table.last_id);
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, producer: &NewProducer) -> StoreResult<Option<Producer>> {
        self.check_available()?;
        let mut table = self.table.write();
        Ok(table.rows.get_mut(&id).map(|row| {
            *row = producer.clone().with_id(id);
            row.clone()
        }))
    }

    async fn delete(&self, id: i32) -> StoreResult<Option<Producer>> {
        self.check_available()?;
        Ok(self.table.write().rows.remove(&id))
    }

    async fn aggregate(&self) -> StoreResult<DashboardStats> {
        self.check_available()?;
        let table = self.table.read();
        Ok(DashboardStats {
            total_farms: i64::try_from(table.rows.len()).unwrap_or(i64::MAX),
            total_area: table.rows.values().map(|p| p.total_area).sum(),
        })
    }

    async fn initialize(&self) -> StoreResult<()> {
        self.check_available()
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_available()
    }

    async fn close(&self) {
        // Nothing to release: rows live as long as the store.
    }
}

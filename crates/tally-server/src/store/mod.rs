//! Counter store backends.
//!
//! A store maps `(year, month, department, issue_type)` to a count. Rows are
//! created only by `increment`; `reset` zeroes an existing row and never
//! creates one. Both mutations return the whole month after the write.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use tally_core::{CounterKey, MonthCounts, Period, Result};

use crate::config::{StoreBackend, StoreSection};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Backend name for logs and metrics.
    fn backend(&self) -> &'static str;

    /// All rows of the period as a nested mapping.
    async fn month(&self, period: Period) -> Result<MonthCounts>;

    /// Add one to the counter, creating it at 1, then re-read its month.
    async fn increment(&self, key: CounterKey) -> Result<MonthCounts>;

    /// Set an existing counter to 0, then re-read its month.
    async fn reset(&self, key: CounterKey) -> Result<MonthCounts>;

    /// Cheap liveness probe of the backing storage.
    async fn ping(&self) -> Result<()>;

    /// Release the backing storage. Later calls fail with a store error.
    async fn close(&self) -> Result<()>;
}

/// Open the backend selected in config.
pub async fn open(cfg: &StoreSection) -> Result<Arc<dyn CounterStore>> {
    match cfg.backend {
        StoreBackend::Sqlite => {
            let store = SqliteStore::open(cfg.path.clone()).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

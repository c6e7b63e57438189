//! In-process counter store backed by `DashMap`.
//!
//! Counts live only as long as the process. Updates to one key are atomic
//! under the map's shard lock.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use tally_core::error::{Result, TallyError};
use tally_core::{CounterKey, MonthCounts, Period};

use super::CounterStore;

#[derive(Default)]
pub struct MemoryStore {
    counts: DashMap<CounterKey, u64>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TallyError::Store("store closed".into()));
        }
        Ok(())
    }

    fn read_month(&self, period: Period) -> MonthCounts {
        self.counts
            .iter()
            .filter(|e| e.key().period == period)
            .map(|e| {
                let k = e.key();
                (
                    k.department.as_str().to_string(),
                    k.issue_type.as_str().to_string(),
                    *e.value(),
                )
            })
            .collect()
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn month(&self, period: Period) -> Result<MonthCounts> {
        self.ensure_open()?;
        Ok(self.read_month(period))
    }

    async fn increment(&self, key: CounterKey) -> Result<MonthCounts> {
        self.ensure_open()?;
        let period = key.period;
        let count = {
            let mut entry = self.counts.entry(key).or_insert(0);
            *entry += 1;
            *entry
        };
        tracing::debug!(%period, count, "counter incremented");
        Ok(self.read_month(period))
    }

    async fn reset(&self, key: CounterKey) -> Result<MonthCounts> {
        self.ensure_open()?;
        let period = key.period;
        let existed = match self.counts.get_mut(&key) {
            Some(mut count) => {
                *count = 0;
                true
            }
            None => false,
        };
        tracing::debug!(%period, existed, "counter reset");
        Ok(self.read_month(period))
    }

    async fn ping(&self) -> Result<()> {
        self.ensure_open()
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

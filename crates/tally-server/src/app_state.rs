//! Shared application state for the tally server.
//!
//! Built once at startup from explicitly constructed parts and cloned into
//! every handler. Nothing here is global.

use std::sync::Arc;
use std::time::Instant;

use tally_core::error::Result;
use tally_core::{Catalog, CounterKey, MonthCounts, Period};

use crate::clock::{Clock, SystemClock};
use crate::config::TallyConfig;
use crate::obs::TallyMetrics;
use crate::store::{self, CounterStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: TallyConfig,
    catalog: Catalog,
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
    metrics: TallyMetrics,
}

impl AppState {
    /// Open the configured store and use the system clock.
    pub async fn open(cfg: TallyConfig) -> Result<Self> {
        let store = store::open(&cfg.store).await?;
        Self::with_parts(cfg, store, Arc::new(SystemClock))
    }

    pub fn with_parts(
        cfg: TallyConfig,
        store: Arc<dyn CounterStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let catalog = cfg.catalog.compile()?;

        tracing::info!(
            backend = store.backend(),
            departments = catalog.departments().len(),
            issue_types = catalog.issue_types().len(),
            "application state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                catalog,
                store,
                clock,
                metrics: TallyMetrics::default(),
            }),
        })
    }

    pub fn cfg(&self) -> &TallyConfig {
        &self.inner.cfg
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    pub fn store(&self) -> Arc<dyn CounterStore> {
        Arc::clone(&self.inner.store)
    }

    pub fn metrics(&self) -> &TallyMetrics {
        &self.inner.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    /// Month the server is currently in.
    pub fn current_period(&self) -> Result<Period> {
        self.inner.clock.current_period()
    }

    /// Validate client-supplied names into a key for the current month.
    pub fn current_key(&self, department: &str, issue_type: &str) -> Result<CounterKey> {
        let department = self.inner.catalog.department(department)?;
        let issue_type = self.inner.catalog.issue_type(issue_type)?;
        Ok(CounterKey::new(self.current_period()?, department, issue_type))
    }

    pub async fn month(&self, period: Period) -> Result<MonthCounts> {
        let store = self.store();
        self.timed("month", store.month(period)).await
    }

    pub async fn increment(&self, key: CounterKey) -> Result<MonthCounts> {
        let store = self.store();
        let out = self.timed("increment", store.increment(key)).await?;
        self.inner.metrics.counter_ops.inc(&[("op", "increment")]);
        Ok(out)
    }

    pub async fn reset(&self, key: CounterKey) -> Result<MonthCounts> {
        let store = self.store();
        let out = self.timed("reset", store.reset(key)).await?;
        self.inner.metrics.counter_ops.inc(&[("op", "reset")]);
        Ok(out)
    }

    async fn timed<T>(
        &self,
        op: &'static str,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        let started = Instant::now();
        let res = fut.await;
        let m = &self.inner.metrics;
        m.store_duration.observe(&[("op", op)], started.elapsed());
        if let Err(e) = &res {
            m.store_errors.inc(&[("op", op)]);
            tracing::error!(op, error = %e, "store operation failed");
        }
        res
    }

    /// Close the store. Called once the server has stopped accepting requests.
    pub async fn shutdown(&self) -> Result<()> {
        self.set_draining();
        self.inner.store.close().await
    }
}

//! SQLite-backed counter store.
//!
//! One connection guarded by a mutex. Every call runs on the blocking pool so
//! SQLite I/O never stalls the async workers. Mutations and the month re-read
//! share one transaction, so the returned mapping always includes the write.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection};

use tally_core::error::{Result, TallyError};
use tally_core::{CounterKey, MonthCounts, Period};

use super::CounterStore;

/// SQL schema for the counter table.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS issues (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL,
    department TEXT NOT NULL,
    issue_type TEXT NOT NULL,
    count INTEGER NOT NULL DEFAULT 0,
    UNIQUE(year, month, department, issue_type)
);

CREATE INDEX IF NOT EXISTS idx_issues_period ON issues(year, month);
"#;

const SELECT_MONTH: &str =
    "SELECT department, issue_type, count FROM issues WHERE year = ?1 AND month = ?2";

const UPSERT_INCREMENT: &str = "INSERT INTO issues (year, month, department, issue_type, count)
     VALUES (?1, ?2, ?3, ?4, 1)
     ON CONFLICT(year, month, department, issue_type) DO UPDATE SET count = count + 1";

const RESET: &str = "UPDATE issues SET count = 0
     WHERE year = ?1 AND month = ?2 AND department = ?3 AND issue_type = ?4";

pub struct SqliteStore {
    conn: Arc<Mutex<Option<Connection>>>,
    location: String,
}

impl SqliteStore {
    /// Open (creating and migrating if needed) the database at `path`.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let location = path.display().to_string();
        let conn = tokio::task::spawn_blocking(move || open_file(&path))
            .await
            .map_err(|e| TallyError::Internal(format!("blocking task failed: {e}")))??;

        tracing::info!(path = %location, "sqlite store opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            location,
        })
    }

    /// Open a private in-memory database (tests, ephemeral runs).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| store_err("open", e))?;
        conn.execute_batch(SCHEMA).map_err(|e| store_err("migrate", e))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            location: ":memory:".into(),
        })
    }

    async fn with_conn<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            // Poisoned mutex means a previous call panicked mid-write; report, don't panic.
            let mut guard = conn
                .lock()
                .map_err(|_| TallyError::Store("connection mutex poisoned".into()))?;
            let c = guard
                .as_mut()
                .ok_or_else(|| TallyError::Store("store closed".into()))?;
            f(c).map_err(|e| store_err(op, e))
        })
        .await
        .map_err(|e| TallyError::Internal(format!("blocking task failed: {e}")))?
    }
}

fn open_file(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TallyError::Store(format!("create {} failed: {e}", parent.display()))
            })?;
        }
    }

    let conn = Connection::open(path).map_err(|e| store_err("open", e))?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = 5000;",
    )
    .map_err(|e| store_err("pragma", e))?;
    conn.execute_batch(SCHEMA).map_err(|e| store_err("migrate", e))?;
    Ok(conn)
}

fn store_err(op: &str, e: rusqlite::Error) -> TallyError {
    tracing::error!(op, error = %e, "sqlite call failed");
    TallyError::Store(e.to_string())
}

fn read_month(conn: &Connection, period: Period) -> rusqlite::Result<MonthCounts> {
    let mut stmt = conn.prepare_cached(SELECT_MONTH)?;
    let rows = stmt.query_map(params![period.year(), period.month()], |row| {
        let department: String = row.get(0)?;
        let issue_type: String = row.get(1)?;
        let count: i64 = row.get(2)?;
        let count = u64::try_from(count).map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Integer,
                Box::new(TallyError::Store(format!(
                    "negative count {count} for {department}/{issue_type}"
                ))),
            )
        })?;
        Ok((department, issue_type, count))
    })?;
    rows.collect()
}

#[async_trait]
impl CounterStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn month(&self, period: Period) -> Result<MonthCounts> {
        self.with_conn("month", move |c| read_month(c, period)).await
    }

    async fn increment(&self, key: CounterKey) -> Result<MonthCounts> {
        self.with_conn("increment", move |c| {
            let tx = c.transaction()?;
            tx.execute(
                UPSERT_INCREMENT,
                params![
                    key.period.year(),
                    key.period.month(),
                    key.department.as_str(),
                    key.issue_type.as_str()
                ],
            )?;
            let counts = read_month(&tx, key.period)?;
            tx.commit()?;
            tracing::debug!(
                period = %key.period,
                department = %key.department,
                issue_type = %key.issue_type,
                count = counts.get(key.department.as_str(), key.issue_type.as_str()),
                "counter incremented"
            );
            Ok(counts)
        })
        .await
    }

    async fn reset(&self, key: CounterKey) -> Result<MonthCounts> {
        self.with_conn("reset", move |c| {
            let tx = c.transaction()?;
            let changed = tx.execute(
                RESET,
                params![
                    key.period.year(),
                    key.period.month(),
                    key.department.as_str(),
                    key.issue_type.as_str()
                ],
            )?;
            let counts = read_month(&tx, key.period)?;
            tx.commit()?;
            tracing::debug!(
                period = %key.period,
                department = %key.department,
                issue_type = %key.issue_type,
                existed = changed > 0,
                "counter reset"
            );
            Ok(counts)
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        self.with_conn("ping", |c| c.query_row("SELECT 1", [], |r| r.get::<_, i64>(0)))
            .await
            .map(|_| ())
    }

    async fn close(&self) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        let location = self.location.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| TallyError::Store("connection mutex poisoned".into()))?;
            match guard.take() {
                Some(c) => {
                    c.close().map_err(|(_, e)| store_err("close", e))?;
                    tracing::info!(path = %location, "sqlite store closed");
                }
                None => tracing::debug!(path = %location, "sqlite store already closed"),
            }
            Ok(())
        })
        .await
        .map_err(|e| TallyError::Internal(format!("blocking task failed: {e}")))?
    }
}

//! Behaviour every counter store backend must share.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use serde_json::json;
use tally_core::{Catalog, CounterKey, Period};
use tally_server::store::{CounterStore, MemoryStore, SqliteStore};

fn catalog() -> Catalog {
    Catalog::new(
        vec!["IT".into(), "HR".into()],
        vec!["Bug".into(), "Hardware".into()],
    )
    .unwrap()
}

fn key(year: i32, month: u32, dept: &str, ty: &str) -> CounterKey {
    let c = catalog();
    CounterKey::new(
        Period::new(year, month).unwrap(),
        c.department(dept).unwrap(),
        c.issue_type(ty).unwrap(),
    )
}

fn backends() -> Vec<Arc<dyn CounterStore>> {
    let memory: Arc<dyn CounterStore> = Arc::new(MemoryStore::new());
    let sqlite: Arc<dyn CounterStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    vec![memory, sqlite]
}

#[tokio::test]
async fn increment_creates_then_counts_up() {
    for store in backends() {
        let first = store.increment(key(2024, 5, "IT", "Bug")).await.unwrap();
        assert_eq!(first.get("IT", "Bug"), 1, "backend={}", store.backend());

        let second = store.increment(key(2024, 5, "IT", "Bug")).await.unwrap();
        assert_eq!(
            serde_json::to_value(&second).unwrap(),
            json!({"IT": {"Bug": 2}}),
            "backend={}",
            store.backend()
        );
    }
}

#[tokio::test]
async fn reset_on_absent_row_creates_nothing() {
    for store in backends() {
        let after = store.reset(key(2024, 5, "IT", "Bug")).await.unwrap();
        assert!(after.is_empty(), "backend={}", store.backend());

        let month = store.month(Period::new(2024, 5).unwrap()).await.unwrap();
        assert_eq!(serde_json::to_value(&month).unwrap(), json!({}));
    }
}

#[tokio::test]
async fn reset_zeroes_existing_row_without_removing_it() {
    for store in backends() {
        store.increment(key(2024, 5, "IT", "Bug")).await.unwrap();
        store.increment(key(2024, 5, "IT", "Bug")).await.unwrap();
        store.increment(key(2024, 5, "HR", "Hardware")).await.unwrap();

        let after = store.reset(key(2024, 5, "IT", "Bug")).await.unwrap();
        assert!(after.contains("IT", "Bug"), "backend={}", store.backend());
        assert_eq!(
            serde_json::to_value(&after).unwrap(),
            json!({"IT": {"Bug": 0}, "HR": {"Hardware": 1}})
        );

        // Counting resumes from zero.
        let again = store.increment(key(2024, 5, "IT", "Bug")).await.unwrap();
        assert_eq!(again.get("IT", "Bug"), 1);
    }
}

#[tokio::test]
async fn repeated_reset_is_idempotent() {
    for store in backends() {
        store.increment(key(2024, 5, "IT", "Bug")).await.unwrap();
        let once = store.reset(key(2024, 5, "IT", "Bug")).await.unwrap();
        let twice = store.reset(key(2024, 5, "IT", "Bug")).await.unwrap();
        assert_eq!(once, twice, "backend={}", store.backend());
    }
}

#[tokio::test]
async fn month_never_leaks_other_periods() {
    for store in backends() {
        store.increment(key(2024, 5, "IT", "Bug")).await.unwrap();
        store.increment(key(2024, 6, "HR", "Hardware")).await.unwrap();
        store.increment(key(2023, 5, "HR", "Bug")).await.unwrap();

        let may = store.month(Period::new(2024, 5).unwrap()).await.unwrap();
        assert_eq!(serde_json::to_value(&may).unwrap(), json!({"IT": {"Bug": 1}}));

        let april = store.month(Period::new(2024, 4).unwrap()).await.unwrap();
        assert!(april.is_empty(), "backend={}", store.backend());

        // The mutation response only carries its own month too.
        let june = store.increment(key(2024, 6, "IT", "Bug")).await.unwrap();
        assert!(!june.contains("IT", "Hardware"));
        assert_eq!(june.rows(), 2);
        assert_eq!(june.get("HR", "Bug"), 0);
    }
}

#[tokio::test]
async fn concurrent_increments_are_not_lost() {
    for store in backends() {
        let mut tasks = Vec::new();
        for _ in 0..50 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.increment(key(2024, 5, "IT", "Bug")).await.unwrap();
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        let month = store.month(Period::new(2024, 5).unwrap()).await.unwrap();
        assert_eq!(month.get("IT", "Bug"), 50, "backend={}", store.backend());
    }
}

#[tokio::test]
async fn closed_store_reports_store_errors() {
    for store in backends() {
        store.ping().await.unwrap();
        store.close().await.unwrap();
        // Closing again is harmless.
        store.close().await.unwrap();

        let err = store
            .month(Period::new(2024, 5).unwrap())
            .await
            .expect_err("closed store must fail");
        assert_eq!(err.client_code().as_str(), "STORE", "backend={}", store.backend());
        assert!(store.ping().await.is_err());
    }
}

#[tokio::test]
async fn sqlite_file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("database.db");

    let store = SqliteStore::open(path.clone()).await.unwrap();
    store.increment(key(2024, 5, "IT", "Bug")).await.unwrap();
    store.increment(key(2024, 5, "IT", "Bug")).await.unwrap();
    store.close().await.unwrap();

    let reopened = SqliteStore::open(path).await.unwrap();
    let month = reopened.month(Period::new(2024, 5).unwrap()).await.unwrap();
    assert_eq!(month.get("IT", "Bug"), 2);
    reopened.close().await.unwrap();
}

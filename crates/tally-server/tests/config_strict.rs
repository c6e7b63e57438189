#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tally_server::config::{self, StoreBackend};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:3001"
  statik_dir: "frontend" # typo should fail
catalog:
  departments: ["IT"]
  issue_types: ["Bug"]
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
catalog:
  departments: ["IT", "HR"]
  issue_types: ["Bug"]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:3001");
    assert!(cfg.server.static_dir.is_none());
    assert_eq!(cfg.store.backend, StoreBackend::Sqlite);
    assert_eq!(cfg.store.path, PathBuf::from("data/database.db"));
    assert_eq!(cfg.catalog.departments, ["IT", "HR"]);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
server:
  listen: "127.0.0.1:8080"
  static_dir: "frontend/dist"
store:
  backend: memory
catalog:
  departments: ["IT"]
  issue_types: ["Bug", "Hardware"]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.store.backend, StoreBackend::Memory);
    assert_eq!(cfg.server.static_dir, Some(PathBuf::from("frontend/dist")));
}

#[test]
fn rejects_unsupported_version() {
    let bad = r#"
version: 2
catalog:
  departments: ["IT"]
  issue_types: ["Bug"]
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("version"));
}

#[test]
fn rejects_missing_or_empty_catalog() {
    let missing = "version: 1\n";
    assert!(config::load_from_str(missing).is_err());

    let empty = r#"
version: 1
catalog:
  departments: []
  issue_types: ["Bug"]
"#;
    let err = config::load_from_str(empty).expect_err("must fail");
    assert!(err.to_string().contains("catalog.departments"));
}

#[test]
fn rejects_unknown_backend_and_bad_listen() {
    let bad_backend = r#"
version: 1
store:
  backend: postgres
catalog:
  departments: ["IT"]
  issue_types: ["Bug"]
"#;
    assert!(config::load_from_str(bad_backend).is_err());

    let bad_listen = r#"
version: 1
server:
  listen: "not-an-address"
catalog:
  departments: ["IT"]
  issue_types: ["Bug"]
"#;
    assert!(config::load_from_str(bad_listen).is_err());
}

#[test]
fn port_override_keeps_host() {
    let mut cfg = config::load_from_str(
        r#"
version: 1
server:
  listen: "127.0.0.1:3001"
catalog:
  departments: ["IT"]
  issue_types: ["Bug"]
"#,
    )
    .unwrap();
    cfg.server.override_port(9090).unwrap();
    assert_eq!(cfg.server.listen, "127.0.0.1:9090");
}

#[test]
fn load_from_file_reads_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.yaml");
    std::fs::write(
        &path,
        "version: 1\ncatalog:\n  departments: [\"IT\"]\n  issue_types: [\"Bug\"]\n",
    )
    .unwrap();

    let cfg = config::load_from_file(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.catalog.issue_types, ["Bug"]);

    let err = config::load_from_file("/definitely/not/here.yaml").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INTERNAL");
}

// Environment variables are process-wide; tests touching them take this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("custom.yaml");
    std::fs::write(
        &path,
        "version: 1\nserver:\n  listen: \"127.0.0.1:3001\"\ncatalog:\n  departments: [\"Ops\"]\n  issue_types: [\"Outage\"]\n",
    )
    .unwrap();
    path
}

#[test]
fn env_config_path_is_honored() {
    let _guard = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path());
    std::env::set_var(config::CONFIG_PATH_ENV, &path);
    std::env::remove_var("PORT");

    let cfg = config::load_from_env();
    std::env::remove_var(config::CONFIG_PATH_ENV);

    let cfg = cfg.expect("must load");
    assert_eq!(cfg.catalog.departments, ["Ops"]);
    assert_eq!(cfg.server.listen, "127.0.0.1:3001");
}

#[test]
fn env_port_rewrites_listen() {
    let _guard = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path());
    std::env::set_var(config::CONFIG_PATH_ENV, &path);
    std::env::set_var("PORT", "9090");

    let cfg = config::load_from_env();
    std::env::remove_var(config::CONFIG_PATH_ENV);
    std::env::remove_var("PORT");

    assert_eq!(cfg.expect("must load").server.listen, "127.0.0.1:9090");
}

#[test]
fn env_port_must_be_numeric() {
    let _guard = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path());
    std::env::set_var(config::CONFIG_PATH_ENV, &path);
    std::env::set_var("PORT", "abc");

    let res = config::load_from_env();
    std::env::remove_var(config::CONFIG_PATH_ENV);
    std::env::remove_var("PORT");

    let err = res.expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    assert!(err.to_string().contains("PORT"));
}

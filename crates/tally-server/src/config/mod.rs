//! Server config loader (strict parsing).

pub mod schema;

use std::{env, fs};

use tally_core::error::{Result, TallyError};

pub use schema::{CatalogSection, ServerSection, StoreBackend, StoreSection, TallyConfig};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "TALLY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "tally.yaml";

pub fn load_from_file(path: &str) -> Result<TallyConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TallyError::Internal(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<TallyConfig> {
    let cfg: TallyConfig = serde_yaml::from_str(s)
        .map_err(|e| TallyError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load from `TALLY_CONFIG` (or `tally.yaml`), then apply the `PORT` override.
pub fn load_from_env() -> Result<TallyConfig> {
    let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| {
        tracing::info!("{CONFIG_PATH_ENV} not set, using default: {DEFAULT_CONFIG_PATH}");
        DEFAULT_CONFIG_PATH.to_string()
    });
    let mut cfg = load_from_file(&path)?;

    if let Ok(port) = env::var("PORT") {
        let port: u16 = port
            .parse()
            .map_err(|e| TallyError::BadRequest(format!("invalid PORT value {port:?}: {e}")))?;
        cfg.server.override_port(port)?;
        tracing::info!(port, "listen port overridden by PORT");
    }

    Ok(cfg)
}

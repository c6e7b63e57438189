use std::path::PathBuf;

use serde::Deserialize;
use tally_core::error::{Result, TallyError};
use tally_core::Catalog;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TallyConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreSection,

    pub catalog: CatalogSection,
}

impl TallyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TallyError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.store.validate()?;
        self.catalog.compile()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Directory holding the built client application.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            static_dir: None,
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen
            .parse::<std::net::SocketAddr>()
            .map_err(|e| TallyError::BadRequest(format!("server.listen is not a socket address: {e}")))?;
        if let Some(dir) = &self.static_dir {
            if dir.as_os_str().is_empty() {
                return Err(TallyError::BadRequest("server.static_dir must not be empty".into()));
            }
        }
        Ok(())
    }

    /// Replace the port of `listen`, keeping the host.
    pub fn override_port(&mut self, port: u16) -> Result<()> {
        let mut addr: std::net::SocketAddr = self
            .listen
            .parse()
            .map_err(|e| TallyError::BadRequest(format!("server.listen is not a socket address: {e}")))?;
        addr.set_port(port);
        self.listen = addr.to_string();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        if self.backend == StoreBackend::Sqlite && self.path.as_os_str().is_empty() {
            return Err(TallyError::BadRequest(
                "store.path is required for the sqlite backend".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSection {
    pub departments: Vec<String>,
    pub issue_types: Vec<String>,
}

impl CatalogSection {
    pub fn compile(&self) -> Result<Catalog> {
        Catalog::new(self.departments.clone(), self.issue_types.clone())
    }
}

fn default_listen() -> String {
    "0.0.0.0:3001".into()
}
fn default_store_path() -> PathBuf {
    PathBuf::from("data/database.db")
}

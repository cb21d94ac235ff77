//! Data models for the report facade configuration.

use indexmap::IndexMap;
use ktl_reports_engine::{EngineCommand, ProcessEngine};
use ktl_reports_registry::ReportCatalog;
use ktl_reports_types::{DEFAULT_CATALOG_DIR, DEFAULT_REPORT_PREFIX};
use ktl_reports_util::resolve_against;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::bridge::ReportBridge;

/// Top-level configuration for the report facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ReportsConfig {
    /// Facade root. The engine always runs here. Defaults to the current directory.
    pub root: Option<PathBuf>,
    /// Directory holding `<prefix><name>` report directories; relative paths are resolved against `root`.
    pub catalog_root: PathBuf,
    /// Literal prefix marking report directories.
    pub prefix: String,
    /// How the external pipeline engine is launched.
    pub engine: EngineConfig,
    /// Streamable HTTP transport settings.
    pub http_server: HttpServerConfig,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            root: None,
            catalog_root: PathBuf::from(DEFAULT_CATALOG_DIR),
            prefix: DEFAULT_REPORT_PREFIX.to_string(),
            engine: EngineConfig::default(),
            http_server: HttpServerConfig::default(),
        }
    }
}

/// External engine launch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct EngineConfig {
    /// Program to execute.
    pub program: String,
    /// Arguments placed before the engine sub-command.
    pub args: Vec<String>,
    /// Extra environment variables for every engine process.
    pub env: IndexMap<String, String>,
    /// Wall-clock limit per engine execution. Omitted means no limit.
    pub timeout_secs: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let command = EngineCommand::default();
        Self {
            program: command.program().to_string(),
            args: command.leading_args().to_vec(),
            env: IndexMap::new(),
            timeout_secs: None,
        }
    }
}

impl EngineConfig {
    pub fn command(&self) -> EngineCommand {
        EngineCommand::new(self.program.clone())
            .with_args(self.args.iter().cloned())
            .with_env(self.env.iter().map(|(key, value)| (key.clone(), value.clone())))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Settings for the local streamable HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct HttpServerConfig {
    /// Loopback socket address, for example "127.0.0.1:62890". Port 0 picks a free port.
    pub bind_address: SocketAddr,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        }
    }
}

impl ReportsConfig {
    /// The facade root: the configured `root`, or the current directory.
    pub fn facade_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// Catalog root resolved against the facade root.
    pub fn catalog_root_in(&self, facade_root: &Path) -> PathBuf {
        resolve_against(facade_root, &self.catalog_root)
    }

    /// Wire the catalog and the process engine into a bridge.
    pub fn build_bridge(&self) -> Result<ReportBridge, ConfigError> {
        let facade_root = self.facade_root()?;
        let catalog = ReportCatalog::new(self.catalog_root_in(&facade_root), self.prefix.clone());
        let engine = ProcessEngine::new(self.engine.command(), facade_root).with_timeout(self.engine.timeout());
        Ok(ReportBridge::new(catalog, Arc::new(engine)))
    }
}

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] crate::config::ValidationError),
}

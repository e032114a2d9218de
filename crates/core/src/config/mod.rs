//! Client configuration and on-disk layout.
//!
//! A client root holds:
//! - `.zcall/config.json`: serialized [`ClientConfig`].
//! - `.zcall/objects.db`: the SQLite object store.

mod layout;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Z_STRING;
use crate::pipeline::SupportedTypes;
use crate::registry::ObjectStore;

pub use layout::ClientLayout;

/// Default time limit for one function call.
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 10_000;

/// Object store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the store file (typically relative to the client root).
    pub path: String,
}

impl StoreConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_supported_types() -> Vec<String> {
    vec![Z_STRING.to_string()]
}

fn default_call_timeout_ms() -> Option<u64> {
    Some(DEFAULT_CALL_TIMEOUT_MS)
}

/// Serializable client configuration, stored at `.zcall/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Human-friendly client name.
    pub name: String,
    /// Config format version.
    pub config_version: String,
    /// When false, the host must not run function calls at all.
    #[serde(default = "default_enabled")]
    pub enable_parser_function: bool,
    /// Type ZIDs functions may take and return.
    #[serde(default = "default_supported_types")]
    pub supported_types: Vec<String>,
    /// Per-call time limit in milliseconds; `null` or `0` disables it.
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: Option<u64>,
    pub store: StoreConfig,
}

impl ClientConfig {
    /// Create a configuration with defaults using the given name and store path.
    pub fn new(name: impl Into<String>, store_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config_version: "0.1.0".to_string(),
            enable_parser_function: default_enabled(),
            supported_types: default_supported_types(),
            call_timeout_ms: default_call_timeout_ms(),
            store: StoreConfig::new(store_path),
        }
    }

    pub fn supported_types(&self) -> SupportedTypes {
        self.supported_types.iter().cloned().collect()
    }

    /// Configured limit; `null` and `0` both mean no limit.
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.filter(|ms| *ms > 0).map(Duration::from_millis)
    }
}

/// Load the client config JSON from disk for a given layout.
pub fn load_client_config(layout: &ClientLayout) -> Result<ClientConfig> {
    let config_json = std::fs::read_to_string(&layout.config_path).with_context(|| {
        format!("Failed to read client config at {}", layout.config_path.display())
    })?;
    let config: ClientConfig =
        serde_json::from_str(&config_json).context("Failed to parse client config JSON")?;
    Ok(config)
}

/// Resolve the store path (respecting relative/absolute config) and open it.
pub fn open_object_store(layout: &ClientLayout) -> Result<(ClientConfig, PathBuf, ObjectStore)> {
    let config = load_client_config(layout)?;
    let config_store_path = Path::new(&config.store.path);
    let store_path = if config_store_path.is_absolute() {
        config_store_path.to_path_buf()
    } else {
        layout.root.join(config_store_path)
    };
    let store = ObjectStore::open(&store_path)
        .with_context(|| format!("Failed to open object store at {}", store_path.display()))?;
    Ok((config, store_path, store))
}

/// Layout, config, store path, and an open store for one client root.
#[derive(Debug)]
pub struct ClientContext {
    pub layout: ClientLayout,
    pub config: ClientConfig,
    pub store_path: PathBuf,
    pub store: ObjectStore,
}

impl ClientContext {
    /// Load the client config and open the object store for a given root.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let layout = ClientLayout::new(root);
        let (config, store_path, store) = open_object_store(&layout)?;
        Ok(Self { layout, config, store_path, store })
    }
}

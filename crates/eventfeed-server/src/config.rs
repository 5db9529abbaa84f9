//! Service configuration.
//!
//! The configuration lives in a TOML file:
//!
//! ```toml
//! default_tz = "America/Los_Angeles"
//!
//! [meetup_groups]
//! rust-la = "https://www.meetup.com/rust-la/events/"
//!
//! [fetch]
//! timeout_secs = 12
//!
//! [[event_config]]
//! key = "default"
//! reminder = false
//!
//! [[event_config]]
//! key = "Hack Night"
//! thread_id = 1234567890
//! reminder = true
//! ```
//!
//! Override rules are an array of tables so their declaration order, which
//! decides the first match, survives parsing.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use eventfeed_core::EventConfig;
use eventfeed_providers::FetchSettings;
use eventfeed_providers::fetch::{DEFAULT_MAX_BYTES, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

use crate::error::{ServerError, ServerResult};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Default zone used when a request names none.
pub const DEFAULT_TZ: &str = "America/Los_Angeles";

/// One parsed configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Zone used when the request has no `tz`.
    pub default_tz: String,
    /// Group name to event page URL.
    pub meetup_groups: BTreeMap<String, String>,
    /// Ordered override rules.
    pub event_config: EventConfig,
    /// Page fetch settings.
    pub fetch: FetchConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_tz: DEFAULT_TZ.to_string(),
            meetup_groups: BTreeMap::new(),
            event_config: EventConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ServerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                ServerError::config(format!("Config file not found: {}", path.display()))
            }
            _ => ServerError::config(format!(
                "Failed to load config {}: {}",
                path.display(),
                e
            )),
        })?;
        toml::from_str(&content).map_err(|e| {
            ServerError::config(format!(
                "Failed to load config {}: {}",
                path.display(),
                e.message()
            ))
        })
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> ServerResult<Self> {
        toml::from_str(content).map_err(|e| ServerError::config(e.message().to_string()))
    }

    /// Builder: set the default zone.
    pub fn with_default_tz(mut self, tz: impl Into<String>) -> Self {
        self.default_tz = tz.into();
        self
    }

    /// Builder: add a group.
    pub fn with_group(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.meetup_groups.insert(name.into(), url.into());
        self
    }

    /// Builder: set the override rules.
    pub fn with_event_config(mut self, event_config: EventConfig) -> Self {
        self.event_config = event_config;
        self
    }
}

/// The `[fetch]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Response size cap in bytes.
    pub max_bytes: u64,
    /// User-Agent header sent upstream.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_bytes: DEFAULT_MAX_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Converts to fetcher settings.
    pub fn to_settings(&self) -> FetchSettings {
        FetchSettings::default()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_max_bytes(self.max_bytes)
            .with_user_agent(self.user_agent.clone())
    }
}

/// Hands out configuration snapshots to requests.
///
/// With reloading off, every request shares the snapshot loaded at startup.
/// With reloading on, each call re-reads the file; a failed reload is an
/// error for that request and the previous snapshot is kept.
#[derive(Debug)]
pub struct ConfigSource {
    path: Option<PathBuf>,
    reload_each_request: bool,
    current: RwLock<Arc<ServiceConfig>>,
}

impl ConfigSource {
    /// Loads the file at `path`. Fails if it is missing or malformed.
    pub fn load(path: impl Into<PathBuf>, reload_each_request: bool) -> ServerResult<Self> {
        let path = path.into();
        let config = ServiceConfig::load_from(&path)?;
        debug!(
            path = %path.display(),
            groups = config.meetup_groups.len(),
            rules = config.event_config.len(),
            "Loaded configuration"
        );
        Ok(Self {
            path: Some(path),
            reload_each_request,
            current: RwLock::new(Arc::new(config)),
        })
    }

    /// Wraps an in-memory configuration that never reloads.
    pub fn fixed(config: ServiceConfig) -> Self {
        Self {
            path: None,
            reload_each_request: false,
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Returns whether each snapshot re-reads the file.
    pub fn reloads_each_request(&self) -> bool {
        self.reload_each_request
    }

    /// Returns the configuration for one request.
    pub fn snapshot(&self) -> ServerResult<Arc<ServiceConfig>> {
        match self.path.as_deref() {
            Some(path) if self.reload_each_request => {
                let fresh = ServiceConfig::load_from(path).map(Arc::new).inspect_err(|e| {
                    warn!(path = %path.display(), error = %e, "Config reload failed");
                })?;
                let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
                *current = Arc::clone(&fresh);
                Ok(fresh)
            }
            _ => {
                let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
                Ok(Arc::clone(&current))
            }
        }
    }
}

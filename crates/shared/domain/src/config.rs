use crate::constants::WORLD_NAME;
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level navigator configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavigatorConfigInner {
    pub service: ServiceConfig,
    pub navigation: NavigationConfig,
    pub log: LogConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct NavigatorConfig {
    #[serde(flatten, default)]
    inner: Arc<NavigatorConfigInner>,
}

impl Deref for NavigatorConfig {
    type Target = NavigatorConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for NavigatorConfig {
    fn deref_mut(&mut self) -> &mut NavigatorConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Region service endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Per-request timeout; `0` disables it.
    pub timeout_seconds: u64,
}

/// Session behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Hierarchy selected at session start; the first enumerated one when unset.
    pub default_hierarchy: Option<u64>,
    /// Upper bound for an ancestor lookup before the previous trail is kept; `0` waits forever.
    pub lookup_timeout_ms: u64,
    /// Label of the synthetic root crumb.
    pub root_name: String,
}

/// Logging outputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// Extra filter directives, e.g. `geonav_region_client=trace`.
    pub directives: Vec<String>,
    pub console: bool,
    /// Rolling file output is enabled when set.
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:3000".to_owned(), timeout_seconds: 10 }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { default_hierarchy: None, lookup_timeout_ms: 15_000, root_name: WORLD_NAME.to_owned() }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            directives: Vec::new(),
            console: true,
            directory: None,
            json: false,
        }
    }
}

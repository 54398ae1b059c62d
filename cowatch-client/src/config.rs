//! Configuration loading and resolution
//!
//! Resolution priority order:
//! 1. Explicit path from the embedder (highest priority)
//! 2. Environment variable
//! 3. Per-user TOML config file (system-wide on Linux as fallback)
//! 4. Compiled defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Environment variable naming the config file path
pub const CONFIG_PATH_ENV: &str = "COWATCH_CONFIG";

/// Behavior after the transport reconnects
///
/// The authority pushes the current queue, roster, and playback position
/// to every client on connect, so the client has nothing to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconnectPolicy {
    /// Re-assert the claimed display name, then wait for the
    /// authority's state push
    #[default]
    AwaitAuthority,
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Session input queue depth before feeders are backpressured
    pub input_capacity: usize,

    /// Update broadcast buffer depth; lagging observers lose oldest
    /// updates first
    pub update_capacity: usize,

    /// Display name to claim on first connect. None leaves the
    /// authority-assigned default standing until the user claims one.
    pub display_name: Option<String>,

    /// What to do after a reconnect
    pub reconnect: ReconnectPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            input_capacity: 64,
            update_capacity: 100,
            display_name: None,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration following the resolution priority order
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::resolve(explicit_path, find_config_file())
    }

    /// Resolution core with the platform file lookup passed in
    fn resolve(explicit_path: Option<&Path>, user_file: Option<PathBuf>) -> Result<Self> {
        // Priority 1: explicit path from the embedder
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // Priority 2: environment variable
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(Path::new(&path));
        }

        // Priority 3: per-user (or system-wide) config file
        if let Some(path) = user_file {
            return Self::from_file(&path);
        }

        // Priority 4: compiled defaults
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Parse configuration from a TOML file. Keys absent from the file
    /// keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config
            .validate()
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check bounds a parseable file can still get wrong. The session's
    /// channels cannot be zero-sized, so zero capacities are config
    /// errors, not spawn-time panics.
    fn validate(&self) -> std::result::Result<(), String> {
        if self.input_capacity == 0 {
            return Err("input_capacity must be at least 1".to_string());
        }
        if self.update_capacity == 0 {
            return Err("update_capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Find the config file for the platform, if one exists
fn find_config_file() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("cowatch").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system = PathBuf::from("/etc/cowatch/config.toml");
        if system.exists() {
            return Some(system);
        }
    }

    None
}

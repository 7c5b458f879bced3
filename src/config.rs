//! Configuration management for overmind
//!
//! The config file is process-relative (`overmind.toml` by default).
//! If it is absent at startup a default file is written with a seed
//! `allowed_agents` list; if it is present it is loaded directly, with
//! no merging of sources. Reloading the allow-list requires a fresh
//! process start.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Agent names permitted to load. Anything not listed is rejected.
    pub allowed_agents: Vec<String>,
    pub paths: PathsConfig,
    pub scanner: ScannerConfig,
    pub execution: ExecutionConfig,
    pub store: StoreConfig,
}

/// Working directory layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Untrusted candidate agent sources, scanned each load cycle
    pub agents: PathBuf,
    /// Promoted, vetted agent sources
    pub tools: PathBuf,
    /// Working area for agent-owned side effects
    pub executor: PathBuf,
}

/// Directory scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Recognized source-file extension for agent artifacts
    pub extension: String,
}

/// Execution engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Per-agent deadline in seconds
    pub timeout_secs: u64,
}

/// Result store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path the result store is persisted to
    pub path: PathBuf,
}

// Default implementations

impl Default for Config {
    fn default() -> Self {
        Self {
            allowed_agents: vec![
                "EchoAgent".to_string(),
                "ReasoningAgent".to_string(),
                "PredictionAgent".to_string(),
            ],
            paths: PathsConfig::default(),
            scanner: ScannerConfig::default(),
            execution: ExecutionConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            agents: PathBuf::from("agents"),
            tools: PathBuf::from("tools"),
            executor: PathBuf::from("executor"),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            extension: "rs".to_string(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data_store.json"),
        }
    }
}

impl Config {
    /// Load the configuration, creating a default file if none exists.
    ///
    /// A present file is loaded as-is; there is no merging with the
    /// compiled defaults beyond what serde's field defaults provide.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            let contents = toml::to_string_pretty(&config)
                .map_err(|e| ConfigError::Write(e.to_string()))?;
            std::fs::write(path, contents)
                .map_err(|e| ConfigError::Write(format!("{}: {}", path.display(), e)))?;
            info!(
                "Created default config at {:?} with allowed agents: {:?}",
                path, config.allowed_agents
            );
            return Ok(config);
        }

        debug!("Loading config from {:?}", path);
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Create the working directories if absent.
    ///
    /// Permissions are set to 0o755 on unix so only the owner can write
    /// into the agent and tool areas.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [&self.paths.agents, &self.paths.tools, &self.paths.executor] {
            std::fs::create_dir_all(dir)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755))?;
            }
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.execution.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "execution.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.scanner.extension.is_empty() {
            return Err(ConfigError::Invalid(
                "scanner.extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

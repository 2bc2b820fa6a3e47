// Configuration module for the claimlink server
//
// This module handles loading, validating, and writing the server
// configuration. A missing config file is not an error: the server runs on
// defaults so zero-configuration startup stays possible.

use crate::error::{ClaimLinkError, Result};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

/// Claimlink server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// API configuration
    pub api: ApiConfig,
    /// Upstream fetch configuration
    pub upstream: UpstreamConfig,
    /// Policy retention configuration
    pub retention: RetentionConfig,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// IP address to bind the API server to
    pub bind_address: String,

    /// Port number for the API server
    pub port: u16,

    /// Externally visible base URL embedded in issued links.
    /// Defaults to `http://localhost:{port}` when unset.
    pub public_url: Option<String>,
}

/// Upstream fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Total timeout for one outbound fetch in seconds
    pub fetch_timeout_secs: u64,
}

/// Policy retention configuration
///
/// Every limit defaults to 0, meaning disabled: policies then live for the
/// process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Policy time-to-live in seconds (0 = no expiration)
    pub policy_ttl_secs: u64,

    /// Maximum number of policies held at once (0 = unbounded)
    pub max_policies: usize,

    /// Interval between pruning passes in seconds
    pub prune_interval_secs: u64,
}

// Default values
fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_prune_interval_secs() -> u64 {
    300
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            upstream: UpstreamConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            public_url: None,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            policy_ttl_secs: 0,
            max_policies: 0,
            prune_interval_secs: default_prune_interval_secs(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file, tolerating a missing file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .build()?;

        let config: ServiceConfig = config.try_deserialize()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;

        fs::write(path, config_str)
            .map_err(|e| ClaimLinkError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Check the configuration for values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if let Some(public_url) = &self.api.public_url {
            Url::parse(public_url).map_err(|e| {
                ClaimLinkError::Config(format!("Invalid public_url '{}': {}", public_url, e))
            })?;
        }

        if self.upstream.fetch_timeout_secs == 0 {
            return Err(ClaimLinkError::Config(
                "fetch_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.retention.policy_ttl_secs > 0 && self.retention.prune_interval_secs == 0 {
            return Err(ClaimLinkError::Config(
                "prune_interval_secs must be greater than zero when policy_ttl_secs is set"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// The base URL embedded in every link the server hands out
    pub fn public_url(&self) -> String {
        match &self.api.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.api.port),
        }
    }

    /// The "IP:port" string the API server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.bind_address, self.api.port)
    }
}

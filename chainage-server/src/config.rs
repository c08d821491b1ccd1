use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use chainage_core::prelude::*;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Server settings, read from a TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
    pub chainage: ChainageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            request_timeout_secs: 10,
            concurrency_limit: 64,
            chainage: ChainageConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        let config: Self =
            toml::from_str(contents).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.concurrency_limit == 0 {
            return Err(Error::InvalidConfig(
                "concurrency_limit must be positive".to_string(),
            ));
        }
        self.chainage.validate()
    }
}

/// HTTP API for road chainage of geotagged captures
#[derive(Debug, Parser)]
#[command(name = "chainage-server", version, about)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, overrides the config file
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Snap tolerance in meters, overrides the config file
    #[arg(long)]
    pub snap_tolerance: Option<f64>,
}

impl Cli {
    pub fn load_config(&self) -> Result<ServerConfig, Error> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(tolerance) = self.snap_tolerance {
            config.chainage.snap_tolerance_meters = tolerance;
        }

        config.validate()?;
        Ok(config)
    }
}

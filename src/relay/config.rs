//! Relay process configuration, persisted to `relay_config.json`.

use crate::actions::EnvironmentConfig;
use crate::config::{self, ConfigError};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,

    /// Fallback log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Replaces the built-in persona for the configured response mode.
    #[serde(default)]
    pub persona_path: Option<PathBuf>,
    #[serde(default)]
    pub dossier_path: Option<PathBuf>,

    /// Upper bound on one model call.
    #[serde(default = "default_turn_timeout_secs")]
    pub turn_timeout_secs: u64,

    /// Pause between consecutive freeform directives.
    #[serde(default = "default_dispatch_pacing_ms")]
    pub dispatch_pacing_ms: u64,

    #[serde(default)]
    pub environment: EnvironmentConfig,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    8765
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_turn_timeout_secs() -> u64 {
    120
}

fn default_dispatch_pacing_ms() -> u64 {
    2000
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            persona_path: None,
            dossier_path: None,
            turn_timeout_secs: default_turn_timeout_secs(),
            dispatch_pacing_ms: default_dispatch_pacing_ms(),
            environment: EnvironmentConfig::default(),
        }
    }
}

impl RelayConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    pub fn dispatch_pacing(&self) -> Duration {
        Duration::from_millis(self.dispatch_pacing_ms)
    }

    /// Relative persona/dossier paths are taken from the config directory.
    pub fn resolve_paths(mut self, config_dir: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { config_dir.join(p) } else { p };
        self.persona_path = self.persona_path.map(resolve);
        self.dossier_path = self.dossier_path.map(resolve);
        self
    }
}

pub fn load_config(path: &Path) -> RelayConfig {
    config::load_json_config(path, "Relay")
}

pub fn save_config(path: &Path, config: &RelayConfig) -> Result<(), ConfigError> {
    config::save_json_config(path, config, "Relay")
}

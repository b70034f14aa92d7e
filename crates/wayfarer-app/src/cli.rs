//! CLI argument definitions for the Wayfarer server.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::{Path, PathBuf};

use wayfarer_core::config::WayfarerConfig;
use wayfarer_core::Result;

/// Wayfarer: staged autocomplete suggestions for travel booking.
#[derive(Parser, Debug, Default)]
#[command(name = "wayfarer", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Interface to bind.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > WAYFARER_CONFIG env var > ~/.wayfarer/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("WAYFARER_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the bind host.
    ///
    /// Priority: --host flag > WAYFARER_HOST env var > config file value.
    pub fn resolve_host(&self, config_host: &str) -> String {
        self.resolve_host_with(config_host, std::env::var("WAYFARER_HOST").ok())
    }

    fn resolve_host_with(&self, config_host: &str, env: Option<String>) -> String {
        if let Some(ref h) = self.host {
            return h.clone();
        }
        if let Some(h) = env.filter(|h| !h.trim().is_empty()) {
            return h;
        }
        config_host.to_string()
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > WAYFARER_PORT env var > config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        self.resolve_port_with(config_port, std::env::var("WAYFARER_PORT").ok())
    }

    fn resolve_port_with(&self, config_port: u16, env: Option<String>) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Some(p) = env.and_then(|v| v.parse::<u16>().ok()) {
            return p;
        }
        config_port
    }

    /// Load the config file at `path`, apply overrides and validate.
    ///
    /// Only a missing file falls back to defaults; an unreadable, malformed
    /// or invalid file is an error, as is an invalid override.
    pub fn load_config(&self, path: &Path) -> Result<WayfarerConfig> {
        let mut config = WayfarerConfig::load_or_default(path)?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply every override to a loaded configuration.
    pub fn apply(&self, config: &mut WayfarerConfig) {
        config.server.host = self.resolve_host(&config.server.host);
        config.server.port = self.resolve_port(config.server.port);
        if let Some(ref level) = self.log_level {
            config.server.log_level = level.clone();
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".wayfarer").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".wayfarer").join("config.toml");
    }
    PathBuf::from("config.toml")
}

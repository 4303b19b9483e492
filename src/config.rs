// src/config.rs

//! Site configuration: loading `pbs.conf`, environment overrides, and the
//! compiled-in defaults the clients fall back to.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The configuration file consulted when `PBS_CONF_FILE` is unset.
pub const DEFAULT_CONF_FILE: &str = "/etc/pbs.conf";

/// Default port of the batch service.
pub const DEFAULT_BATCH_PORT: u16 = 15001;

/// Client-side view of `pbs.conf`. Keys in the file are `NAME=value` lines;
/// environment variables of the same names override the file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PbsConfig {
    /// Default server host, used when a command names no server.
    #[serde(default = "default_server")]
    pub pbs_server: String,
    /// Port the server's batch service listens on.
    #[serde(default = "default_batch_port")]
    pub pbs_batch_service_port: u16,
    /// Root of the server's state tree; the hooks workdir lives under it.
    #[serde(default = "default_home")]
    pub pbs_home: String,
    /// Root of the installation tree.
    #[serde(default = "default_exec")]
    pub pbs_exec: String,
}

fn default_server() -> String {
    "localhost".to_string()
}
fn default_batch_port() -> u16 {
    DEFAULT_BATCH_PORT
}
fn default_home() -> String {
    "/var/spool/pbs".to_string()
}
fn default_exec() -> String {
    "/opt/pbs".to_string()
}

impl Default for PbsConfig {
    fn default() -> Self {
        PbsConfig {
            pbs_server: default_server(),
            pbs_batch_service_port: default_batch_port(),
            pbs_home: default_home(),
            pbs_exec: default_exec(),
        }
    }
}

impl PbsConfig {
    /// Loads the configuration from `PBS_CONF_FILE` (default
    /// `/etc/pbs.conf`), then applies same-named environment overrides. A
    /// missing file is not an error; the defaults stand in.
    pub fn load() -> Result<PbsConfig> {
        let path = std::env::var("PBS_CONF_FILE").unwrap_or_else(|_| DEFAULT_CONF_FILE.to_string());
        Self::from_file(&path)
    }

    /// Loads from an explicit path, primarily for tests.
    pub fn from_file(path: &str) -> Result<PbsConfig> {
        let builder = Config::builder()
            .add_source(File::new(path, FileFormat::Ini).required(false))
            .add_source(Environment::default());

        let cfg: PbsConfig = builder
            .build()
            .with_context(|| format!("Failed to read configuration from \"{path}\""))?
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in \"{path}\""))?;

        debug!(
            server = %cfg.pbs_server,
            port = cfg.pbs_batch_service_port,
            "loaded batch configuration"
        );
        Ok(cfg)
    }

    /// Resolves a `host[:port]` server spec against the configured
    /// defaults. An empty spec means the default server.
    pub fn resolve_server(&self, spec: &str) -> (String, u16) {
        let spec = spec.trim();
        if spec.is_empty() {
            return (self.pbs_server.clone(), self.pbs_batch_service_port);
        }
        match spec.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() => match port.parse::<u16>() {
                Ok(p) => (host.to_string(), p),
                Err(_) => (spec.to_string(), self.pbs_batch_service_port),
            },
            _ => (spec.to_string(), self.pbs_batch_service_port),
        }
    }

    /// The hooks staging directory shared with the server.
    pub fn hooks_workdir(&self) -> PathBuf {
        Path::new(&self.pbs_home).join("server_priv").join("hooks")
    }

    /// Spool directory used as the history-file fallback.
    pub fn spool_dir(&self) -> PathBuf {
        Path::new(&self.pbs_home).join("spool")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_server_specs() {
        let cfg = PbsConfig::default();
        assert_eq!(cfg.resolve_server(""), ("localhost".to_string(), 15001));
        assert_eq!(cfg.resolve_server("svr1"), ("svr1".to_string(), 15001));
        assert_eq!(cfg.resolve_server("svr1:1234"), ("svr1".to_string(), 1234));
        assert_eq!(
            cfg.resolve_server("svr1:notaport"),
            ("svr1:notaport".to_string(), 15001)
        );
    }
}

//! YAML configuration for the exporter.
//!
//! ```yaml
//! server:
//!   glowroot_url: "http://glowroot.internal:4000"
//!   exporter_port: 9101
//!   glowroot_time_interval_minutes: 5
//!   metrics_update_interval_seconds: 30
//! ```
//!
//! Any key can be overridden from the environment with the `GLOWWATCH_`
//! prefix and `__` between sections, e.g. `GLOWWATCH_SERVER__EXPORTER_PORT`.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

const ENV_PREFIX: &str = "GLOWWATCH";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the Glowroot central server.
    pub glowroot_url: String,
    /// Port the `/metrics` endpoint listens on, on all interfaces.
    pub exporter_port: u16,
    /// How far back each Glowroot query looks.
    pub glowroot_time_interval_minutes: u64,
    /// Pause between collection cycles.
    pub metrics_update_interval_seconds: u64,
}

impl Settings {
    /// Read and validate the configuration at `path`, applying environment
    /// overrides.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    fn load_with_env(path: &Path, env: Option<config::Map<String, String>>) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .with_context(|| format!("Failed to read config file {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Invalid config in {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.server.validate()
    }
}

impl ServerSettings {
    fn validate(&self) -> Result<()> {
        let url = self.glowroot_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!(
                "server.glowroot_url must be an http or https URL, got {:?}",
                self.glowroot_url
            );
        }
        if self.exporter_port == 0 {
            bail!("server.exporter_port must be non-zero");
        }
        if self.glowroot_time_interval_minutes == 0 {
            bail!("server.glowroot_time_interval_minutes must be at least 1");
        }
        if self.metrics_update_interval_seconds == 0 {
            bail!("server.metrics_update_interval_seconds must be at least 1");
        }
        Ok(())
    }

    pub fn time_interval(&self) -> Duration {
        Duration::from_secs(self.glowroot_time_interval_minutes.saturating_mul(60))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_update_interval_seconds)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.exporter_port)
    }
}

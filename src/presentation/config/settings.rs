use std::time::Duration;

use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub worker: WorkerSettings,
    pub packaging: PackagingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub download_base_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    pub queue_capacity: usize,
    pub max_concurrent_jobs: usize,
    pub stage_delay_ms: u64,
}

impl WorkerSettings {
    pub fn stage_delay(&self) -> Duration {
        Duration::from_millis(self.stage_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackagingSettings {
    /// gzip level for download packages, 0 (store) to 9 (best).
    pub compression_level: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Settings {
    /// Layers defaults, the optional `appsettings.{environment}` file and
    /// `APP_`-prefixed environment variables (`APP_SERVER__PORT=8080`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder(environment)?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str().to_lowercase()))
                    .required(false),
            )
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only, without reading files or the environment.
    pub fn defaults(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder(environment)?.build()?.try_deserialize()
    }

    fn builder(
        environment: Environment,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let json_logs = environment == Environment::Prod;

        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.download_base_path", "/api/download")?
            .set_default("worker.queue_capacity", 100)?
            .set_default("worker.max_concurrent_jobs", 4)?
            .set_default("worker.stage_delay_ms", 500)?
            .set_default("packaging.compression_level", 6)?
            .set_default("logging.level", "info,jobcraft=debug,tower_http=debug")?
            .set_default("logging.json", json_logs)
    }
}

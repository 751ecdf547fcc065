use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSHELF_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSHELF_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKSHELF";

/// Plain `DB_*` variables honoured on top of every other source
const LEGACY_DATABASE_VARS: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
];

/// Deployment environment the application is running in
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// prefixed variables and finally the plain `DB_*` variables
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let mut builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            );

        for (var, key) in LEGACY_DATABASE_VARS {
            let value = std::env::var(var).ok().filter(|value| !value.is_empty());
            builder = builder
                .set_override_option(*key, value)
                .with_context(|| format!("failed to apply {}", var))?;
        }

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = environment.parse()?;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Path every module router is nested under
    #[serde(default = "ServerSettings::default_api_prefix")]
    pub api_prefix: String,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }

    fn default_api_prefix() -> String {
        "/api/v1".to_string()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
            api_prefix: Self::default_api_prefix(),
        }
    }
}

/// PostgreSQL connection settings
///
/// Empty values (and a missing port) leave the corresponding option to the
/// driver, which falls back to the usual `PG*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "DatabaseSettings::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "DatabaseSettings::default_max_lifetime_secs")]
    pub max_lifetime_secs: u64,
}

impl DatabaseSettings {
    fn default_max_connections() -> u32 {
        25
    }

    fn default_max_lifetime_secs() -> u64 {
        300
    }

    /// `host:port/name` for log lines; never includes credentials
    pub fn display_target(&self) -> String {
        let host = if self.host.is_empty() {
            "<default>"
        } else {
            &self.host
        };
        match self.port {
            Some(port) => format!("{}:{}/{}", host, port, self.name),
            None => format!("{}/{}", host, self.name),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: None,
            user: String::new(),
            password: String::new(),
            name: String::new(),
            max_connections: Self::default_max_connections(),
            max_lifetime_secs: Self::default_max_lifetime_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CatalogSettings {
    #[serde(default)]
    pub projections: ProjectionSettings,
}

/// Subset of book fields a read endpoint returns
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// id, title, author
    Summary,
    /// id, title, author, isbn, year, price and both timestamps
    Listing,
    /// Every field
    Full,
}

/// Projection chosen for each catalog read endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionSettings {
    #[serde(default = "ProjectionSettings::default_list")]
    pub list: Projection,
    #[serde(default = "ProjectionSettings::default_get")]
    pub get: Projection,
    #[serde(default = "ProjectionSettings::default_full")]
    pub search: Projection,
    #[serde(default = "ProjectionSettings::default_full")]
    pub featured: Projection,
    #[serde(default = "ProjectionSettings::default_full")]
    pub new: Projection,
    #[serde(default = "ProjectionSettings::default_full")]
    pub discounted: Projection,
}

impl ProjectionSettings {
    fn default_list() -> Projection {
        Projection::Listing
    }

    fn default_get() -> Projection {
        Projection::Summary
    }

    fn default_full() -> Projection {
        Projection::Full
    }
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            list: Self::default_list(),
            get: Self::default_get(),
            search: Self::default_full(),
            featured: Self::default_full(),
            new: Self::default_full(),
            discounted: Self::default_full(),
        }
    }
}

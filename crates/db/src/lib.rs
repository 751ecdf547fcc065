//! PostgreSQL pool factory and connectivity checks

use std::time::Duration;

use anyhow::Context;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    Connection, PgPool,
};

use bookshelf_kernel::settings::DatabaseSettings;

/// Build connection options, leaving empty settings to the driver defaults
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    let mut options = PgConnectOptions::new();

    if !settings.host.is_empty() {
        options = options.host(&settings.host);
    }
    if let Some(port) = settings.port {
        options = options.port(port);
    }
    if !settings.user.is_empty() {
        options = options.username(&settings.user);
    }
    if !settings.password.is_empty() {
        options = options.password(&settings.password);
    }
    if !settings.name.is_empty() {
        options = options.database(&settings.name);
    }

    options
}

/// Pool tuning derived from settings
pub fn pool_options(settings: &DatabaseSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .max_lifetime(Duration::from_secs(settings.max_lifetime_secs))
}

/// Open the pool and verify the database answers before returning it
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    let target = settings.display_target();
    tracing::info!(target: "bookshelf-db", db = %target, "connecting to database");

    let pool = pool_options(settings)
        .connect_with(connect_options(settings))
        .await
        .with_context(|| format!("failed to open database pool for {}", target))?;

    ping(&pool)
        .await
        .with_context(|| "failed to connect to database")?;

    tracing::info!(target: "bookshelf-db", db = %target, "successfully connected to database");
    Ok(pool)
}

/// Round-trip a ping over one pooled connection
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    conn.ping().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_settings_override_driver_defaults() {
        let settings = DatabaseSettings {
            host: "db.internal".to_string(),
            port: Some(6543),
            user: "bookstore".to_string(),
            password: "secret".to_string(),
            name: "catalog".to_string(),
            ..DatabaseSettings::default()
        };

        let options = connect_options(&settings);
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "bookstore");
        assert_eq!(options.get_database(), Some("catalog"));
    }

    #[test]
    fn pool_limits_follow_settings() {
        let settings = DatabaseSettings::default();
        let options = pool_options(&settings);
        assert_eq!(options.get_max_connections(), 25);
        assert_eq!(options.get_max_lifetime(), Some(Duration::from_secs(300)));
    }
}

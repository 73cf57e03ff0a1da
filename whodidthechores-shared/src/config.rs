/// Application configuration
///
/// Sources, later ones winning:
///
/// 1. built-in defaults;
/// 2. `/etc/whodidthechores/config.{toml,yaml,json}`, if present;
/// 3. `./config.{toml,yaml,json}`, if present;
/// 4. `WDTC_*` environment variables, nested keys joined by `__`
///    (`WDTC_DATABASE__HOSTNAME=db`). A `.env` file is loaded first.
///
/// # Environment Variables
///
/// - `WDTC_PORT`: listen port, 1024 to 5000 (default: 3000)
/// - `WDTC_TIMEZONE`: IANA zone for task times and reports (default: UTC)
/// - `WDTC_DATABASE__USERNAME`, `WDTC_DATABASE__PASSWORD`,
///   `WDTC_DATABASE__HOSTNAME`: required
/// - `WDTC_DATABASE__PORT` (default: 5432), `WDTC_DATABASE__DATABASE`
///   (default: whodidthechores), `WDTC_DATABASE__SSLMODE`: `disable`,
///   `allow` or `prefer` (default: disable)
/// - `WDTC_SESSION__TTL_MINUTES` (default: 240)
/// - `WDTC_STORAGE__STATEMENT_TIMEOUT_SECONDS` (default: 10)
///
/// # Example
///
/// ```no_run
/// use whodidthechores_shared::config::AppConfig;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AppConfig::load()?;
/// println!("Listening on port {} ({})", config.port, config.time_zone());
/// # Ok(())
/// # }
/// ```

use std::fmt;
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use tracing::error;
use validator::{Validate, ValidationError};

use crate::db::pool::DatabaseConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WDTC";

const SSL_MODES: [&str; 3] = ["disable", "allow", "prefer"];

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config source error: {0}")]
    Source(#[from] config::ConfigError),

    #[error("invalid config: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Complete application configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(range(min = 1024, max = 5000, message = "application port must be between 1024 and 5000"))]
    pub port: u16,

    /// IANA time zone name; see [`AppConfig::time_zone`]
    pub timezone: String,

    #[validate(nested)]
    pub database: DbConfig,

    #[validate(nested)]
    pub session: SessionConfig,

    #[validate(nested)]
    pub storage: StorageConfig,
}

/// Database connection settings
#[derive(Clone, Deserialize, Validate)]
pub struct DbConfig {
    #[validate(length(min = 1, message = "database username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "database password is required"))]
    pub password: String,

    #[validate(length(min = 1, message = "database hostname is required"))]
    pub hostname: String,

    pub port: u16,

    #[validate(length(min = 1, message = "database name is required"))]
    pub database: String,

    #[validate(custom(function = "validate_sslmode"))]
    pub sslmode: String,

    #[validate(range(min = 1, message = "at least one connection is required"))]
    pub max_connections: u32,
}

// Keeps the password out of logs
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("sslmode", &self.sslmode)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SessionConfig {
    /// At most 366 days
    #[validate(range(
        min = 1,
        max = 527_040,
        message = "session lifetime must be between one minute and 366 days"
    ))]
    pub ttl_minutes: u64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StorageConfig {
    #[validate(range(min = 1, message = "statement timeout must be at least one second"))]
    pub statement_timeout_seconds: u64,
}

fn validate_sslmode(sslmode: &str) -> Result<(), ValidationError> {
    if SSL_MODES.contains(&sslmode) {
        return Ok(());
    }
    let mut err = ValidationError::new("sslmode");
    err.message = Some("only 'disable', 'allow' or 'prefer' are supported for postgres ssl mode".into());
    Err(err)
}

impl AppConfig {
    /// Loads and validates configuration from every source
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            .add_source(config::File::with_name("/etc/whodidthechores/config").required(false))
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    /// Builder seeded with the built-in defaults
    pub fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(config::Config::builder()
            .set_default("port", 3000_i64)?
            .set_default("timezone", "UTC")?
            .set_default("database.username", "")?
            .set_default("database.password", "")?
            .set_default("database.hostname", "")?
            .set_default("database.port", 5432_i64)?
            .set_default("database.database", "whodidthechores")?
            .set_default("database.sslmode", "disable")?
            .set_default("database.max_connections", 10_i64)?
            .set_default("session.ttl_minutes", 240_i64)?
            .set_default("storage.statement_timeout_seconds", 10_i64)?)
    }

    /// Deserializes and validates an already built configuration
    pub fn from_config(config: config::Config) -> Result<Self, ConfigError> {
        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// The configured time zone, or UTC when the name is unknown
    pub fn time_zone(&self) -> Tz {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                error!(
                    timezone = %self.timezone,
                    "Unrecognized time zone, UTC will be used instead"
                );
                Tz::UTC
            }
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session.ttl_minutes.saturating_mul(60))
    }

    pub fn statement_timeout(&self) -> Duration {
        Duration::from_secs(self.storage.statement_timeout_seconds)
    }

    /// Pool settings for the configured database
    pub fn pool_config(&self) -> DatabaseConfig {
        let mut pool = DatabaseConfig::new(self.database.connect_options());
        pool.max_connections = self.database.max_connections;
        pool.min_connections = pool.min_connections.min(pool.max_connections);
        pool
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl DbConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = match self.sslmode.as_str() {
            "allow" => PgSslMode::Allow,
            "prefer" => PgSslMode::Prefer,
            _ => PgSslMode::Disable,
        };

        PgConnectOptions::new()
            .host(&self.hostname)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(ssl_mode)
    }
}

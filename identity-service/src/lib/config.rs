use std::env;
use std::fmt;
use std::time::Duration;

use auth::HashingParams;
use auth::JwtHandler;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Upper bound for acquiring a connection and for each query.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    /// No default; must be supplied externally.
    #[serde(default)]
    pub secret: String,
    pub expiration_hours: i64,
}

impl JwtConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.expiration_hours)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// Argon2id work factor for new password hashes.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl PasswordConfig {
    pub fn hashing_params(&self) -> HashingParams {
        HashingParams {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

/// Startup-time configuration failure. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("jwt.secret is not set (supply IDENTITY_JWT__SECRET)")]
    MissingSecret,

    #[error("jwt.secret must be at least {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },

    #[error("jwt.expiration_hours must be between 1 and {max}, got {actual}")]
    InvalidTokenLifetime { max: i64, actual: i64 },

    #[error("database.timeout_seconds must be positive")]
    InvalidStoreTimeout,

    #[error("password work factor too weak: {0}")]
    WeakHashParams(String),
}

impl Config {
    /// Smallest accepted Argon2id memory cost (KiB).
    pub const MIN_MEMORY_KIB: u32 = 19 * 1024;
    /// Smallest accepted Argon2id iteration count.
    pub const MIN_ITERATIONS: u32 = 2;
    /// Longest accepted token lifetime (one year).
    pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (IDENTITY_DATABASE__URL, IDENTITY_JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults (everything except `database.url` and `jwt.secret`)
    ///
    /// The result is validated before it is returned.
    pub fn load() -> Result<Self, ConfigurationError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: IDENTITY_DATABASE__URL=postgres://... overrides database.url
            .add_source(
                Environment::with_prefix("IDENTITY")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::from_builder(builder)
    }

    /// Apply built-in defaults to `builder`, deserialize and validate.
    pub fn from_builder(
        builder: config::ConfigBuilder<DefaultState>,
    ) -> Result<Self, ConfigurationError> {
        let configuration = builder
            .set_default("database.max_connections", 5_i64)?
            .set_default("database.timeout_seconds", 5_i64)?
            .set_default("server.http_port", 8000_i64)?
            .set_default("jwt.expiration_hours", 24_i64)?
            .set_default("password.memory_kib", i64::from(Self::MIN_MEMORY_KIB))?
            .set_default("password.iterations", i64::from(Self::MIN_ITERATIONS))?
            .set_default("password.parallelism", 1_i64)?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations the service must not start with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigurationError::MissingSecret);
        }
        if self.jwt.secret.len() < JwtHandler::MIN_SECRET_LENGTH {
            return Err(ConfigurationError::SecretTooShort {
                min: JwtHandler::MIN_SECRET_LENGTH,
                actual: self.jwt.secret.len(),
            });
        }
        if !(1..=Self::MAX_EXPIRATION_HOURS).contains(&self.jwt.expiration_hours) {
            return Err(ConfigurationError::InvalidTokenLifetime {
                max: Self::MAX_EXPIRATION_HOURS,
                actual: self.jwt.expiration_hours,
            });
        }
        if self.database.timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidStoreTimeout);
        }
        if self.password.memory_kib < Self::MIN_MEMORY_KIB {
            return Err(ConfigurationError::WeakHashParams(format!(
                "memory_kib must be at least {}, got {}",
                Self::MIN_MEMORY_KIB,
                self.password.memory_kib
            )));
        }
        if self.password.iterations < Self::MIN_ITERATIONS {
            return Err(ConfigurationError::WeakHashParams(format!(
                "iterations must be at least {}, got {}",
                Self::MIN_ITERATIONS,
                self.password.iterations
            )));
        }
        if self.password.parallelism == 0 {
            return Err(ConfigurationError::WeakHashParams(
                "parallelism must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn load(toml: &str) -> Result<Config, ConfigurationError> {
        Config::from_builder(
            ConfigBuilder::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn test_defaults_applied() {
        let config = load(&format!(
            r#"
            [database]
            url = "postgresql://localhost/identity"

            [jwt]
            secret = "{SECRET}"
            "#
        ))
        .expect("Failed to load configuration");

        assert_eq!(config.server.http_port, 8000);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.timeout(), Duration::from_secs(5));
        assert_eq!(config.jwt.ttl(), chrono::Duration::hours(24));
        assert_eq!(config.password.hashing_params(), HashingParams::default());
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let result = load(
            r#"
            [database]
            url = "postgresql://localhost/identity"
            "#,
        );

        assert!(matches!(result, Err(ConfigurationError::MissingSecret)));
    }

    #[test]
    fn test_short_secret_is_fatal() {
        let result = load(
            r#"
            [database]
            url = "postgresql://localhost/identity"

            [jwt]
            secret = "secret"
            "#,
        );

        assert!(matches!(
            result,
            Err(ConfigurationError::SecretTooShort { min: 32, actual: 6 })
        ));
    }

    #[test]
    fn test_missing_database_url_is_fatal() {
        let result = load(&format!(
            r#"
            [jwt]
            secret = "{SECRET}"
            "#
        ));

        assert!(matches!(result, Err(ConfigurationError::Load(_))));
    }

    #[test]
    fn test_non_positive_ttl_is_fatal() {
        let result = load(&format!(
            r#"
            [database]
            url = "postgresql://localhost/identity"

            [jwt]
            secret = "{SECRET}"
            expiration_hours = 0
            "#
        ));

        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidTokenLifetime { actual: 0, .. })
        ));
    }

    #[test]
    fn test_oversized_ttl_is_fatal() {
        for hours in [10_000_000_000_i64, i64::MAX] {
            let result = load(&format!(
                r#"
                [database]
                url = "postgresql://localhost/identity"

                [jwt]
                secret = "{SECRET}"
                expiration_hours = {hours}
                "#
            ));

            assert!(matches!(
                result,
                Err(ConfigurationError::InvalidTokenLifetime { actual, .. }) if actual == hours
            ));
        }
    }

    #[test]
    fn test_longest_ttl_accepted() {
        let config = load(&format!(
            r#"
            [database]
            url = "postgresql://localhost/identity"

            [jwt]
            secret = "{SECRET}"
            expiration_hours = {}
            "#,
            Config::MAX_EXPIRATION_HOURS
        ))
        .expect("Failed to load configuration");

        assert_eq!(
            config.jwt.ttl(),
            chrono::Duration::hours(Config::MAX_EXPIRATION_HOURS)
        );
    }

    #[test]
    fn test_weak_work_factor_is_fatal() {
        let result = load(&format!(
            r#"
            [database]
            url = "postgresql://localhost/identity"

            [jwt]
            secret = "{SECRET}"

            [password]
            memory_kib = 1024
            "#
        ));

        assert!(matches!(result, Err(ConfigurationError::WeakHashParams(_))));
    }

    #[test]
    fn test_debug_output_redacts_secret() {
        let config = load(&format!(
            r#"
            [database]
            url = "postgresql://localhost/identity"

            [jwt]
            secret = "{SECRET}"
            "#
        ))
        .unwrap();

        assert!(!format!("{:?}", config).contains(SECRET));
    }
}

//! Environment-based server configuration.

use std::str::FromStr;
use std::time::Duration;

use kehila_auth::config::AuthConfig;
use kehila_auth::external::ExternalProviderConfig;
use kehila_db::DbConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Full server configuration, assembled from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
    /// External identity provider, when one is configured.
    pub external: Option<ExternalProviderConfig>,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// The JWT signing key pair is mandatory; everything else has a
    /// development-friendly default. The external provider is enabled
    /// only when all three `EXTERNAL_*` variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let db = DbConfig {
            url: optional("DB_URL").unwrap_or_else(|| "127.0.0.1:8000".into()),
            namespace: optional("DB_NAMESPACE").unwrap_or_else(|| "kehila".into()),
            database: optional("DB_DATABASE").unwrap_or_else(|| "main".into()),
            username: optional("DB_USERNAME").unwrap_or_else(|| "root".into()),
            password: optional("DB_PASSWORD").unwrap_or_else(|| "root".into()),
        };

        let auth = AuthConfig {
            jwt_private_key_pem: required("JWT_PRIVATE_KEY_PEM")?,
            jwt_public_key_pem: required("JWT_PUBLIC_KEY_PEM")?,
            jwt_issuer: optional("JWT_ISSUER").unwrap_or_else(|| "kehila".into()),
            access_token_lifetime_secs: parsed("ACCESS_TOKEN_LIFETIME_SECS", 900)?,
            session_lifetime_secs: parsed("SESSION_LIFETIME_SECS", 28_800)?,
            session_refresh_threshold_secs: parsed("SESSION_REFRESH_THRESHOLD_SECS", 3_600)?,
            pepper: optional("AUTH_PEPPER"),
            store_timeout: Duration::from_millis(parsed("STORE_TIMEOUT_MS", 3_000)?),
        };

        let external = match (
            optional("EXTERNAL_ISSUER"),
            optional("EXTERNAL_JWKS_URL"),
            optional("EXTERNAL_AUDIENCE"),
        ) {
            (Some(issuer), Some(jwks_url), Some(audience)) => Some(ExternalProviderConfig {
                issuer,
                jwks_url,
                audience,
            }),
            _ => None,
        };

        Ok(Self {
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".into()),
            db,
            auth,
            external,
        })
    }
}

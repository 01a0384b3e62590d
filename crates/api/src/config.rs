//! Process configuration, read once at startup and passed into `build_app`.

use std::net::SocketAddr;

use thiserror::Error;

use hipnosis_observability::LogFormat;

/// Shared secret used when `JWT_SECRET` is not set. Never use outside dev.
pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// `HIPNOSIS_BIND`
    pub bind_addr: SocketAddr,
    /// `JWT_SECRET`
    pub jwt_secret: String,
    /// `DATABASE_URL`; without it habits live in memory.
    pub database_url: Option<String>,
    /// `HIPNOSIS_DB_MAX_CONNECTIONS`
    pub db_max_connections: u32,
    /// `HIPNOSIS_LOGIN_URL`
    pub login_url: String,
    /// `HIPNOSIS_LOGOUT_URL`
    pub logout_url: String,
    /// `HIPNOSIS_LOG_FORMAT`
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            database_url: None,
            db_max_connections: 5,
            login_url: "/_auth/login".to_string(),
            logout_url: "/_auth/logout".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or empty
    /// variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get("HIPNOSIS_BIND") {
            config.bind_addr = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                name: "HIPNOSIS_BIND",
                message: format!("'{raw}': {e}"),
            })?;
        }
        if let Some(secret) = get("JWT_SECRET") {
            config.jwt_secret = secret;
        }
        config.database_url = get("DATABASE_URL");
        if let Some(raw) = get("HIPNOSIS_DB_MAX_CONNECTIONS") {
            config.db_max_connections = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "HIPNOSIS_DB_MAX_CONNECTIONS",
                    message: format!("'{raw}' is not a positive integer"),
                })?;
        }
        if let Some(url) = get("HIPNOSIS_LOGIN_URL") {
            config.login_url = url;
        }
        if let Some(url) = get("HIPNOSIS_LOGOUT_URL") {
            config.logout_url = url;
        }
        if let Some(raw) = get("HIPNOSIS_LOG_FORMAT") {
            config.log_format = raw.parse().map_err(|message| ConfigError::Invalid {
                name: "HIPNOSIS_LOG_FORMAT",
                message,
            })?;
        }

        Ok(config)
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn variables_override_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("HIPNOSIS_BIND", "127.0.0.1:9000"),
            ("JWT_SECRET", "prod-secret"),
            ("DATABASE_URL", "postgres://localhost/hipnosis"),
            ("HIPNOSIS_DB_MAX_CONNECTIONS", "12"),
            ("HIPNOSIS_LOGIN_URL", "https://id.example/login"),
            ("HIPNOSIS_LOG_FORMAT", "pretty"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert!(!config.uses_dev_secret());
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/hipnosis"));
        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.login_url, "https://id.example/login");
        assert_eq!(config.logout_url, "/_auth/logout");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let config = ApiConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = ApiConfig::from_lookup(lookup(&[("HIPNOSIS_BIND", "not-an-addr")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "HIPNOSIS_BIND", .. }));

        let err = ApiConfig::from_lookup(lookup(&[("HIPNOSIS_DB_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "HIPNOSIS_DB_MAX_CONNECTIONS", .. }));

        let err = ApiConfig::from_lookup(lookup(&[("HIPNOSIS_LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "HIPNOSIS_LOG_FORMAT", .. }));
    }
}

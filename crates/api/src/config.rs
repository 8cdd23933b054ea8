use axum::http::HeaderValue;
use seed_core::config::{self, ConfigError, Lookup};

/// Origin value that allows any requesting origin.
pub const ANY_ORIGIN: &str = "*";

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Deployment environment name (default: `prod`).
    pub env: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// `*` mirrors whatever origin the request carries.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `APP_PORT` / `PORT`    | `3000`    |
    /// | `ENV`                  | `prod`    |
    /// | `CORS_ORIGINS`         | `*`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&config::env_lookup)
    }

    /// Load configuration from an arbitrary key/value source.
    pub fn from_lookup(lookup: &impl Lookup) -> Result<Self, ConfigError> {
        let host = config::or_default(lookup, "HOST", "0.0.0.0");

        let port_var = if lookup("APP_PORT").is_some() {
            "APP_PORT"
        } else {
            "PORT"
        };
        let port: u16 = config::parsed_or(lookup, port_var, 3000)?;

        let env = config::or_default(lookup, "ENV", "prod");

        let cors_origins: Vec<String> = config::or_default(lookup, "CORS_ORIGINS", ANY_ORIGIN)
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            if origin != ANY_ORIGIN && origin.parse::<HeaderValue>().is_err() {
                return Err(ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    reason: format!("'{origin}' is not a valid origin"),
                });
            }
        }

        let request_timeout_secs: u64 = config::parsed_or(lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        Ok(Self {
            host,
            port,
            env,
            cors_origins,
            request_timeout_secs,
        })
    }

    /// Whether any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == ANY_ORIGIN)
    }
}

//! Database settings loaded from the environment.

use seed_core::config::{self, ConfigError, Lookup};

use crate::target::ConnectionTarget;
use crate::PoolSettings;

/// Storage settings for the session manager.
///
/// | Env Var              | Default | Notes                                  |
/// |----------------------|---------|----------------------------------------|
/// | `DATABASE_URL`       | —       | Overrides all `PG_*` settings when set |
/// | `PG_USER`            | —       | Required without `DATABASE_URL`        |
/// | `PG_PW`              | —       | Required without `DATABASE_URL`        |
/// | `PG_SERVER`          | —       | Required without `DATABASE_URL`        |
/// | `PG_PORT`            | —       | Required without `DATABASE_URL`        |
/// | `PG_DB`              | —       | Required without `DATABASE_URL`        |
/// | `DB_MAX_CONNECTIONS` | `20`    |                                        |
/// | `DB_ECHO`            | `false` | Log every statement                    |
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub target: ConnectionTarget,
    pub pool: PoolSettings,
}

impl DatabaseSettings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&config::env_lookup)
    }

    /// Load settings from an arbitrary key/value source.
    pub fn from_lookup(lookup: &impl Lookup) -> Result<Self, ConfigError> {
        let target = match lookup("DATABASE_URL") {
            Some(url) => ConnectionTarget::Url(url),
            None => ConnectionTarget::from_parts(
                config::required(lookup, "PG_USER")?,
                config::required(lookup, "PG_PW")?,
                config::required(lookup, "PG_SERVER")?,
                config::parsed::<u16>(lookup, "PG_PORT")?,
                config::required(lookup, "PG_DB")?,
            ),
        };

        let defaults = PoolSettings::default();
        let pool = PoolSettings {
            max_connections: config::parsed_or(
                lookup,
                "DB_MAX_CONNECTIONS",
                defaults.max_connections,
            )?,
            echo: config::flag(lookup, "DB_ECHO", defaults.echo)?,
        };

        Ok(Self { target, pool })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn builds_target_from_pg_parts() {
        let lookup = source(&[
            ("PG_USER", "seed"),
            ("PG_PW", "pw"),
            ("PG_SERVER", "localhost"),
            ("PG_PORT", "5432"),
            ("PG_DB", "seed"),
        ]);
        let settings = DatabaseSettings::from_lookup(&lookup).unwrap();
        assert_eq!(
            settings.target,
            ConnectionTarget::from_parts("seed", "pw", "localhost", 5432, "seed")
        );
        assert_eq!(settings.pool.max_connections, 20);
        assert!(!settings.pool.echo);
    }

    #[test]
    fn database_url_overrides_parts() {
        let lookup = source(&[
            ("DATABASE_URL", "postgres://a:b@c/d"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("DB_ECHO", "true"),
        ]);
        let settings = DatabaseSettings::from_lookup(&lookup).unwrap();
        assert_eq!(
            settings.target,
            ConnectionTarget::Url("postgres://a:b@c/d".into())
        );
        assert_eq!(settings.pool.max_connections, 4);
        assert!(settings.pool.echo);
    }

    #[test]
    fn missing_required_value_fails() {
        let lookup = source(&[("PG_USER", "seed"), ("PG_PW", "pw")]);
        assert_eq!(
            DatabaseSettings::from_lookup(&lookup).unwrap_err(),
            ConfigError::Missing("PG_SERVER")
        );
    }

    #[test]
    fn non_numeric_port_fails() {
        let lookup = source(&[
            ("PG_USER", "seed"),
            ("PG_PW", "pw"),
            ("PG_SERVER", "localhost"),
            ("PG_PORT", "pg"),
            ("PG_DB", "seed"),
        ]);
        assert_matches!(
            DatabaseSettings::from_lookup(&lookup),
            Err(ConfigError::Invalid { var: "PG_PORT", .. })
        );
    }
}

//! Connection descriptors for the storage engine.

use std::fmt;
use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use url::Url;

use crate::error::DbError;

/// Drivers accepted in a connection target. The `+asyncpg` suffix is tolerated
/// so descriptors shared with other tooling keep working.
const DRIVERS: &[&str] = &["postgres", "postgresql", "postgresql+asyncpg"];

const REDACTED: &str = "***";

/// Where the engine connects to.
///
/// Either a full URL (e.g. from `DATABASE_URL`) or the individual parts
/// assembled from configuration values.
#[derive(Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    Url(String),
    Parts {
        driver: String,
        username: String,
        password: String,
        host: String,
        port: u16,
        database: String,
    },
}

impl ConnectionTarget {
    /// Build a target from parts using the default `postgresql` driver.
    pub fn from_parts(
        username: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
    ) -> Self {
        ConnectionTarget::Parts {
            driver: "postgresql".to_string(),
            username: username.into(),
            password: password.into(),
            host: host.into(),
            port,
            database: database.into(),
        }
    }

    /// Validate the target and turn it into sqlx connect options.
    ///
    /// Statement logging is disabled unless `echo` is set.
    pub fn connect_options(&self, echo: bool) -> Result<PgConnectOptions, DbError> {
        let options = match self {
            ConnectionTarget::Url(url) => {
                let scheme = url.split_once("://").map(|(s, _)| s).unwrap_or_default();
                check_driver(scheme)?;
                // sqlx only understands the bare scheme.
                let normalized = url.replacen(scheme, "postgres", 1);
                PgConnectOptions::from_str(&normalized)
                    .map_err(|e| DbError::InvalidTarget(e.to_string()))?
            }
            ConnectionTarget::Parts {
                driver,
                username,
                password,
                host,
                port,
                database,
            } => {
                check_driver(driver)?;
                if host.trim().is_empty() {
                    return Err(DbError::InvalidTarget("host is empty".into()));
                }
                if database.trim().is_empty() {
                    return Err(DbError::InvalidTarget("database name is empty".into()));
                }
                if *port == 0 {
                    return Err(DbError::InvalidTarget("port must be non-zero".into()));
                }
                PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(username)
                    .password(password)
                    .database(database)
            }
        };

        Ok(if echo {
            options
        } else {
            options.disable_statement_logging()
        })
    }
}

fn check_driver(driver: &str) -> Result<(), DbError> {
    if DRIVERS.contains(&driver) {
        Ok(())
    } else {
        Err(DbError::InvalidTarget(format!(
            "unsupported driver '{driver}'"
        )))
    }
}

impl fmt::Display for ConnectionTarget {
    /// Renders the target with the password redacted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionTarget::Url(url) => match redact_url(url) {
                Some(redacted) => f.write_str(&redacted),
                None => f.write_str("<unparseable connection url>"),
            },
            ConnectionTarget::Parts {
                driver,
                username,
                host,
                port,
                database,
                ..
            } => write!(f, "{driver}://{username}:{REDACTED}@{host}:{port}/{database}"),
        }
    }
}

impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionTarget({self})")
    }
}

/// Mask the userinfo password and any `password` query parameter.
fn redact_url(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw).ok()?;
    if url.password().is_some() {
        url.set_password(Some(REDACTED)).ok()?;
    }

    if url.query_pairs().any(|(key, _)| key == "password") {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if key == "password" {
                    REDACTED.to_string()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    Some(url.to_string())
}

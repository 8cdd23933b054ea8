//! Helpers for reading typed settings from a key/value source.
//!
//! Loaders take a lookup function instead of reading `std::env` directly so
//! they can be exercised in tests without touching the process environment.

use std::str::FromStr;

/// A required setting was missing or could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Lookup function over the configuration source (normally the environment).
pub trait Lookup: Fn(&str) -> Option<String> {}

impl<F: Fn(&str) -> Option<String>> Lookup for F {}

/// Read the process environment. Empty values count as unset.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Fetch a required string setting.
pub fn required(lookup: &impl Lookup, var: &'static str) -> Result<String, ConfigError> {
    lookup(var).ok_or(ConfigError::Missing(var))
}

/// Fetch an optional string setting, falling back to `default`.
pub fn or_default(lookup: &impl Lookup, var: &'static str, default: &str) -> String {
    lookup(var).unwrap_or_else(|| default.to_string())
}

/// Fetch and parse an optional setting, falling back to `default` when unset.
pub fn parsed_or<T>(lookup: &impl Lookup, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => parse(var, &raw),
        None => Ok(default),
    }
}

/// Fetch and parse a required setting.
pub fn parsed<T>(lookup: &impl Lookup, var: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = required(lookup, var)?;
    parse(var, &raw)
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: format!("'{raw}': {e}"),
    })
}

/// Parse a boolean flag. Accepts `1/0`, `true/false`, `yes/no`, `on/off`.
pub fn flag(lookup: &impl Lookup, var: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            reason: format!("'{raw}' is not a boolean"),
        }),
    }
}

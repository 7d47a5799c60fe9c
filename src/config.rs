//! Host configuration parsed from environment variables.
//!
//! ERROR HANDLING
//! ==============
//! A malformed `PORT` is fatal. Missing identity backend variables are not:
//! the host still serves the app, and `/api/config/identity` answers 503 so
//! the browser settles into a signed-out state.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use client::net::types::IdentityConfig;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {var}")]
    Missing { var: &'static str },
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// `None` when the identity backend is not configured.
    pub identity: Option<IdentityConfig>,
}

impl ServerConfig {
    /// Build typed config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary variable lookup.
    ///
    /// Required for the identity backend:
    /// - `LAWME_IDENTITY_API_KEY`
    /// - `LAWME_IDENTITY_AUTH_DOMAIN`
    /// - `LAWME_IDENTITY_PROJECT_ID`
    /// - `LAWME_IDENTITY_APP_ID`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `LAWME_IDENTITY_STORAGE_BUCKET`
    /// - `LAWME_IDENTITY_MESSAGING_SENDER_ID`
    /// - `LAWME_IDENTITY_MEASUREMENT_ID`
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but not a valid port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_port(lookup("PORT").as_deref())?;
        let identity = match identity_from_lookup(&lookup) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!(error = %e, "identity backend not configured; sign-in disabled");
                None
            }
        };
        Ok(Self { port, identity })
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_PORT),
        Some(value) => value
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid { var: "PORT", value: value.to_owned() }),
    }
}

fn identity_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<IdentityConfig, ConfigError> {
    let optional = |var: &'static str| lookup(var).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
    let required = |var: &'static str| optional(var).ok_or(ConfigError::Missing { var });

    Ok(IdentityConfig {
        api_key: required("LAWME_IDENTITY_API_KEY")?,
        auth_domain: required("LAWME_IDENTITY_AUTH_DOMAIN")?,
        project_id: required("LAWME_IDENTITY_PROJECT_ID")?,
        app_id: required("LAWME_IDENTITY_APP_ID")?,
        storage_bucket: optional("LAWME_IDENTITY_STORAGE_BUCKET"),
        messaging_sender_id: optional("LAWME_IDENTITY_MESSAGING_SENDER_ID"),
        measurement_id: optional("LAWME_IDENTITY_MEASUREMENT_ID"),
    })
}

//! Configuration types for the tax service.
//!
//! This module contains the strongly-typed settings structures that are
//! deserialized from the YAML settings file. Every section and field has a
//! default, so a partial file is valid.

use serde::Deserialize;

use crate::calculation::{CalculationOptions, DonationAccumulation};

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_secs: 10,
        }
    }
}

impl ServerSettings {
    /// The `host:port` pair to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Deduction storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite connection url.
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://tax.db".to_string(),
        }
    }
}

/// Names of the environment variables holding the admin credentials.
///
/// The credentials themselves never live in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Variable holding the admin username.
    pub username_env: String,
    /// Variable holding the admin password.
    pub password_env: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            username_env: "ADMIN_USERNAME".to_string(),
            password_env: "ADMIN_PASSWORD".to_string(),
        }
    }
}

/// Resolved admin credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    /// Expected username.
    pub username: String,
    /// Expected password.
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Calculation behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalculationSettings {
    /// Attach the per-bracket breakdown to single calculations.
    pub detailed_levels: bool,
    /// How donations carry across rows of a batch upload.
    pub batch_donations: DonationAccumulation,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            detailed_levels: true,
            batch_donations: DonationAccumulation::Cumulative,
        }
    }
}

impl CalculationSettings {
    /// Options passed to single-statement calculations.
    pub fn options(&self) -> CalculationOptions {
        CalculationOptions {
            detailed_levels: self.detailed_levels,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `tracing` filter, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// The complete service settings loaded from YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// HTTP listener settings.
    pub server: ServerSettings,
    /// Deduction storage settings.
    pub database: DatabaseSettings,
    /// Admin credential lookup.
    pub admin: AdminSettings,
    /// Calculation switches.
    pub calculation: CalculationSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

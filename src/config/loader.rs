//! Settings loading functionality.
//!
//! This module provides the [`SettingsLoader`] type for loading service
//! settings from a YAML file and applying environment overrides.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{AdminCredentials, ServiceSettings};

/// Environment variable naming the settings file.
pub const CONFIG_PATH_ENV: &str = "TAX_ENGINE_CONFIG";

/// Settings file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/settings.yaml";

/// Loads and provides access to service settings.
///
/// # File Layout
///
/// ```text
/// server:
///   host: 0.0.0.0
///   port: 8080
///   shutdown_timeout_secs: 10
/// database:
///   url: sqlite://tax.db
/// admin:
///   username_env: ADMIN_USERNAME
///   password_env: ADMIN_PASSWORD
/// calculation:
///   detailed_levels: true
///   batch_donations: cumulative
/// logging:
///   filter: info
/// ```
///
/// # Example
///
/// ```no_run
/// use tax_engine::config::SettingsLoader;
///
/// let loader = SettingsLoader::load("./config/settings.yaml").unwrap();
/// println!("Listening on {}", loader.settings().server.bind_address());
/// ```
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    settings: ServiceSettings,
}

impl SettingsLoader {
    /// Loads settings from the YAML file at `path`.
    ///
    /// # Returns
    ///
    /// Returns a `SettingsLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file is not valid YAML for [`ServiceSettings`] (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let settings = Self::load_yaml::<ServiceSettings>(path.as_ref())?;
        Ok(Self { settings })
    }

    /// Loads settings from the file named by `TAX_ENGINE_CONFIG` (or the
    /// default path) and applies the `PORT` and `DATABASE_URL` overrides.
    pub fn from_env() -> EngineResult<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut loader = Self::load(path)?;
        loader.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(loader)
    }

    /// Wraps already-built settings.
    pub fn from_settings(settings: ServiceSettings) -> Self {
        Self { settings }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Applies `PORT` and `DATABASE_URL` from `lookup` over the file values.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> EngineResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.settings.server.port =
                port.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| EngineError::ConfigParseError {
                        path: "PORT".to_string(),
                        message: e.to_string(),
                    })?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.settings.database.url = url;
        }
        Ok(())
    }

    /// Returns the loaded settings.
    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Consumes the loader, returning the settings.
    pub fn into_settings(self) -> ServiceSettings {
        self.settings
    }

    /// Resolves the admin credentials through `lookup`.
    ///
    /// Returns `None` unless both variables are set and non-empty, in which
    /// case the admin routes reject every request.
    pub fn admin_credentials<F>(&self, lookup: F) -> Option<AdminCredentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin = &self.settings.admin;
        let username = lookup(&admin.username_env).filter(|v| !v.is_empty())?;
        let password = lookup(&admin.password_env).filter(|v| !v.is_empty())?;
        Some(AdminCredentials { username, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::DonationAccumulation;
    use std::collections::HashMap;

    fn config_path() -> &'static str {
        "./config/settings.yaml"
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_temp(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("tax-engine-{}.yaml", uuid::Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_shipped_settings() {
        let result = SettingsLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load settings: {:?}", result.err());

        let settings = result.unwrap().into_settings();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.admin.username_env, "ADMIN_USERNAME");
        assert!(settings.calculation.detailed_levels);
        assert_eq!(
            settings.calculation.batch_donations,
            DonationAccumulation::Cumulative
        );
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        match SettingsLoader::load("/nonexistent/settings.yaml") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("settings.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_yaml_returns_parse_error() {
        let path = write_temp("server:\n  port: not-a-port\n");

        let result = SettingsLoader::load(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_independent_batch_mode() {
        let path = write_temp("calculation:\n  batch_donations: independent\n");

        let result = SettingsLoader::load(&path);
        fs::remove_file(&path).ok();

        assert_eq!(
            result.unwrap().settings().calculation.batch_donations,
            DonationAccumulation::Independent
        );
    }

    #[test]
    fn test_env_overrides_port_and_database() {
        let mut loader = SettingsLoader::from_settings(ServiceSettings::default());

        loader
            .apply_overrides(env(&[("PORT", "2565"), ("DATABASE_URL", "sqlite::memory:")]))
            .unwrap();

        assert_eq!(loader.settings().server.port, 2565);
        assert_eq!(loader.settings().database.url, "sqlite::memory:");
    }

    #[test]
    fn test_invalid_port_override_is_rejected() {
        let mut loader = SettingsLoader::from_settings(ServiceSettings::default());

        let result = loader.apply_overrides(env(&[("PORT", "eighty")]));

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => assert_eq!(path, "PORT"),
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_admin_credentials_require_both_values() {
        let loader = SettingsLoader::from_settings(ServiceSettings::default());

        assert!(loader
            .admin_credentials(env(&[("ADMIN_USERNAME", "adminTax")]))
            .is_none());
        assert!(loader
            .admin_credentials(env(&[("ADMIN_USERNAME", "adminTax"), ("ADMIN_PASSWORD", "")]))
            .is_none());

        let credentials = loader
            .admin_credentials(env(&[("ADMIN_USERNAME", "adminTax"), ("ADMIN_PASSWORD", "admin!")]))
            .unwrap();
        assert_eq!(credentials.username, "adminTax");
        assert_eq!(credentials.password, "admin!");
    }
}

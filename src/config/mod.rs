//! Configuration loading and management for the Tax Engine.
//!
//! This module provides functionality to load service settings from a YAML
//! file, including the listener, deduction storage, admin credential lookup,
//! calculation switches, and logging filter.
//!
//! # Example
//!
//! ```no_run
//! use tax_engine::config::SettingsLoader;
//!
//! let loader = SettingsLoader::load("./config/settings.yaml").unwrap();
//! println!("Database: {}", loader.settings().database.url);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, SettingsLoader};
pub use types::{
    AdminCredentials, AdminSettings, CalculationSettings, DatabaseSettings, LoggingSettings,
    ServerSettings, ServiceSettings,
};

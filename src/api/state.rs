//! Application state for the Tax Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{AdminCredentials, CalculationSettings};
use crate::store::DeductionStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the live
/// deduction configuration, the calculation switches, and the admin
/// credentials.
#[derive(Clone)]
pub struct AppState {
    /// The live deduction configuration.
    store: Arc<DeductionStore>,
    /// Calculation switches loaded at startup.
    calculation: CalculationSettings,
    /// Expected admin credentials. `None` locks the admin routes.
    admin: Option<Arc<AdminCredentials>>,
}

impl AppState {
    /// Creates a new application state around a deduction store.
    pub fn new(store: DeductionStore) -> Self {
        Self {
            store: Arc::new(store),
            calculation: CalculationSettings::default(),
            admin: None,
        }
    }

    /// Replaces the calculation switches.
    pub fn with_calculation(mut self, calculation: CalculationSettings) -> Self {
        self.calculation = calculation;
        self
    }

    /// Sets the credentials accepted on the admin routes.
    pub fn with_admin(mut self, credentials: Option<AdminCredentials>) -> Self {
        self.admin = credentials.map(Arc::new);
        self
    }

    /// Returns the deduction store.
    pub fn store(&self) -> &DeductionStore {
        &self.store
    }

    /// Returns the calculation switches.
    pub fn calculation(&self) -> CalculationSettings {
        self.calculation
    }

    /// Returns the admin credentials, if any are configured.
    pub fn admin(&self) -> Option<&AdminCredentials> {
        self.admin.as_deref()
    }
}

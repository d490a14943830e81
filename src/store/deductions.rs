//! Shared, persisted deduction configuration.

use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::error::EngineResult;
use crate::models::{DeductionConfig, DeductionField};

use super::DeductionRepository;

/// The process-wide deduction configuration.
///
/// Readers take a copy with [`snapshot`](Self::snapshot). Updates are
/// serialized, validated, and persisted before they become visible, so a
/// failed save never leaves memory ahead of storage. Readers are not held
/// up while a save is in flight.
pub struct DeductionStore {
    repository: Arc<dyn DeductionRepository>,
    current: RwLock<DeductionConfig>,
    writer: Mutex<()>,
}

impl DeductionStore {
    /// Loads the persisted configuration, falling back to the defaults when
    /// nothing has been saved.
    ///
    /// A repository failure is returned as-is; the defaults are only used
    /// when storage is reachable and empty.
    pub async fn load(repository: Arc<dyn DeductionRepository>) -> EngineResult<Self> {
        let config = match repository.load().await? {
            Some(config) => {
                info!(
                    personal_deduction = %config.personal_deduction,
                    k_receipt_cap = %config.k_receipt_cap,
                    "Loaded persisted deductions"
                );
                config
            }
            None => {
                let config = DeductionConfig::default();
                info!(
                    personal_deduction = %config.personal_deduction,
                    k_receipt_cap = %config.k_receipt_cap,
                    "No persisted deductions, using defaults"
                );
                config
            }
        };

        Ok(Self::with_config(repository, config))
    }

    /// Creates a store holding `config` without reading the repository.
    pub fn with_config(repository: Arc<dyn DeductionRepository>, config: DeductionConfig) -> Self {
        Self {
            repository,
            current: RwLock::new(config),
            writer: Mutex::new(()),
        }
    }

    /// Returns a consistent copy of the current configuration.
    pub async fn snapshot(&self) -> DeductionConfig {
        *self.current.read().await
    }

    /// Validates, persists, then publishes a new value for `field`.
    pub async fn update(
        &self,
        field: DeductionField,
        amount: Decimal,
    ) -> EngineResult<DeductionConfig> {
        let _writer = self.writer.lock().await;

        let updated = self.snapshot().await.with_field(field, amount)?;

        if let Err(err) = self.repository.save(&updated).await {
            warn!(field = %field, amount = %amount, error = %err, "Failed to persist deduction update");
            return Err(err);
        }

        *self.current.write().await = updated;
        info!(field = %field, amount = %amount, "Deduction updated");
        Ok(updated)
    }

    /// Sets the personal deduction.
    pub async fn set_personal_deduction(&self, amount: Decimal) -> EngineResult<DeductionConfig> {
        self.update(DeductionField::Personal, amount).await
    }

    /// Sets the k-receipt cap.
    pub async fn set_k_receipt_cap(&self, amount: Decimal) -> EngineResult<DeductionConfig> {
        self.update(DeductionField::KReceipt, amount).await
    }
}

//! Persistence seam for the deduction configuration.

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::models::DeductionConfig;

/// Durable storage for the deduction configuration.
///
/// Implementations only store and return whole configurations; validation
/// and in-memory publication belong to [`DeductionStore`](super::DeductionStore).
#[async_trait]
pub trait DeductionRepository: Send + Sync {
    /// Returns the most recently saved configuration, or `None` when nothing
    /// has been saved yet.
    async fn load(&self) -> EngineResult<Option<DeductionConfig>>;

    /// Durably records `config` as the current configuration.
    async fn save(&self, config: &DeductionConfig) -> EngineResult<()>;
}

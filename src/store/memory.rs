//! In-process deduction repository.
//!
//! Keeps the last saved configuration in memory. Loads and saves can be made
//! to fail on demand, which is how storage outages are exercised in tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::error::{EngineError, EngineResult};
use crate::models::DeductionConfig;

use super::DeductionRepository;

/// Deduction repository held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryDeductionRepository {
    saved: Mutex<Option<DeductionConfig>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryDeductionRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository that already holds `config`.
    pub fn with_saved(config: DeductionConfig) -> Self {
        Self {
            saved: Mutex::new(Some(config)),
            ..Self::default()
        }
    }

    /// Makes subsequent loads fail (or succeed again).
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent saves fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The last successfully saved configuration.
    pub async fn saved(&self) -> Option<DeductionConfig> {
        *self.saved.lock().await
    }
}

#[async_trait]
impl DeductionRepository for InMemoryDeductionRepository {
    async fn load(&self) -> EngineResult<Option<DeductionConfig>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(EngineError::Storage {
                message: "deduction storage unavailable".to_string(),
            });
        }
        Ok(*self.saved.lock().await)
    }

    async fn save(&self, config: &DeductionConfig) -> EngineResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(EngineError::Storage {
                message: "deduction storage unavailable".to_string(),
            });
        }
        *self.saved.lock().await = Some(*config);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

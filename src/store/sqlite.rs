//! SQLite-backed deduction repository.
//!
//! Uses a single append-only table; every save inserts a new row and the
//! newest row is the current configuration:
//!
//! ```text
//! deductions(id INTEGER PRIMARY KEY, personal TEXT, kreceipt TEXT, updated_at TEXT)
//! ```
//!
//! Amounts are stored as decimal strings so no precision is lost.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::DeductionConfig;

use super::DeductionRepository;

/// Deduction repository stored in a SQLite database.
pub struct SqliteDeductionRepository {
    pool: SqlitePool,
}

impl SqliteDeductionRepository {
    /// Opens (creating if needed) the database at `url` and ensures the
    /// `deductions` table exists.
    ///
    /// Pass `"sqlite::memory:"` for an ephemeral database.
    pub async fn connect(url: &str) -> EngineResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| EngineError::Storage {
                message: format!("Invalid SQLite url '{}': {}", url, e),
            })?
            .create_if_missing(true);

        // An in-memory database lives and dies with its single connection.
        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(4)
        };

        let pool = pool_options.connect_with(options).await?;

        let repository = Self::from_pool(pool).await?;
        info!(url = %url, "Deduction repository initialized");
        Ok(repository)
    }

    /// Wraps an existing pool and ensures the `deductions` table exists.
    pub async fn from_pool(pool: SqlitePool) -> EngineResult<Self> {
        let repository = Self { pool };
        repository.ensure_schema().await?;
        Ok(repository)
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> EngineResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS deductions (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                personal    TEXT NOT NULL,
                kreceipt    TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn parse_amount(column: &str, value: &str) -> EngineResult<Decimal> {
    Decimal::from_str(value).map_err(|e| EngineError::Storage {
        message: format!("Invalid {} amount '{}' in deductions table: {}", column, value, e),
    })
}

#[async_trait]
impl DeductionRepository for SqliteDeductionRepository {
    async fn load(&self) -> EngineResult<Option<DeductionConfig>> {
        let row = sqlx::query("SELECT personal, kreceipt FROM deductions ORDER BY id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            debug!("No deductions persisted yet");
            return Ok(None);
        };

        let personal: String = row.try_get("personal")?;
        let kreceipt: String = row.try_get("kreceipt")?;

        Ok(Some(DeductionConfig {
            personal_deduction: parse_amount("personal", &personal)?,
            k_receipt_cap: parse_amount("kreceipt", &kreceipt)?,
        }))
    }

    async fn save(&self, config: &DeductionConfig) -> EngineResult<()> {
        sqlx::query("INSERT INTO deductions (personal, kreceipt, updated_at) VALUES (?, ?, ?)")
            .bind(config.personal_deduction.to_string())
            .bind(config.k_receipt_cap.to_string())
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

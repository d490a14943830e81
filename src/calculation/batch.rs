//! Batch calculation over uploaded income records.
//!
//! A batch is a CSV table of `totalIncome,wht,donation` rows. The header row
//! is discarded; every other row becomes one [`BatchRecord`]. Records are
//! calculated strictly in input order.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};
use crate::models::{Allowance, BatchOutcome, DeductionConfig, IncomeStatement};

use super::orchestrator::{CalculationOptions, compute};

/// Number of columns each batch row must have.
pub const BATCH_COLUMNS: usize = 3;

/// One decoded batch row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRecord {
    /// Gross income for the year.
    pub total_income: Decimal,
    /// Withholding tax already paid.
    pub wht: Decimal,
    /// Donation claimed on this row.
    pub donation: Decimal,
}

/// How donations from earlier rows affect later rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationAccumulation {
    /// Each row is calculated with every donation seen so far in the batch,
    /// so the donation cap is reached against the running total.
    #[default]
    Cumulative,
    /// Each row is calculated with its own donation only.
    Independent,
}

/// Decodes CSV text into batch records.
///
/// The first row is treated as a header and skipped. Every data row must
/// have exactly [`BATCH_COLUMNS`] decimal cells; the first bad row fails the
/// whole batch.
///
/// # Example
///
/// ```
/// use tax_engine::calculation::parse_records;
/// use rust_decimal_macros::dec;
///
/// let records = parse_records("totalIncome,wht,donation\n500000,0,0\n").unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].total_income, dec!(500000));
/// ```
pub fn parse_records(input: &str) -> EngineResult<Vec<BatchRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input.as_bytes());

    reader
        .records()
        .enumerate()
        .map(|(idx, result)| {
            let row = idx + 1;
            let record = result.map_err(|e| EngineError::BatchParse {
                row,
                message: e.to_string(),
            })?;

            if record.len() != BATCH_COLUMNS {
                return Err(EngineError::BatchParse {
                    row,
                    message: format!(
                        "expected {} columns, found {}",
                        BATCH_COLUMNS,
                        record.len()
                    ),
                });
            }

            let cell = |col: usize| parse_cell(&record[col], row);
            Ok(BatchRecord {
                total_income: cell(0)?,
                wht: cell(1)?,
                donation: cell(2)?,
            })
        })
        .collect()
}

fn parse_cell(value: &str, row: usize) -> EngineResult<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| EngineError::BatchParse {
            row,
            message: format!("invalid number '{}'", value),
        })
}

/// Calculates every record in order.
///
/// Breakdowns are never attached to batch outcomes. In cumulative mode each
/// row is calculated against the exact running donation total, so the cap
/// is applied to everything seen so far. A row whose amounts leave the
/// `Decimal` range fails the whole batch with its 1-based row number.
pub fn compute_batch(
    records: &[BatchRecord],
    deductions: &DeductionConfig,
    accumulation: DonationAccumulation,
) -> EngineResult<Vec<BatchOutcome>> {
    let options = CalculationOptions {
        detailed_levels: false,
    };
    let mut donated = Decimal::ZERO;
    let mut outcomes = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        let row = idx + 1;
        let donation = match accumulation {
            DonationAccumulation::Cumulative => {
                donated = donated
                    .checked_add(record.donation)
                    .ok_or_else(|| EngineError::BatchParse {
                        row,
                        message: "donation total is out of range".to_string(),
                    })?;
                donated
            }
            DonationAccumulation::Independent => record.donation,
        };

        let statement = IncomeStatement {
            total_income: record.total_income,
            wht: record.wht,
            allowances: vec![Allowance::donation(donation)],
        };
        let outcome = compute(&statement, deductions, options).map_err(|err| {
            EngineError::BatchParse {
                row,
                message: err.to_string(),
            }
        })?;

        outcomes.push(BatchOutcome {
            total_income: record.total_income,
            outcome,
        });
    }

    Ok(outcomes)
}

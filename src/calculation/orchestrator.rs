//! Tax calculation for a single income statement.
//!
//! Combines the deduction snapshot, allowance aggregation, and the bracket
//! walk into a [`TaxOutcome`].

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{DeductionConfig, IncomeStatement, TaxOutcome};

use super::allowance::total_allowance;
use super::brackets::{levels_from_total, tax_on};

/// Switches that shape the calculation output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationOptions {
    /// Attach the per-bracket breakdown to tax-due outcomes.
    pub detailed_levels: bool,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            detailed_levels: true,
        }
    }
}

fn out_of_range(field: &str) -> EngineError {
    EngineError::InvalidInput {
        field: field.to_string(),
        message: "amount is out of range".to_string(),
    }
}

/// Income left after the personal deduction and allowances, floored at zero.
pub fn taxable_base(
    statement: &IncomeStatement,
    deductions: &DeductionConfig,
) -> EngineResult<Decimal> {
    let total_deduction = deductions
        .personal_deduction
        .checked_add(total_allowance(&statement.allowances, deductions)?)
        .ok_or_else(|| out_of_range("allowances"))?;
    let base = statement
        .total_income
        .checked_sub(total_deduction)
        .ok_or_else(|| out_of_range("totalIncome"))?;
    Ok(base.max(Decimal::ZERO))
}

/// Calculates the tax owed or refunded for `statement`.
///
/// Withholding tax is subtracted once from the bracket total. A negative
/// result becomes a refund and never carries a breakdown. When
/// `options.detailed_levels` is set, a tax-due outcome carries the
/// breakdown rebuilt from the net tax plus withholding.
///
/// Amounts whose sums leave the `Decimal` range fail with `InvalidInput`.
///
/// # Example
///
/// ```
/// use tax_engine::calculation::{compute, CalculationOptions};
/// use tax_engine::models::{Allowance, DeductionConfig, IncomeStatement};
/// use rust_decimal_macros::dec;
///
/// let statement = IncomeStatement::new(dec!(500000), dec!(25000))
///     .with_allowance(Allowance::donation(dec!(0)));
/// let outcome = compute(&statement, &DeductionConfig::default(), CalculationOptions::default())
///     .unwrap();
/// assert_eq!(outcome.tax_due(), Some(dec!(4000)));
/// ```
pub fn compute(
    statement: &IncomeStatement,
    deductions: &DeductionConfig,
    options: CalculationOptions,
) -> EngineResult<TaxOutcome> {
    let gross_tax = tax_on(taxable_base(statement, deductions)?).total;
    let raw_tax = gross_tax
        .checked_sub(statement.wht)
        .ok_or_else(|| out_of_range("wht"))?;

    if raw_tax < Decimal::ZERO {
        return Ok(TaxOutcome::Refund { refund: -raw_tax });
    }

    let levels = options
        .detailed_levels
        .then(|| levels_from_total(gross_tax));

    Ok(TaxOutcome::Due {
        tax: raw_tax,
        levels,
    })
}

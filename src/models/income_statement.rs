//! Income statement model.
//!
//! An [`IncomeStatement`] is one taxpayer's declaration for one calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Allowance;

/// One taxpayer's declaration of income, withholding tax, and allowances.
///
/// # Example
///
/// ```
/// use tax_engine::models::{Allowance, IncomeStatement};
/// use rust_decimal_macros::dec;
///
/// let statement = IncomeStatement {
///     total_income: dec!(500000),
///     wht: dec!(0),
///     allowances: vec![Allowance::donation(dec!(0))],
/// };
/// assert!(statement.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    /// Gross income for the year.
    pub total_income: Decimal,
    /// Withholding tax already paid.
    pub wht: Decimal,
    /// Itemized allowances, in the order they were declared.
    #[serde(default)]
    pub allowances: Vec<Allowance>,
}

impl IncomeStatement {
    /// Creates a statement with no allowances.
    pub fn new(total_income: Decimal, wht: Decimal) -> Self {
        Self {
            total_income,
            wht,
            allowances: Vec::new(),
        }
    }

    /// Adds an allowance to the statement.
    pub fn with_allowance(mut self, allowance: Allowance) -> Self {
        self.allowances.push(allowance);
        self
    }

    /// Rejects statements with a negative income or withholding tax.
    ///
    /// Allowance amounts are not checked here; negative allowances are
    /// summed like any other amount by the aggregator.
    pub fn validate(&self) -> EngineResult<()> {
        if self.total_income < Decimal::ZERO {
            return Err(EngineError::InvalidInput {
                field: "totalIncome".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if self.wht < Decimal::ZERO {
            return Err(EngineError::InvalidInput {
                field: "wht".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

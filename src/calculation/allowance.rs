//! Allowance aggregation.
//!
//! Sums itemized allowances per category and applies each category's cap.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{EngineError, EngineResult};
use crate::models::{Allowance, AllowanceType, DeductionConfig};

/// Fixed cap on the summed donation allowances.
pub const DONATION_CAP: Decimal = dec!(100000);

/// Per-category totals after capping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllowanceTotals {
    /// Donation total, capped at [`DONATION_CAP`].
    pub donation: Decimal,
    /// K-receipt total, capped at the configured k-receipt cap.
    pub k_receipt: Decimal,
}

impl AllowanceTotals {
    /// The combined allowance deducted from income.
    pub fn total(&self) -> EngineResult<Decimal> {
        self.donation
            .checked_add(self.k_receipt)
            .ok_or_else(|| overflow("allowances"))
    }
}

fn overflow(field: &str) -> EngineError {
    EngineError::InvalidInput {
        field: field.to_string(),
        message: "amount is out of range".to_string(),
    }
}

/// Sums and caps allowances per category.
///
/// Categories are summed independently before capping, so the cap applies
/// to the category total rather than to each entry. Unrecognized categories
/// are ignored. A negative category total is passed through unchanged.
///
/// Fails with `InvalidInput` when a category sum leaves the `Decimal` range.
pub fn aggregate_allowances(
    allowances: &[Allowance],
    deductions: &DeductionConfig,
) -> EngineResult<AllowanceTotals> {
    let mut donation = Decimal::ZERO;
    let mut k_receipt = Decimal::ZERO;

    for allowance in allowances {
        let sum = match allowance.allowance_type {
            AllowanceType::Donation => &mut donation,
            AllowanceType::KReceipt => &mut k_receipt,
            AllowanceType::Other(_) => continue,
        };
        *sum = sum
            .checked_add(allowance.amount)
            .ok_or_else(|| overflow("allowances"))?;
    }

    Ok(AllowanceTotals {
        donation: donation.min(DONATION_CAP),
        k_receipt: k_receipt.min(deductions.k_receipt_cap),
    })
}

/// Returns the combined capped allowance for `allowances`.
///
/// # Example
///
/// ```
/// use tax_engine::calculation::total_allowance;
/// use tax_engine::models::{Allowance, DeductionConfig};
/// use rust_decimal_macros::dec;
///
/// let allowances = vec![
///     Allowance::donation(dec!(150000)),
///     Allowance::k_receipt(dec!(20000)),
/// ];
/// let total = total_allowance(&allowances, &DeductionConfig::default()).unwrap();
/// assert_eq!(total, dec!(120000));
/// ```
pub fn total_allowance(
    allowances: &[Allowance],
    deductions: &DeductionConfig,
) -> EngineResult<Decimal> {
    aggregate_allowances(allowances, deductions)?.total()
}

//! Tax outcome models.
//!
//! This module contains the [`TaxOutcome`] type returned by the orchestrator
//! and the [`BracketLevel`] rows of its optional breakdown.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the per-bracket breakdown.
///
/// `tax` is the amount attributable to this bracket alone, not a running
/// total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketLevel {
    /// The bracket's income range label (e.g., "150,001-500,000").
    pub level: String,
    /// Tax attributable to this bracket.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
}

/// The result of a tax calculation.
///
/// Exactly one of the two variants is produced, selected by the sign of the
/// net tax after withholding.
///
/// # Example
///
/// ```
/// use tax_engine::models::TaxOutcome;
/// use rust_decimal_macros::dec;
///
/// let outcome = TaxOutcome::Refund { refund: dec!(1500) };
/// let json = serde_json::to_value(&outcome).unwrap();
/// assert_eq!(json["taxRefund"], 1500.0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaxOutcome {
    /// Net tax is zero or positive.
    Due {
        /// Tax still owed after withholding.
        #[serde(with = "rust_decimal::serde::float")]
        tax: Decimal,
        /// Per-bracket breakdown of the pre-withholding total, when requested.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        levels: Option<Vec<BracketLevel>>,
    },
    /// Withholding exceeded the computed tax.
    Refund {
        /// Amount owed back to the taxpayer, always positive.
        #[serde(rename = "taxRefund", with = "rust_decimal::serde::float")]
        refund: Decimal,
    },
}

impl TaxOutcome {
    /// Returns the tax owed, or `None` for a refund.
    pub fn tax_due(&self) -> Option<Decimal> {
        match self {
            TaxOutcome::Due { tax, .. } => Some(*tax),
            TaxOutcome::Refund { .. } => None,
        }
    }

    /// Returns the refund amount, or `None` when tax is due.
    pub fn refund(&self) -> Option<Decimal> {
        match self {
            TaxOutcome::Due { .. } => None,
            TaxOutcome::Refund { refund } => Some(*refund),
        }
    }

    /// Returns the breakdown if one was attached.
    pub fn levels(&self) -> Option<&[BracketLevel]> {
        match self {
            TaxOutcome::Due { levels, .. } => levels.as_deref(),
            TaxOutcome::Refund { .. } => None,
        }
    }
}

/// The outcome of one batch record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// The record's total income, echoed back for correlation.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    /// The record's tax outcome, without breakdown.
    #[serde(flatten)]
    pub outcome: TaxOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_due_serializes_tax_and_levels() {
        let outcome = TaxOutcome::Due {
            tax: dec!(29000),
            levels: Some(vec![BracketLevel {
                level: "0-150,000".to_string(),
                tax: dec!(0),
            }]),
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["tax"], 29000.0);
        assert_eq!(json["levels"][0]["level"], "0-150,000");
        assert_eq!(json["levels"][0]["tax"], 0.0);
        assert!(json.get("taxRefund").is_none());
    }

    #[test]
    fn test_due_without_levels_omits_field() {
        let outcome = TaxOutcome::Due {
            tax: dec!(35000),
            levels: None,
        };

        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("levels"));
    }

    #[test]
    fn test_refund_serializes_tax_refund_only() {
        let json = serde_json::to_value(TaxOutcome::Refund { refund: dec!(4000) }).unwrap();

        assert_eq!(json["taxRefund"], 4000.0);
        assert!(json.get("tax").is_none());
    }

    #[test]
    fn test_accessors_are_mutually_exclusive() {
        let due = TaxOutcome::Due {
            tax: dec!(1),
            levels: None,
        };
        let refund = TaxOutcome::Refund { refund: dec!(1) };

        assert_eq!(due.tax_due(), Some(dec!(1)));
        assert_eq!(due.refund(), None);
        assert_eq!(refund.tax_due(), None);
        assert_eq!(refund.refund(), Some(dec!(1)));
    }

    #[test]
    fn test_batch_outcome_flattens_variant() {
        let outcome = BatchOutcome {
            total_income: dec!(500000),
            outcome: TaxOutcome::Due {
                tax: dec!(29000),
                levels: None,
            },
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["totalIncome"], 500000.0);
        assert_eq!(json["tax"], 29000.0);
    }
}

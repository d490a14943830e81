//! Deduction configuration model.
//!
//! Holds the two adjustable deduction parameters together with the bounds
//! that every update is validated against.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Personal deduction used when nothing has been persisted yet.
pub const DEFAULT_PERSONAL_DEDUCTION: Decimal = dec!(60000);

/// K-receipt cap used when nothing has been persisted yet.
pub const DEFAULT_K_RECEIPT_CAP: Decimal = dec!(50000);

/// Lowest personal deduction an administrator may set.
pub const PERSONAL_DEDUCTION_MIN: Decimal = dec!(60000);

/// Highest personal deduction an administrator may set.
pub const PERSONAL_DEDUCTION_MAX: Decimal = dec!(100000);

/// Highest k-receipt cap an administrator may set.
pub const K_RECEIPT_CAP_MAX: Decimal = dec!(100000);

/// The adjustable deduction fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeductionField {
    /// Flat deduction applied to every taxpayer.
    Personal,
    /// Cap on the k-receipt allowance category.
    KReceipt,
}

impl DeductionField {
    /// Returns the field name used in routes and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeductionField::Personal => "personal",
            DeductionField::KReceipt => "k-receipt",
        }
    }

    /// Checks that `amount` is an acceptable value for this field.
    ///
    /// # Example
    ///
    /// ```
    /// use tax_engine::models::DeductionField;
    /// use rust_decimal_macros::dec;
    ///
    /// assert!(DeductionField::Personal.validate(dec!(60001)).is_ok());
    /// assert!(DeductionField::Personal.validate(dec!(59999)).is_err());
    /// ```
    pub fn validate(&self, amount: Decimal) -> EngineResult<()> {
        let reject = |message: &str| {
            Err(EngineError::DeductionOutOfRange {
                field: self.as_str().to_string(),
                message: message.to_string(),
            })
        };

        match self {
            DeductionField::Personal => {
                if amount > PERSONAL_DEDUCTION_MAX {
                    return reject("Personal deduction must not exceed 100,000");
                }
                if amount < PERSONAL_DEDUCTION_MIN {
                    return reject("Personal deduction must start from 60,000");
                }
            }
            DeductionField::KReceipt => {
                if amount > K_RECEIPT_CAP_MAX {
                    return reject("K-receipt deduction must not exceed 100,000");
                }
                if amount <= Decimal::ZERO {
                    return reject("K-receipt deduction must be greater than 0");
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for DeductionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current deduction parameters.
///
/// Copied out of the store as a snapshot at the start of every calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionConfig {
    /// Flat deduction applied to every taxpayer.
    pub personal_deduction: Decimal,
    /// Cap on the summed k-receipt allowances.
    pub k_receipt_cap: Decimal,
}

impl Default for DeductionConfig {
    fn default() -> Self {
        Self {
            personal_deduction: DEFAULT_PERSONAL_DEDUCTION,
            k_receipt_cap: DEFAULT_K_RECEIPT_CAP,
        }
    }
}

impl DeductionConfig {
    /// Returns the current value of `field`.
    pub fn get(&self, field: DeductionField) -> Decimal {
        match field {
            DeductionField::Personal => self.personal_deduction,
            DeductionField::KReceipt => self.k_receipt_cap,
        }
    }

    /// Returns a copy with `field` set to `amount`, after validating it.
    pub fn with_field(&self, field: DeductionField, amount: Decimal) -> EngineResult<Self> {
        field.validate(amount)?;
        let mut updated = *self;
        match field {
            DeductionField::Personal => updated.personal_deduction = amount,
            DeductionField::KReceipt => updated.k_receipt_cap = amount,
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeductionConfig::default();
        assert_eq!(config.personal_deduction, dec!(60000));
        assert_eq!(config.k_receipt_cap, dec!(50000));
    }

    #[test]
    fn test_personal_bounds_are_inclusive() {
        assert!(DeductionField::Personal.validate(dec!(60000)).is_ok());
        assert!(DeductionField::Personal.validate(dec!(100000)).is_ok());
    }

    #[test]
    fn test_personal_above_max_is_rejected() {
        let err = DeductionField::Personal.validate(dec!(100001)).unwrap_err();
        assert_eq!(err.to_string(), "Personal deduction must not exceed 100,000");
    }

    #[test]
    fn test_personal_below_min_is_rejected() {
        let err = DeductionField::Personal.validate(dec!(59999)).unwrap_err();
        assert_eq!(err.to_string(), "Personal deduction must start from 60,000");
    }

    #[test]
    fn test_k_receipt_must_be_positive() {
        assert!(DeductionField::KReceipt.validate(dec!(0)).is_err());
        assert!(DeductionField::KReceipt.validate(dec!(0.01)).is_ok());
        assert!(DeductionField::KReceipt.validate(dec!(100000)).is_ok());
        assert!(DeductionField::KReceipt.validate(dec!(100000.01)).is_err());
    }

    #[test]
    fn test_with_field_leaves_other_field_untouched() {
        let config = DeductionConfig::default();
        let updated = config.with_field(DeductionField::KReceipt, dec!(70000)).unwrap();

        assert_eq!(updated.k_receipt_cap, dec!(70000));
        assert_eq!(updated.personal_deduction, config.personal_deduction);
        assert_eq!(updated.get(DeductionField::KReceipt), dec!(70000));
    }

    #[test]
    fn test_with_field_rejects_invalid_amount() {
        let config = DeductionConfig::default();
        let result = config.with_field(DeductionField::Personal, dec!(100001));

        assert!(matches!(
            result,
            Err(EngineError::DeductionOutOfRange { ref field, .. }) if field == "personal"
        ));
    }

    #[test]
    fn test_field_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&DeductionField::KReceipt).unwrap(),
            "\"k-receipt\""
        );
    }
}

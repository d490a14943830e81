//! Allowance model and related types.
//!
//! This module defines the Allowance struct and AllowanceType enum for
//! representing itemized deductions claimed on an income statement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The category of an itemized allowance.
///
/// Only `donation` and `k-receipt` reduce taxable income. Any other category
/// is kept as [`AllowanceType::Other`] so it deserializes cleanly but
/// contributes nothing.
///
/// # Example
///
/// ```
/// use tax_engine::models::AllowanceType;
///
/// assert_eq!(AllowanceType::from("k-receipt"), AllowanceType::KReceipt);
/// assert_eq!(AllowanceType::from("gym"), AllowanceType::Other("gym".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AllowanceType {
    /// Charitable donation, capped at a fixed amount.
    Donation,
    /// Spending on the k-receipt scheme, capped by the deduction configuration.
    KReceipt,
    /// An unrecognized category.
    Other(String),
}

impl AllowanceType {
    /// Returns the wire name of the category.
    pub fn as_str(&self) -> &str {
        match self {
            AllowanceType::Donation => "donation",
            AllowanceType::KReceipt => "k-receipt",
            AllowanceType::Other(name) => name,
        }
    }
}

impl From<&str> for AllowanceType {
    fn from(value: &str) -> Self {
        match value {
            "donation" => AllowanceType::Donation,
            "k-receipt" => AllowanceType::KReceipt,
            other => AllowanceType::Other(other.to_string()),
        }
    }
}

impl From<String> for AllowanceType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "donation" => AllowanceType::Donation,
            "k-receipt" => AllowanceType::KReceipt,
            _ => AllowanceType::Other(value),
        }
    }
}

impl From<AllowanceType> for String {
    fn from(value: AllowanceType) -> Self {
        match value {
            AllowanceType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// A single itemized allowance claimed by a taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allowance {
    /// The allowance category.
    pub allowance_type: AllowanceType,
    /// The claimed amount. Negative amounts are accepted and summed as-is.
    pub amount: Decimal,
}

impl Allowance {
    /// Creates a donation allowance.
    pub fn donation(amount: Decimal) -> Self {
        Self {
            allowance_type: AllowanceType::Donation,
            amount,
        }
    }

    /// Creates a k-receipt allowance.
    pub fn k_receipt(amount: Decimal) -> Self {
        Self {
            allowance_type: AllowanceType::KReceipt,
            amount,
        }
    }
}

//! Request types for the Tax Engine API.
//!
//! This module defines the JSON request structures for the calculation and
//! admin endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Allowance, AllowanceType, IncomeStatement};

/// Request body for the `/tax/calculations` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    /// Gross income for the year.
    pub total_income: Decimal,
    /// Withholding tax already paid.
    pub wht: Decimal,
    /// Itemized allowances.
    #[serde(default)]
    pub allowances: Vec<AllowanceRequest>,
}

/// Allowance information in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceRequest {
    /// The allowance category, e.g. `donation` or `k-receipt`.
    pub allowance_type: String,
    /// The claimed amount.
    pub amount: Decimal,
}

/// Request body for the admin deduction endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionRequest {
    /// The new deduction amount.
    pub amount: Decimal,
}

impl From<CalculationRequest> for IncomeStatement {
    fn from(req: CalculationRequest) -> Self {
        IncomeStatement {
            total_income: req.total_income,
            wht: req.wht,
            allowances: req.allowances.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<AllowanceRequest> for Allowance {
    fn from(req: AllowanceRequest) -> Self {
        Allowance {
            allowance_type: AllowanceType::from(req.allowance_type),
            amount: req.amount,
        }
    }
}

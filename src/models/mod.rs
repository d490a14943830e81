//! Core data models for the Tax Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod allowance;
mod deduction_config;
mod income_statement;
mod tax_outcome;

pub use allowance::{Allowance, AllowanceType};
pub use deduction_config::{
    DEFAULT_K_RECEIPT_CAP, DEFAULT_PERSONAL_DEDUCTION, DeductionConfig, DeductionField,
    K_RECEIPT_CAP_MAX, PERSONAL_DEDUCTION_MAX, PERSONAL_DEDUCTION_MIN,
};
pub use income_statement::IncomeStatement;
pub use tax_outcome::{BatchOutcome, BracketLevel, TaxOutcome};

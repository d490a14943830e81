//! Calculation logic for the Tax Engine.
//!
//! This module contains the pure calculation functions: allowance
//! aggregation with per-category caps, the progressive bracket walk and its
//! breakdown, the single-statement orchestrator that decides between tax due
//! and refund, and the batch processor for uploaded CSV records.

mod allowance;
mod batch;
mod brackets;
mod orchestrator;

pub use allowance::{AllowanceTotals, DONATION_CAP, aggregate_allowances, total_allowance};
pub use batch::{
    BATCH_COLUMNS, BatchRecord, DonationAccumulation, compute_batch, parse_records,
};
pub use brackets::{BRACKETS, Bracket, BracketTax, levels_from_total, tax_on};
pub use orchestrator::{CalculationOptions, compute, taxable_base};

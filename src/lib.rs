//! Personal Income Tax Engine
//!
//! This crate calculates progressive personal income tax from an annual
//! income statement: personal deduction, capped donation and k-receipt
//! allowances, five marginal brackets, and withholding tax settlement. It
//! also serves the calculation over HTTP, with batch CSV uploads and admin
//! endpoints for adjusting the deduction configuration.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

//! HTTP API module for the Tax Engine.
//!
//! This module provides the REST API endpoints for single and batch tax
//! calculations and the admin endpoints that adjust deductions.

mod auth;
mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AllowanceRequest, CalculationRequest, DeductionRequest};
pub use response::{ApiError, KReceiptResponse, PersonalDeductionResponse};
pub use state::AppState;

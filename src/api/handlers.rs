//! HTTP request handlers for the Tax Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        State,
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
    },
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{compute, compute_batch, parse_records};
use crate::error::EngineError;
use crate::models::{BatchOutcome, DeductionConfig, DeductionField, IncomeStatement};

use super::auth::require_admin;
use super::request::{CalculationRequest, DeductionRequest};
use super::response::{ApiError, ApiErrorResponse, KReceiptResponse, PersonalDeductionResponse};
use super::state::AppState;

/// Multipart field carrying the batch CSV.
const UPLOAD_FIELD: &str = "file";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/personal", post(personal_deduction_handler))
        .route("/k-receipt", post(k_receipt_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/", get(health_handler))
        .route("/tax/calculations", post(calculate_handler))
        .route("/tax/calculations/upload-csv", post(upload_csv_handler))
        .nest("/admin/deductions", admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for GET / endpoint.
async fn health_handler() -> Json<&'static str> {
    Json("Hello, Tax Engine!")
}

/// Handler for POST /tax/calculations endpoint.
///
/// Accepts an income statement and returns the tax due (with the bracket
/// breakdown) or the refund owed.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing tax calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };

    let statement: IncomeStatement = request.into();
    if let Err(err) = statement.validate() {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Income statement rejected"
        );
        return engine_error(err);
    }

    let start_time = Instant::now();
    let deductions = state.store().snapshot().await;
    let outcome = match compute(&statement, &deductions, state.calculation().options()) {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Tax calculation failed"
            );
            return engine_error(err);
        }
    };
    let duration = start_time.elapsed();

    info!(
        correlation_id = %correlation_id,
        total_income = %statement.total_income,
        allowances_count = statement.allowances.len(),
        tax = ?outcome.tax_due(),
        refund = ?outcome.refund(),
        duration_us = duration.as_micros(),
        "Tax calculation completed successfully"
    );
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(outcome),
    )
        .into_response()
}

fn engine_error(err: EngineError) -> Response {
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

/// Handler for POST /tax/calculations/upload-csv endpoint.
///
/// Reads the CSV from the `file` multipart field and returns one outcome
/// per data row, in input order. A single bad row fails the whole upload.
async fn upload_csv_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<BatchOutcome>>, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch calculation upload");

    let mut multipart = multipart.map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Multipart rejected"
        );
        ApiErrorResponse::bad_request(ApiError::new("INVALID_UPLOAD", rejection.body_text()))
    })?;

    let csv = read_upload(&mut multipart).await.map_err(|error| {
        warn!(
            correlation_id = %correlation_id,
            code = %error.code,
            message = %error.message,
            "Upload unreadable"
        );
        ApiErrorResponse::bad_request(error)
    })?;

    let start_time = Instant::now();
    let records = parse_records(&csv).map_err(|err| {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Batch rejected"
        );
        ApiErrorResponse::from(err)
    })?;

    let deductions = state.store().snapshot().await;
    let outcomes = compute_batch(&records, &deductions, state.calculation().batch_donations)
        .map_err(|err| {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Batch calculation failed"
            );
            ApiErrorResponse::from(err)
        })?;

    info!(
        correlation_id = %correlation_id,
        rows = outcomes.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Batch calculation completed successfully"
    );
    Ok(Json(outcomes))
}

/// Returns the text of the `file` field, skipping any other parts.
async fn read_upload(multipart: &mut Multipart) -> Result<String, ApiError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::new("INVALID_UPLOAD", e.body_text()))?;

        match field {
            Some(field) if field.name() == Some(UPLOAD_FIELD) => {
                return field
                    .text()
                    .await
                    .map_err(|e| ApiError::new("INVALID_UPLOAD", e.body_text()));
            }
            Some(_) => continue,
            None => return Err(ApiError::missing_file()),
        }
    }
}

/// Handler for POST /admin/deductions/personal endpoint.
async fn personal_deduction_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeductionRequest>, JsonRejection>,
) -> Result<Json<PersonalDeductionResponse>, ApiErrorResponse> {
    let config = update_deduction(&state, DeductionField::Personal, payload).await?;
    Ok(Json(PersonalDeductionResponse {
        personal_deduction: config.personal_deduction,
    }))
}

/// Handler for POST /admin/deductions/k-receipt endpoint.
async fn k_receipt_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeductionRequest>, JsonRejection>,
) -> Result<Json<KReceiptResponse>, ApiErrorResponse> {
    let config = update_deduction(&state, DeductionField::KReceipt, payload).await?;
    Ok(Json(KReceiptResponse {
        k_receipt: config.k_receipt_cap,
    }))
}

/// Applies an admin update to one deduction field.
async fn update_deduction(
    state: &AppState,
    field: DeductionField,
    payload: Result<Json<DeductionRequest>, JsonRejection>,
) -> Result<DeductionConfig, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, field = %field, "Processing deduction update");

    let Json(request) = payload.map_err(|rejection| json_rejection(correlation_id, rejection))?;

    state
        .store()
        .update(field, request.amount)
        .await
        .map_err(|err: EngineError| {
            warn!(
                correlation_id = %correlation_id,
                field = %field,
                error = %err,
                "Deduction update failed"
            );
            ApiErrorResponse::from(err)
        })
}

/// Maps a JSON body rejection to a `400` error response.
fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

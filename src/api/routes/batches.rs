//! Batch submission handlers.

use super::{FormResponse, FormSubmission, SubmitBatchRequest};
use crate::api::AppState;
use crate::error::Result;
use crate::types::{BatchSummary, Credential};
use axum::{Form, Json, extract::State};

/// POST / - Run a batch from the HTML form
#[utoipa::path(
    post,
    path = "/",
    tag = "batches",
    request_body(content = FormSubmission, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Batch finished; failed URLs are in the failure log", body = FormResponse),
        (status = 500, description = "Output directory or failure log unusable", body = crate::error::ApiError)
    )
)]
pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<FormSubmission>,
) -> Result<Json<FormResponse>> {
    let summary = state
        .orchestrator
        .run_batch(&form.url, &Credential::new(form.cookies))
        .await?;

    Ok(Json(FormResponse {
        message: summary.message,
        failure_log: state.config.output.failure_log.display().to_string(),
    }))
}

/// POST /batches - Run a batch from a JSON body
#[utoipa::path(
    post,
    path = "/api/v1/batches",
    tag = "batches",
    request_body = SubmitBatchRequest,
    responses(
        (status = 200, description = "Batch finished", body = BatchSummary),
        (status = 500, description = "Output directory or failure log unusable", body = crate::error::ApiError)
    )
)]
pub async fn submit_batch(
    State(state): State<AppState>,
    Json(request): Json<SubmitBatchRequest>,
) -> Result<Json<BatchSummary>> {
    let summary = state
        .orchestrator
        .run_batch(&request.urls, &Credential::new(request.cookies))
        .await?;

    Ok(Json(summary))
}

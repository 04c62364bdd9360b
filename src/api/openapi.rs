//! OpenAPI documentation and schema generation

use utoipa::OpenApi;

/// OpenAPI documentation for the zhihu-dl REST API
///
/// Served at `/api/v1/openapi.json` and, when enabled, browsable at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "zhihu-dl REST API",
        version = "0.1.0",
        description = "Submit batches of Zhihu URLs for retrieval to local storage",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    paths(
        crate::api::routes::submit_form,
        crate::api::routes::submit_batch,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(
        schemas(
            crate::api::routes::FormSubmission,
            crate::api::routes::SubmitBatchRequest,
            crate::api::routes::FormResponse,
            crate::types::BatchSummary,
            crate::error::ApiError,
            crate::error::ErrorDetail,
        )
    ),
    tags(
        (name = "batches", description = "Batch submission"),
        (name = "system", description = "Health and API documentation")
    )
)]
pub struct ApiDoc;

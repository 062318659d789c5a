use std::sync::Arc;

use axum::{
    Extension,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{Method, header},
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::middleware::RequestLocale;
use crate::models::AnalyzeImageRequest;
use crate::utils::{ApiError, ApiResult};

/// Analyze an image with the inference API
///
/// The body is read and parsed by hand instead of through `Json<T>`: an
/// unreadable, oversized or malformed body gets the same generic 500 as
/// every other failure.
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalyzeImageRequest,
    responses(
        (status = 200, description = "Inference API response, passed through unchanged"),
        (status = 405, description = "Method not allowed"),
        (status = 500, description = "Invalid body or inference API failure"),
    ),
    tag = "Analyze"
)]
pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    Extension(locale): Extension<RequestLocale>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Response> {
    let body = body.map_err(|rejection| anyhow::anyhow!("Unreadable request body: {}", rejection))?;
    let request: AnalyzeImageRequest =
        serde_json::from_slice(&body).map_err(ApiError::InvalidRequest)?;
    tracing::debug!("Analyze request: {:?}", request);

    let upstream = state.analyze_service.analyze(request, locale.language()).await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], upstream).into_response())
}

/// Fallback for every non-POST method on the analyze routes
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::method_not_allowed(method)
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Body returned for any request with a non-POST method.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";

/// Body returned for every other failure. Internal detail stays in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred.";

/// API Error with rich context and automatic error trait implementations
///
/// Every variant carries the detail needed in the server log. Only the
/// method check maps to its own client-facing status; everything else
/// collapses into one generic 500 at the response boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method {method} not allowed")]
    MethodNotAllowed { method: String },

    #[error("Invalid request body: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("Inference API returned {status} {reason}: {body}")]
    UpstreamStatus { status: u16, reason: String, body: String },

    #[error("Inference API returned a non-JSON body: {0}")]
    InvalidUpstreamBody(#[source] serde_json::Error),

    #[error("Inference API request failed: {0}")]
    UpstreamTransport(#[source] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// Helper to create method not allowed error
    pub fn method_not_allowed(method: impl std::fmt::Display) -> Self {
        Self::MethodNotAllowed { method: method.to_string() }
    }

    /// Helper to create upstream transport error
    ///
    /// The request URL carries the API key as a query parameter, so it is
    /// stripped before the error can be formatted anywhere.
    pub fn upstream_transport(err: reqwest::Error) -> Self {
        Self::UpstreamTransport(err.without_url())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match &self {
            Self::MethodNotAllowed { method } => {
                tracing::debug!("Rejected {} request", method);
                METHOD_NOT_ALLOWED_MESSAGE
            },
            _ => {
                tracing::error!(error = %self, "Request failed");
                INTERNAL_ERROR_MESSAGE
            },
        };

        (status, Json(ApiErrorResponse { error })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::Client;
use serde::de::IgnoredAny;
use std::time::{Duration, Instant};

use super::models::GenerateContentRequest;
use crate::config::UpstreamConfig;
use crate::utils::{ApiError, ApiResult};

/// Longest slice of an upstream error body kept for the log line.
const ERROR_BODY_LOG_LIMIT: usize = 512;

/// Sends one generateContent call and returns the raw JSON body.
///
/// Implementations make exactly one attempt: no retries, since every call
/// is billed upstream.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn generate_content(&self, request: &GenerateContentRequest) -> ApiResult<Bytes>;
}

pub struct GeminiClient {
    http_client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { http_client, endpoint: config.endpoint(), api_key: config.api_key.clone() }
    }

    /// generateContent URL, without the key
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InferenceClient for GeminiClient {
    async fn generate_content(&self, request: &GenerateContentRequest) -> ApiResult<Bytes> {
        tracing::debug!("Calling inference API at {}", self.endpoint);
        let started = Instant::now();

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(ApiError::upstream_transport)?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > ERROR_BODY_LOG_LIMIT {
                let cut = (0..=ERROR_BODY_LOG_LIMIT).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
                body.truncate(cut);
            }
            return Err(ApiError::UpstreamStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body,
            });
        }

        let body = response.bytes().await.map_err(ApiError::upstream_transport)?;
        serde_json::from_slice::<IgnoredAny>(&body).map_err(ApiError::InvalidUpstreamBody)?;

        tracing::debug!(
            "Inference API answered {} ({} bytes) in {} ms",
            status,
            body.len(),
            started.elapsed().as_millis()
        );
        Ok(body)
    }
}

use axum::body::Bytes;
use std::sync::Arc;
use std::time::Instant;

use crate::models::AnalyzeImageRequest;
use crate::services::gemini::{GenerateContentRequest, InferenceClient};
use crate::services::prompt;
use crate::utils::{ApiResult, normalize_language};

/// Turns an analyze request into one inference call.
pub struct AnalyzeService {
    client: Arc<dyn InferenceClient>,
}

impl AnalyzeService {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self { client }
    }

    /// Build the upstream payload for a request.
    ///
    /// `lang` in the body wins; `header_language` (from Accept-Language) is
    /// only consulted when the body has none. Anything unknown falls back
    /// to the default template language.
    pub fn prepare(
        request: AnalyzeImageRequest,
        header_language: Option<&str>,
    ) -> GenerateContentRequest {
        let requested = request.lang.as_deref().or(header_language);
        let resolved = prompt::resolve(requested);
        if let Some(code) = requested
            && resolved.language != normalize_language(code)
        {
            tracing::debug!(
                "No templates for language '{}', using '{}'",
                code,
                resolved.language
            );
        }

        let text = prompt::render_prompt(resolved.templates, &request.tone, request.question());
        tracing::debug!("Rendered {} prompt: {}", resolved.language, text);

        GenerateContentRequest::prompt_with_image(
            text,
            request.mime_type,
            request.base64_image_data,
        )
    }

    /// Render the prompt, call the inference API once, return its body.
    pub async fn analyze(
        &self,
        request: AnalyzeImageRequest,
        header_language: Option<&str>,
    ) -> ApiResult<Bytes> {
        let has_question = request.question().is_some();
        let lang = request.lang.clone();
        let payload = Self::prepare(request, header_language);

        let started = Instant::now();
        let body = self.client.generate_content(&payload).await?;
        tracing::info!(
            "Relayed analysis (lang={:?}, question={}) in {} ms",
            lang,
            has_question,
            started.elapsed().as_millis()
        );
        Ok(body)
    }
}

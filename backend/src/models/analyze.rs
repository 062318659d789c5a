use serde::Deserialize;
use utoipa::ToSchema;

/// Body of an analyze request
#[derive(Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageRequest {
    /// Base64 image bytes, without a data-URI prefix
    pub base64_image_data: String,
    /// Declared image type, e.g. `image/jpeg`; forwarded as-is
    pub mime_type: String,
    pub tone: String,
    #[serde(default)]
    pub question: Option<String>,
    /// Template language; unknown codes fall back to Italian
    #[serde(default)]
    pub lang: Option<String>,
}

impl AnalyzeImageRequest {
    /// The question, if one was actually asked. Empty strings count as absent.
    pub fn question(&self) -> Option<&str> {
        self.question.as_deref().filter(|question| !question.is_empty())
    }
}

// Image data can run to megabytes; keep it out of debug output.
impl std::fmt::Debug for AnalyzeImageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzeImageRequest")
            .field("base64_image_data", &format_args!("<{} bytes>", self.base64_image_data.len()))
            .field("mime_type", &self.mime_type)
            .field("tone", &self.tone)
            .field("question", &self.question)
            .field("lang", &self.lang)
            .finish()
    }
}

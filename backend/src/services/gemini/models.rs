//! generateContent request payload
//!
//! Only the request side is typed. The response is relayed to the caller
//! untouched, so it is never deserialized beyond a JSON well-formedness check.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 image bytes, without a data-URI prefix
    pub data: String,
}

impl GenerateContentRequest {
    /// Single user message: the prompt text, then the inline image.
    pub fn prompt_with_image(prompt: String, mime_type: String, data: String) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData { inline_data: InlineData { mime_type, data } },
                ],
            }],
        }
    }

    /// Text of the first text part, if any
    pub fn prompt_text(&self) -> Option<&str> {
        self.contents.iter().flat_map(|content| &content.parts).find_map(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            Part::InlineData { .. } => None,
        })
    }

    /// First inline image part, if any
    pub fn inline_image(&self) -> Option<&InlineData> {
        self.contents.iter().flat_map(|content| &content.parts).find_map(|part| match part {
            Part::InlineData { inline_data } => Some(inline_data),
            Part::Text { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let request = GenerateContentRequest::prompt_with_image(
            "describe".to_string(),
            "image/png".to_string(),
            "iVBORw0KGgo=".to_string(),
        );

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": "describe" },
                        { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_accessors() {
        let request = GenerateContentRequest::prompt_with_image(
            "describe".to_string(),
            "image/jpeg".to_string(),
            "abc".to_string(),
        );
        assert_eq!(request.prompt_text(), Some("describe"));
        let image = request.inline_image().unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "abc");
    }
}

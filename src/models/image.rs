use crate::error::{Result, SceneGenError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// Body of one `POST /generate-image` call.
///
/// Optional fields are left out of the JSON entirely when unset; the service
/// treats a missing `init_image` as plain text-to-image.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_image: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: None,
            model: None,
            init_image: None,
        }
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Attaches a base64-encoded reference image.
    pub fn with_init_image(mut self, init_image: impl Into<String>) -> Self {
        self.init_image = Some(init_image.into());
        self
    }
}

/// Successful response body. The service also echoes a `success` flag and may
/// add metadata; only `image` is required here.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub success: bool,
    pub image: String,
}

/// Failure response body; `error` may be absent on proxies or crashes.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<String>,
}

/// The most recent successful generation, kept for display, reuse and export.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Base64-encoded PNG bytes as returned by the service.
    pub image_data: String,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub model: String,
}

impl GenerationResult {
    pub fn image_bytes(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.image_data)
            .map_err(|e| SceneGenError::DecodeError(format!("Invalid base64 image data: {}", e)))
    }

    /// Sidecar text saved next to the exported image.
    pub fn metadata_text(&self) -> String {
        format!(
            "Prompt: {}\nNegative Prompt: {}\nModel: {}",
            self.prompt,
            self.negative_prompt.as_deref().unwrap_or("None"),
            self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_unset_fields() {
        let request = GenerationRequest::new("a ruined watchtower at dusk");
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"prompt":"a ruined watchtower at dusk"}"#);
    }

    #[test]
    fn request_serializes_all_fields_when_set() {
        let request = GenerationRequest::new("a ruined watchtower at dusk")
            .with_negative_prompt("blurry")
            .with_model("stability.stable-diffusion-xl-v1")
            .with_init_image("aGVsbG8=");
        let json: serde_json::Value =
            serde_json::to_value(&request).unwrap();

        assert_eq!(json["prompt"], "a ruined watchtower at dusk");
        assert_eq!(json["negative_prompt"], "blurry");
        assert_eq!(json["model"], "stability.stable-diffusion-xl-v1");
        assert_eq!(json["init_image"], "aGVsbG8=");
    }

    #[test]
    fn response_tolerates_missing_success_flag() {
        let response: GenerationResponse = serde_json::from_str(r#"{"image":"aGVsbG8="}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.image, "aGVsbG8=");
    }

    #[test]
    fn result_decodes_image_bytes() {
        let result = GenerationResult {
            image_data: "aGVsbG8=".to_string(),
            prompt: "p".to_string(),
            negative_prompt: None,
            model: "m".to_string(),
        };
        assert_eq!(result.image_bytes().unwrap(), b"hello");
    }

    #[test]
    fn result_rejects_invalid_base64() {
        let result = GenerationResult {
            image_data: "not base64!!!".to_string(),
            prompt: "p".to_string(),
            negative_prompt: None,
            model: "m".to_string(),
        };
        assert!(matches!(
            result.image_bytes(),
            Err(SceneGenError::DecodeError(_))
        ));
    }

    #[test]
    fn metadata_text_spells_out_missing_negative_prompt() {
        let result = GenerationResult {
            image_data: String::new(),
            prompt: "a tavern interior".to_string(),
            negative_prompt: None,
            model: "stability.stable-diffusion-xl-v1".to_string(),
        };
        assert_eq!(
            result.metadata_text(),
            "Prompt: a tavern interior\nNegative Prompt: None\nModel: stability.stable-diffusion-xl-v1"
        );
    }

    #[test]
    fn metadata_text_includes_negative_prompt_when_set() {
        let result = GenerationResult {
            image_data: String::new(),
            prompt: "a tavern interior".to_string(),
            negative_prompt: Some("modern furniture".to_string()),
            model: "m".to_string(),
        };
        assert!(result
            .metadata_text()
            .contains("Negative Prompt: modern furniture"));
    }
}

use crate::{
    config::SceneConfig,
    error::{Result, SceneGenError},
    models::{ApiErrorBody, GenerationRequest, GenerationResponse, DEFAULT_MODEL},
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
const GENERATE_PATH: &str = "/generate-image";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const GENERIC_FAILURE: &str = "Failed to generate image";

/// Seam between the session and the generation service, so the submit flow
/// can be exercised without a live server.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse>;
}

/// HTTP client for the scene generation service.
#[derive(Clone)]
pub struct SceneClient {
    client: Client,
    endpoint: String,
}

impl SceneClient {
    pub fn new(config: &SceneConfig) -> Result<Self> {
        let endpoint = normalize_endpoint(config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT));
        if endpoint.is_empty() {
            return Err(SceneGenError::ConfigError(
                "Endpoint must not be empty".into(),
            ));
        }

        let timeout = config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| SceneGenError::ConfigError(format!("Failed to build client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn generate_url(&self) -> String {
        format!("{}{}", self.endpoint, GENERATE_PATH)
    }
}

#[async_trait]
impl GenerationBackend for SceneClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        log::info!(
            "Generating image with model: {}",
            request.model.as_deref().unwrap_or(DEFAULT_MODEL)
        );
        let _timer = crate::logger::timer("generate-image");

        let response = self
            .client
            .post(self.generate_url())
            .json(request)
            .send()
            .await
            .map_err(|e| SceneGenError::RequestError(format_transport_error(&e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: ApiErrorBody = response
                .json()
                .await
                .unwrap_or(ApiErrorBody { error: None });
            let message = body.error.unwrap_or_else(|| GENERIC_FAILURE.to_string());
            log::warn!("Generation failed with status {}: {}", status, message);
            return Err(SceneGenError::ApiError(message));
        }

        let body: GenerationResponse = response
            .json()
            .await
            .map_err(|e| SceneGenError::ResponseError(format!("Malformed response body: {}", e)))?;

        if body.image.is_empty() {
            return Err(SceneGenError::ResponseError(
                "Response contained no image data".into(),
            ));
        }

        log::debug!("Received {} characters of image data", body.image.len());
        Ok(body)
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    let mut normalized = endpoint.trim().trim_end_matches('/').to_string();
    // Tolerate a base URL that already carries the generation path.
    if let Some(stripped) = normalized.strip_suffix(GENERATE_PATH) {
        normalized = stripped.trim_end_matches('/').to_string();
    }
    normalized
}

fn format_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        return "Request timed out waiting for the generation service".to_string();
    }
    if error.is_connect() {
        return "Could not connect to the generation service".to_string();
    }
    format!("Transport error: {}", error)
}

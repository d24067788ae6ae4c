use crate::{
    client::{GenerationBackend, SceneClient},
    config::SceneConfig,
    error::{Result, SceneGenError},
    export::{ExportPaths, Exporter},
    models::{GenerationRequest, GenerationResult, DEFAULT_MODEL},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::path::Path;

const EMPTY_PROMPT_MESSAGE: &str = "Please enter a prompt";
const NO_RESULT_MESSAGE: &str = "No image data available to save";

/// What the user currently sees: busy indicator, error banner, result panel.
///
/// Exactly one generation is in flight while `busy` is set; `submit` takes
/// `&mut self`, so a second submission cannot start before the first returns.
#[derive(Debug, Clone, Default)]
pub struct SurfaceState {
    pub busy: bool,
    pub error: Option<String>,
    pub showing_result: bool,
    pub can_export: bool,
}

/// Form values for one submission. Prompt is required; the rest fall back to
/// empty / the session's default model.
#[derive(Debug, Clone, Default)]
pub struct SceneForm {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub model: Option<String>,
}

impl SceneForm {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: None,
            model: None,
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
}

/// One user's interaction with the generation service.
///
/// Owns the interaction state that persists between submissions: the
/// uploaded reference buffer, the last successful result, the reuse toggle
/// (off on construction) and the visible surface state.
pub struct SceneSession<B: GenerationBackend> {
    backend: B,
    default_model: String,
    uploaded_image: Option<String>,
    last_result: Option<GenerationResult>,
    reuse_previous: bool,
    surface: SurfaceState,
}

impl SceneSession<SceneClient> {
    /// Session backed by a live HTTP client built from `config`.
    pub fn connect(config: &SceneConfig) -> Result<Self> {
        let client = SceneClient::new(config)?;
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        Ok(Self::new(client, model))
    }
}

impl<B: GenerationBackend> SceneSession<B> {
    pub fn new(backend: B, default_model: impl Into<String>) -> Self {
        Self {
            backend,
            default_model: default_model.into(),
            uploaded_image: None,
            last_result: None,
            reuse_previous: false,
            surface: SurfaceState::default(),
        }
    }

    pub fn surface(&self) -> &SurfaceState {
        &self.surface
    }

    pub fn last_result(&self) -> Option<&GenerationResult> {
        self.last_result.as_ref()
    }

    /// Enables or disables reusing the previous result as reference image.
    pub fn set_reuse_previous(&mut self, enabled: bool) {
        self.reuse_previous = enabled;
    }

    /// Loads a reference image from disk into the upload buffer.
    ///
    /// The buffer wins over the reuse toggle on the next submission and is
    /// cleared by the next successful generation.
    pub fn upload_reference(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            SceneGenError::ValidationError(format!(
                "Could not read reference image {}: {}",
                path.display(),
                e
            ))
        })?;
        self.upload_reference_bytes(&bytes)
    }

    /// Stores raw image bytes, base64-encoded, in the upload buffer.
    pub fn upload_reference_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Err(SceneGenError::ValidationError(
                "Reference image is empty".into(),
            ));
        }
        self.uploaded_image = Some(BASE64.encode(bytes));
        log::info!("Reference image loaded ({} bytes)", bytes.len());
        Ok(())
    }

    pub fn clear_reference(&mut self) {
        self.uploaded_image = None;
    }

    /// Submits one generation request built from `form`.
    ///
    /// Pre: session not busy (enforced by `&mut self`). Post: busy cleared;
    /// on success the result is stored, export is available and the upload
    /// buffer is cleared; on failure the error surface carries the message
    /// and any previous result is untouched.
    pub async fn submit(&mut self, form: &SceneForm) -> Result<&GenerationResult> {
        let prompt = form.prompt.trim();
        if prompt.is_empty() {
            self.surface.error = Some(EMPTY_PROMPT_MESSAGE.to_string());
            return Err(SceneGenError::ValidationError(
                EMPTY_PROMPT_MESSAGE.to_string(),
            ));
        }

        let negative_prompt = form
            .negative_prompt
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let model = form
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        let mut request = GenerationRequest::new(prompt).with_model(model.clone());
        if let Some(negative) = &negative_prompt {
            request = request.with_negative_prompt(negative.clone());
        }
        if let Some(reference) = self.resolve_reference() {
            request = request.with_init_image(reference);
        }

        self.surface.busy = true;
        self.surface.error = None;
        self.surface.showing_result = false;

        let outcome = self.backend.generate(&request).await;
        self.surface.busy = false;

        match outcome {
            Ok(response) => {
                let result = GenerationResult {
                    image_data: response.image,
                    prompt: prompt.to_string(),
                    negative_prompt,
                    model,
                };
                self.surface.showing_result = true;
                self.surface.can_export = true;
                // A consumed upload does not carry over to the next submit.
                self.uploaded_image = None;
                Ok(&*self.last_result.insert(result))
            }
            Err(e) => {
                self.surface.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Exports the last successful result through `exporter`.
    ///
    /// Fails fast without touching the filesystem when no result exists.
    pub async fn export(&self, exporter: &Exporter) -> Result<ExportPaths> {
        match &self.last_result {
            Some(result) => exporter.export(result).await,
            None => Err(SceneGenError::ExportError(NO_RESULT_MESSAGE.to_string())),
        }
    }

    /// Reference image for the next request: a fresh upload wins over reuse
    /// of the previous result; with neither, the field stays unset.
    fn resolve_reference(&self) -> Option<String> {
        if let Some(uploaded) = &self.uploaded_image {
            log::debug!("Using uploaded image as reference");
            return Some(uploaded.clone());
        }
        if self.reuse_previous {
            if let Some(result) = &self.last_result {
                if !result.image_data.is_empty() {
                    log::debug!("Using previous image as reference");
                    return Some(result.image_data.clone());
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationResponse;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockBackend {
        responses: Arc<Mutex<VecDeque<Result<GenerationResponse>>>>,
        calls: Arc<Mutex<Vec<GenerationRequest>>>,
    }

    impl MockBackend {
        fn with_responses(responses: Vec<Result<GenerationResponse>>) -> Self {
            Self {
                responses: Arc::new(Mutex::new(responses.into())),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn last_call(&self) -> GenerationRequest {
            self.calls.lock().unwrap().last().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationBackend for MockBackend {
        async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
            self.calls.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SceneGenError::ApiError("no scripted response".into())))
        }
    }

    fn ok_image(data: &str) -> Result<GenerationResponse> {
        Ok(GenerationResponse {
            success: true,
            image: data.to_string(),
        })
    }

    fn session_with(
        responses: Vec<Result<GenerationResponse>>,
    ) -> (SceneSession<MockBackend>, MockBackend) {
        let backend = MockBackend::with_responses(responses);
        let session = SceneSession::new(backend.clone(), DEFAULT_MODEL);
        (session, backend)
    }

    #[tokio::test]
    async fn empty_prompt_never_reaches_the_backend() {
        let (mut session, backend) = session_with(vec![ok_image("aGVsbG8=")]);

        let outcome = session.submit(&SceneForm::new("   ")).await;

        assert!(matches!(outcome, Err(SceneGenError::ValidationError(_))));
        assert_eq!(backend.call_count(), 0);
        assert_eq!(
            session.surface().error.as_deref(),
            Some("Please enter a prompt")
        );
        assert!(!session.surface().busy);
    }

    #[tokio::test]
    async fn uploaded_image_wins_over_reuse() {
        let (mut session, backend) =
            session_with(vec![ok_image("Zmlyc3Q="), ok_image("c2Vjb25k")]);

        session.submit(&SceneForm::new("a castle")).await.unwrap();
        session.set_reuse_previous(true);
        session.upload_reference_bytes(b"fresh upload").unwrap();

        session.submit(&SceneForm::new("a castle")).await.unwrap();

        let request = backend.last_call();
        assert_eq!(request.init_image.as_deref(), Some("ZnJlc2ggdXBsb2Fk"));
    }

    #[tokio::test]
    async fn reuse_attaches_previous_result() {
        let (mut session, backend) =
            session_with(vec![ok_image("Zmlyc3Q="), ok_image("c2Vjb25k")]);

        session.submit(&SceneForm::new("a castle")).await.unwrap();
        session.set_reuse_previous(true);
        session.submit(&SceneForm::new("the same castle")).await.unwrap();

        let request = backend.last_call();
        assert_eq!(request.init_image.as_deref(), Some("Zmlyc3Q="));
    }

    #[tokio::test]
    async fn no_reference_is_sent_when_reuse_is_off() {
        let (mut session, backend) =
            session_with(vec![ok_image("Zmlyc3Q="), ok_image("c2Vjb25k")]);

        session.submit(&SceneForm::new("a castle")).await.unwrap();
        session.submit(&SceneForm::new("another castle")).await.unwrap();

        let request = backend.last_call();
        assert!(request.init_image.is_none());
    }

    #[tokio::test]
    async fn success_stores_result_and_enables_export() {
        let (mut session, _backend) = session_with(vec![ok_image("aGVsbG8=")]);

        let form = SceneForm::new("  a misty forest  ")
            .with_negative_prompt(" blurry ")
            .with_model("amazon.titan-image-generator-v1");
        session.submit(&form).await.unwrap();

        let result = session.last_result().unwrap();
        assert_eq!(result.image_bytes().unwrap(), b"hello");
        assert_eq!(result.prompt, "a misty forest");
        assert_eq!(result.negative_prompt.as_deref(), Some("blurry"));
        assert_eq!(result.model, "amazon.titan-image-generator-v1");

        assert!(session.surface().can_export);
        assert!(session.surface().showing_result);
        assert!(!session.surface().busy);
        assert!(session.surface().error.is_none());
    }

    #[tokio::test]
    async fn blank_negative_prompt_is_dropped() {
        let (mut session, backend) = session_with(vec![ok_image("aGVsbG8=")]);

        let form = SceneForm::new("a misty forest").with_negative_prompt("   ");
        session.submit(&form).await.unwrap();

        assert!(backend.last_call().negative_prompt.is_none());
    }

    #[tokio::test]
    async fn success_clears_the_upload_buffer() {
        let (mut session, backend) =
            session_with(vec![ok_image("Zmlyc3Q="), ok_image("c2Vjb25k")]);

        session.upload_reference_bytes(b"reference").unwrap();
        session.submit(&SceneForm::new("a castle")).await.unwrap();
        session.submit(&SceneForm::new("a castle")).await.unwrap();

        assert!(backend.last_call().init_image.is_none());
    }

    #[tokio::test]
    async fn failure_surfaces_server_message_and_keeps_prior_result() {
        let (mut session, _backend) = session_with(vec![
            ok_image("Zmlyc3Q="),
            Err(SceneGenError::ApiError("bad model".into())),
        ]);

        session.submit(&SceneForm::new("a castle")).await.unwrap();
        let outcome = session.submit(&SceneForm::new("a castle")).await;

        assert!(outcome.is_err());
        assert_eq!(session.surface().error.as_deref(), Some("bad model"));
        assert!(!session.surface().busy);
        assert_eq!(session.last_result().unwrap().image_data, "Zmlyc3Q=");
        assert!(session.surface().can_export);
    }

    #[tokio::test]
    async fn failure_keeps_upload_buffer_for_a_retry() {
        let (mut session, backend) = session_with(vec![
            Err(SceneGenError::RequestError("connection refused".into())),
            ok_image("aGVsbG8="),
        ]);

        session.upload_reference_bytes(b"reference").unwrap();
        let _ = session.submit(&SceneForm::new("a castle")).await;
        session.submit(&SceneForm::new("a castle")).await.unwrap();

        assert!(backend.last_call().init_image.is_some());
    }

    #[tokio::test]
    async fn export_without_result_fails_fast() {
        let (session, _backend) = session_with(vec![]);
        let exporter = Exporter::new(std::env::temp_dir(), "never-written");

        let outcome = session.export(&exporter).await;
        assert!(matches!(outcome, Err(SceneGenError::ExportError(_))));
    }

    #[test]
    fn empty_upload_is_rejected() {
        let (mut session, _backend) = session_with(vec![]);
        let outcome = session.upload_reference_bytes(b"");
        assert!(matches!(outcome, Err(SceneGenError::ValidationError(_))));
    }
}

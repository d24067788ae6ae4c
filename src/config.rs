use std::env;

/// Client configuration for the scene generation service.
///
/// Unset fields fall back to crate defaults at the point of use:
/// the endpoint defaults to the local development server, the model to the
/// catalog default, the export prefix to `dnd-scene`.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub output_dir: Option<String>,
    pub file_prefix: Option<String>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            endpoint: None,
            model: None,
            timeout_secs: None,
            output_dir: None,
            file_prefix: None,
        }
    }
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let endpoint = env::var("SCENEGEN_ENDPOINT").ok();
        let model = env::var("SCENEGEN_MODEL").ok();
        let timeout_secs = env::var("SCENEGEN_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok());
        let output_dir = env::var("SCENEGEN_OUTPUT_DIR").ok();
        let file_prefix = env::var("SCENEGEN_FILE_PREFIX").ok();

        SceneConfig {
            endpoint,
            model,
            timeout_secs,
            output_dir,
            file_prefix,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<String>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_file_prefix(mut self, file_prefix: impl Into<String>) -> Self {
        self.file_prefix = Some(file_prefix.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_fields() {
        let config = SceneConfig::new()
            .with_endpoint("http://10.0.0.2:5000")
            .with_model("stability.stable-diffusion-xl-v1")
            .with_timeout_secs(30)
            .with_output_dir("/tmp/scenes")
            .with_file_prefix("tavern");

        assert_eq!(config.endpoint.as_deref(), Some("http://10.0.0.2:5000"));
        assert_eq!(
            config.model.as_deref(),
            Some("stability.stable-diffusion-xl-v1")
        );
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.output_dir.as_deref(), Some("/tmp/scenes"));
        assert_eq!(config.file_prefix.as_deref(), Some("tavern"));
    }

    #[test]
    fn default_leaves_everything_unset() {
        let config = SceneConfig::default();
        assert!(config.endpoint.is_none());
        assert!(config.model.is_none());
        assert!(config.timeout_secs.is_none());
    }
}

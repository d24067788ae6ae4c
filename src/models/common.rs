use serde::{Deserialize, Serialize};

/// Model id the service falls back to when a request carries none.
pub const DEFAULT_MODEL: &str = "stability.stable-diffusion-xl-v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: String,
}

impl ModelInfo {
    fn new(id: &str, name: &str, provider: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            provider: provider.to_string(),
        }
    }
}

/// Models known to the generation service, for populating a selector.
///
/// The service decides what it actually supports; this list only mirrors the
/// ids it advertises.
pub fn supported_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo::new(DEFAULT_MODEL, "Stable Diffusion XL", "Stability AI"),
        ModelInfo::new(
            "amazon.titan-image-generator-v1",
            "Titan Image Generator",
            "Amazon",
        ),
        ModelInfo::new("amazon.nova-canvas-v1:0", "Nova Canvas", "Amazon"),
    ]
}

use std::fmt;

#[derive(Debug)]
pub enum SceneGenError {
    ConfigError(String),
    ValidationError(String),
    RequestError(String),
    ResponseError(String),
    SerializationError(String),
    ApiError(String),
    DecodeError(String),
    ExportError(String),
}

impl SceneGenError {
    /// Message suitable for the user-facing error surface.
    ///
    /// Server-provided and validation messages are shown verbatim; everything
    /// else keeps its category prefix.
    pub fn user_message(&self) -> String {
        match self {
            SceneGenError::ApiError(msg) | SceneGenError::ValidationError(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for SceneGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneGenError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            SceneGenError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            SceneGenError::RequestError(msg) => write!(f, "Request error: {}", msg),
            SceneGenError::ResponseError(msg) => write!(f, "Response error: {}", msg),
            SceneGenError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            SceneGenError::ApiError(msg) => write!(f, "API error: {}", msg),
            SceneGenError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            SceneGenError::ExportError(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for SceneGenError {}

pub type Result<T> = std::result::Result<T, SceneGenError>;

//! Scenegen is a client for a scene image-generation service exposing a
//! single JSON endpoint (`POST /generate-image`).
//!
//! The crate mirrors the interaction model of the service's web page: a
//! [`SceneSession`] holds the prompt form state, an optional reference image
//! (uploaded, or reused from the previous result) and the last successful
//! generation, and an [`Exporter`] saves that result to disk as a PNG plus a
//! metadata text file.
//!
//! ```no_run
//! use scenegen::{Exporter, SceneConfig, SceneForm, SceneSession};
//!
//! # async fn run() -> scenegen::Result<()> {
//! let config = SceneConfig::from_env();
//! let mut session = SceneSession::connect(&config)?;
//!
//! let form = SceneForm::new("a ruined watchtower at dusk")
//!     .with_negative_prompt("blurry, modern");
//! session.submit(&form).await?;
//!
//! let exporter = Exporter::from_config(&config);
//! let paths = session.export(&exporter).await?;
//! println!("saved {}", paths.image.display());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod logger;
pub mod models;
pub mod session;

pub use client::{GenerationBackend, SceneClient, DEFAULT_ENDPOINT};
pub use config::SceneConfig;
pub use error::{Result, SceneGenError};
pub use export::{ExportPaths, Exporter, DEFAULT_FILE_PREFIX};
pub use models::{
    supported_models, GenerationRequest, GenerationResponse, GenerationResult, ModelInfo,
    DEFAULT_MODEL,
};
pub use session::{SceneForm, SceneSession, SurfaceState};

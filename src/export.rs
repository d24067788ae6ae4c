use crate::{
    config::SceneConfig,
    error::{Result, SceneGenError},
    models::GenerationResult,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_FILE_PREFIX: &str = "dnd-scene";
const DEFAULT_DOWNLOAD_DELAY_MS: u64 = 100;

/// Files written by one export: the image and its metadata sidecar, sharing
/// a timestamp-derived stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub image: PathBuf,
    pub metadata: PathBuf,
}

/// Writes a generation result to disk as `<prefix>-<timestamp>.png` plus
/// `<prefix>-<timestamp>.txt`.
///
/// The metadata file is written a fixed delay after the image, as an
/// explicit awaited step, so consumers watching the directory always see the
/// image land first.
pub struct Exporter {
    output_dir: PathBuf,
    file_prefix: String,
    delay: Duration,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_prefix: file_prefix.into(),
            delay: Duration::from_millis(DEFAULT_DOWNLOAD_DELAY_MS),
        }
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(
            config.output_dir.as_deref().unwrap_or("."),
            config.file_prefix.as_deref().unwrap_or(DEFAULT_FILE_PREFIX),
        )
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Writes the image, waits, then writes the metadata text.
    ///
    /// Fails before touching the filesystem when the result carries no image
    /// data or the data does not decode; the in-memory result is never
    /// modified.
    pub async fn export(&self, result: &GenerationResult) -> Result<ExportPaths> {
        if result.image_data.is_empty() {
            return Err(SceneGenError::ExportError(
                "No image data available to save".into(),
            ));
        }
        let image_bytes = result.image_bytes()?;

        fs::create_dir_all(&self.output_dir).map_err(|e| {
            SceneGenError::ExportError(format!(
                "Could not create {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let stem = filename_stem(&self.file_prefix, Utc::now());
        let image_path = self.output_dir.join(format!("{}.png", stem));
        write_file(&image_path, &image_bytes)?;
        log::info!("Image saved to: {}", image_path.display());

        tokio::time::sleep(self.delay).await;

        let metadata_path = self.output_dir.join(format!("{}.txt", stem));
        write_file(&metadata_path, result.metadata_text().as_bytes())?;
        log::info!("Metadata saved to: {}", metadata_path.display());

        Ok(ExportPaths {
            image: image_path,
            metadata: metadata_path,
        })
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents)
        .map_err(|e| SceneGenError::ExportError(format!("Could not write {}: {}", path.display(), e)))
}

/// `<prefix>-<timestamp>` with the RFC 3339 instant made filename-safe by
/// replacing `:` and `.` with `-`.
fn filename_stem(prefix: &str, instant: DateTime<Utc>) -> String {
    let timestamp = instant
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}-{}", prefix, timestamp)
}

use scenegen::{Exporter, SceneConfig, SceneForm, SceneSession};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    scenegen::logger::init_with_config(
        scenegen::logger::LoggerConfig::development()
            .with_level(scenegen::logger::LogLevel::Debug),
    )?;

    let config = SceneConfig::from_env();
    log::info!(
        "🌐 Generation endpoint: {}",
        config
            .endpoint
            .as_deref()
            .unwrap_or(scenegen::DEFAULT_ENDPOINT)
    );

    log::info!("🖼️  Known generation models:");
    for model in scenegen::supported_models() {
        log::info!("  {} - {} ({})", model.id, model.name, model.provider);
    }

    // Prompt comes from the command line; negative prompt and reference
    // image from the environment.
    let args: Vec<String> = env::args().skip(1).collect();
    let prompt = if args.is_empty() {
        "A torch-lit dungeon corridor with mossy stone walls, digital art style".to_string()
    } else {
        args.join(" ")
    };
    let negative_prompt = env::var("SCENEGEN_NEGATIVE_PROMPT").ok();

    let mut session = match SceneSession::connect(&config) {
        Ok(session) => {
            log::info!("✅ Client initialized");
            session
        }
        Err(e) => {
            log::error!("❌ Failed to initialize client: {}", e);
            return Err(e.into());
        }
    };

    if let Ok(path) = env::var("SCENEGEN_REFERENCE_IMAGE") {
        match session.upload_reference(&path) {
            Ok(_) => log::info!("📎 Using reference image: {}", path),
            Err(e) => log::warn!("⚠️  Skipping reference image: {}", e),
        }
    }

    let mut form = SceneForm::new(&prompt);
    if let Some(negative) = &negative_prompt {
        form = form.with_negative_prompt(negative);
    }
    if let Some(model) = &config.model {
        form = form.with_model(model);
    }

    log::info!("🎨 Generating scene for prompt: {}", prompt);
    match session.submit(&form).await {
        Ok(result) => {
            log::info!("✅ Generation successful with model {}", result.model);
            log::info!(
                "📏 Image data length: {} characters",
                result.image_data.len()
            );
        }
        Err(e) => {
            log::error!("❌ Generation failed: {}", e.user_message());
            log::warn!("💡 Is the generation service running at the configured endpoint?");
            return Err(e.into());
        }
    }

    let exporter = Exporter::from_config(&config);
    match session.export(&exporter).await {
        Ok(paths) => {
            log::info!("💾 Image saved to: {}", paths.image.display());
            log::info!("📝 Metadata saved to: {}", paths.metadata.display());
        }
        Err(e) => {
            log::error!("❌ Failed to save result: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

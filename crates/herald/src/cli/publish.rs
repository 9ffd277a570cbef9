//! Publish command handler.

use super::commands::OutputFormat;
use herald::{ConfigError, HeraldConfig, HeraldResult, ImageSource};
use std::path::Path;

/// Read an image from disk as a base64 `data:` URL.
pub fn image_source_from_file(path: &Path) -> HeraldResult<ImageSource> {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let mime = match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => {
            return Err(ConfigError::new(format!(
                "Unsupported image type: {} (expected png, jpg, gif or webp)",
                path.display()
            ))
            .into());
        }
    };

    let bytes = std::fs::read(path).map_err(|e| {
        ConfigError::new(format!("Failed to read image {}: {}", path.display(), e))
    })?;

    Ok(ImageSource::Base64(format!(
        "data:{};base64,{}",
        mime,
        STANDARD.encode(bytes)
    )))
}

/// Publish a stored draft to X.
#[cfg(feature = "database")]
pub async fn handle_publish(
    config: &HeraldConfig,
    draft_id: &str,
    dry_run: bool,
    image: Option<ImageSource>,
    format: OutputFormat,
) -> HeraldResult<()> {
    use super::output::print_outcome;
    use herald::{PostgresThreadRepository, PublishOrchestrator, XClient, establish_connection};
    use std::sync::Arc;

    config.validate(!dry_run)?;

    // A dry run never reaches the platform, so it works without a token.
    let client = if dry_run {
        XClient::new(Default::default(), config.x.api_base_url.clone(), "")
    } else {
        XClient::from_config(&config.x)?
    };

    let repository = Arc::new(PostgresThreadRepository::new(establish_connection()?));
    let orchestrator = PublishOrchestrator::new(repository, Arc::new(client), &config.publish);
    let outcome = orchestrator.publish(draft_id, dry_run, image).await?;
    print_outcome(&outcome, format)
}

#[cfg(not(feature = "database"))]
pub async fn handle_publish(
    _config: &HeraldConfig,
    _draft_id: &str,
    _dry_run: bool,
    _image: Option<ImageSource>,
    _format: OutputFormat,
) -> HeraldResult<()> {
    eprintln!("Error: Database feature not enabled. Rebuild with --features database");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_file_becomes_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.PNG");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let source = image_source_from_file(&path).unwrap();
        assert_eq!(
            source,
            ImageSource::Base64("data:image/png;base64,iVBORw==".to_string())
        );
    }

    #[test]
    fn test_unsupported_image_type_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let err = image_source_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported image type"));
    }
}

//! Herald CLI binary.
//!
//! This binary provides command-line access to Herald's pipeline:
//! - Segment content records into thread drafts
//! - Publish drafts to X, resuming interrupted runs
//! - Inspect drafts and preview segmentation from JSON files

use clap::Parser;
use herald::HeraldConfig;
use herald::telemetry::init_telemetry;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, handle_draft, handle_preview, handle_publish, handle_show,
        image_source_from_file,
    };

    // Missing .env is fine; the environment may already be set
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => HeraldConfig::from_file(path)?,
        None => HeraldConfig::load()?,
    };

    // Initialize tracing
    init_telemetry(&config.logging, cli.verbose)?;
    config.validate(false)?;

    // Execute the requested command
    match cli.command {
        Commands::Draft {
            content_id,
            cta_url,
            mode,
            force,
        } => {
            handle_draft(
                &config,
                &content_id,
                cta_url.as_deref(),
                mode,
                force,
                cli.format,
            )
            .await?;
        }

        Commands::Publish {
            draft_id,
            dry_run,
            image_url,
            image_file,
        } => {
            let image = match (image_url, image_file) {
                (Some(url), _) => Some(herald::ImageSource::Url(url)),
                (None, Some(path)) => Some(image_source_from_file(&path)?),
                (None, None) => None,
            };
            handle_publish(&config, &draft_id, dry_run, image, cli.format).await?;
        }

        Commands::Show { draft_id } => {
            handle_show(&config, &draft_id, cli.format).await?;
        }

        Commands::Preview {
            content,
            cta_url,
            mode,
        } => {
            handle_preview(&config, &content, cta_url.as_deref(), mode, cli.format).await?;
        }
    }

    Ok(())
}

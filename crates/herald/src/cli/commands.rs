//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use herald::PostingMode;
use std::path::PathBuf;

/// Herald - Publish newsletter issues as resumable X threads
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(about = "Publish newsletter issues as resumable X threads", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (replaces the default search path)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Segment a content record and store it as a ready thread draft
    Draft {
        /// ID of the content record
        content_id: String,

        /// Call-to-action link (defaults to <public_site_url>/posts/<slug>)
        #[arg(long)]
        cta_url: Option<String>,

        /// Segmentation mode (defaults to thread.default_mode)
        #[arg(long)]
        mode: Option<ModeArg>,

        /// Rewrite a draft left in the publishing status by a run that died
        #[arg(long)]
        force: bool,
    },

    /// Publish a draft, resuming from the first unposted unit
    Publish {
        /// ID of the thread draft
        draft_id: String,

        /// Show what would be posted without sending anything
        #[arg(long)]
        dry_run: bool,

        /// Image to attach to the root post, fetched from a URL
        #[arg(long, conflicts_with = "image_file")]
        image_url: Option<String>,

        /// Image to attach to the root post, read from disk
        #[arg(long)]
        image_file: Option<PathBuf>,
    },

    /// Show a draft with its units and publication state
    Show {
        /// ID of the thread draft
        draft_id: String,
    },

    /// Segment a content record from a JSON file without touching the database
    Preview {
        /// Path to the content record JSON file
        #[arg(long)]
        content: PathBuf,

        /// Call-to-action link (defaults to <public_site_url>/posts/<slug>)
        #[arg(long)]
        cta_url: Option<String>,

        /// Segmentation mode (defaults to thread.default_mode)
        #[arg(long)]
        mode: Option<ModeArg>,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

/// Segmentation mode options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// One post per section, chained as replies
    Thread,
    /// Everything condensed into one post
    Single,
}

impl From<ModeArg> for PostingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Thread => PostingMode::Thread,
            ModeArg::Single => PostingMode::Single,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_draft_with_options() {
        let cli = Cli::try_parse_from([
            "herald",
            "draft",
            "issue_42",
            "--cta-url",
            "https://site.example/posts/x",
            "--mode",
            "single",
        ])
        .unwrap();

        match cli.command {
            Commands::Draft {
                content_id,
                cta_url,
                mode,
                force,
            } => {
                assert_eq!(content_id, "issue_42");
                assert_eq!(cta_url.as_deref(), Some("https://site.example/posts/x"));
                assert_eq!(mode, Some(ModeArg::Single));
                assert!(!force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.format, OutputFormat::Human);
    }

    #[test]
    fn test_parse_draft_force() {
        let cli = Cli::try_parse_from(["herald", "draft", "issue_42", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::Draft { force: true, .. }));
    }

    #[test]
    fn test_parse_publish_dry_run_with_global_format() {
        let cli =
            Cli::try_parse_from(["herald", "publish", "x_issue_42", "--dry-run", "--format", "json"])
                .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Publish { dry_run: true, ref draft_id, .. } if draft_id == "x_issue_42"
        ));
    }

    #[test]
    fn test_image_sources_conflict() {
        let result = Cli::try_parse_from([
            "herald",
            "publish",
            "x_issue_42",
            "--image-url",
            "https://cdn.example/a.png",
            "--image-file",
            "a.png",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_preview_requires_content_file() {
        assert!(Cli::try_parse_from(["herald", "preview"]).is_err());

        let cli = Cli::try_parse_from(["herald", "preview", "--content", "issue.json", "-v"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Preview { mode: None, .. }));
    }

    #[test]
    fn test_mode_arg_converts() {
        assert_eq!(PostingMode::from(ModeArg::Thread), PostingMode::Thread);
        assert_eq!(PostingMode::from(ModeArg::Single), PostingMode::Single);
    }
}

//! Draft command handlers.

use super::commands::{ModeArg, OutputFormat};
use super::output::{print_summary, print_thread};
use herald::{
    ConfigError, ContentRecord, DraftManager, HeraldConfig, HeraldResult, InMemoryStore,
    JsonError,
};
use std::path::Path;
use std::sync::Arc;

/// Segment a stored content record into a ready draft.
#[cfg(feature = "database")]
pub async fn handle_draft(
    config: &HeraldConfig,
    content_id: &str,
    cta_url: Option<&str>,
    mode: Option<ModeArg>,
    force: bool,
    format: OutputFormat,
) -> HeraldResult<()> {
    use herald::{PostgresThreadRepository, establish_connection};

    let repository = Arc::new(PostgresThreadRepository::new(establish_connection()?));
    let manager = DraftManager::new(repository, config);
    let mode = mode.map(Into::into);
    let summary = if force {
        manager.force_refresh_draft(content_id, cta_url, mode).await?
    } else {
        manager.create_or_refresh_draft(content_id, cta_url, mode).await?
    };
    print_summary(&summary, format)
}

#[cfg(not(feature = "database"))]
pub async fn handle_draft(
    _config: &HeraldConfig,
    _content_id: &str,
    _cta_url: Option<&str>,
    _mode: Option<ModeArg>,
    _force: bool,
    _format: OutputFormat,
) -> HeraldResult<()> {
    eprintln!("Error: Database feature not enabled. Rebuild with --features database");
    std::process::exit(1);
}

/// Show a stored draft with its units.
#[cfg(feature = "database")]
pub async fn handle_show(
    config: &HeraldConfig,
    draft_id: &str,
    format: OutputFormat,
) -> HeraldResult<()> {
    use herald::{PostgresThreadRepository, establish_connection};

    let repository = Arc::new(PostgresThreadRepository::new(establish_connection()?));
    let manager = DraftManager::new(repository, config);
    let thread = manager.get_draft(draft_id).await?;
    print_thread(&thread, format)
}

#[cfg(not(feature = "database"))]
pub async fn handle_show(
    _config: &HeraldConfig,
    _draft_id: &str,
    _format: OutputFormat,
) -> HeraldResult<()> {
    eprintln!("Error: Database feature not enabled. Rebuild with --features database");
    std::process::exit(1);
}

/// Read a content record from a JSON file.
pub fn load_content_file(path: &Path) -> HeraldResult<ContentRecord> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::new(format!(
            "Failed to read content file {}: {}",
            path.display(),
            e
        ))
    })?;
    let record = serde_json::from_str(&raw).map_err(|e| {
        JsonError::new(format!("Invalid content file {}: {}", path.display(), e))
    })?;
    Ok(record)
}

/// Segment a content record from a file using an in-memory store.
pub async fn handle_preview(
    config: &HeraldConfig,
    content: &Path,
    cta_url: Option<&str>,
    mode: Option<ModeArg>,
    format: OutputFormat,
) -> HeraldResult<()> {
    let record = load_content_file(content)?;
    let content_id = record.id().clone();

    let store = Arc::new(InMemoryStore::with_contents([record]).await);
    let manager = DraftManager::new(store, config);
    let summary = manager
        .create_or_refresh_draft(&content_id, cta_url, mode.map(Into::into))
        .await?;
    let thread = manager.get_draft(&summary.draft_id).await?;
    print_thread(&thread, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_content_file_with_minimal_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"id": "issue_1", "slug": "first-issue", "title": "First issue", "whyItMatters": "Because."}}"#
        )
        .unwrap();

        let record = load_content_file(file.path()).unwrap();
        assert_eq!(record.id(), "issue_1");
        assert_eq!(record.slug(), "first-issue");
        assert_eq!(record.why_it_matters().as_deref(), Some("Because."));
    }

    #[test]
    fn test_load_content_file_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_content_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid content file"));
    }

    #[test]
    fn test_load_content_file_missing() {
        let err = load_content_file(Path::new("/nonexistent/issue.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read content file"));
    }
}

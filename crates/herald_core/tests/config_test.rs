//! Tests for configuration loading and validation.

use herald_core::{HeraldConfig, LogFormat, PostingMode};
use std::io::Write;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn test_defaults_match_platform_rules() {
    let config = HeraldConfig::default();

    assert_eq!(config.thread.platform_limit, 280);
    assert_eq!(config.thread.field_budget, 240);
    assert_eq!(config.thread.marker, "=");
    assert_eq!(config.thread.default_mode, PostingMode::Thread);
    assert_eq!(config.publish.inter_post_delay(), Duration::from_secs(35));
    assert_eq!(
        config.publish.backoff_schedule(),
        vec![
            Duration::from_secs(30),
            Duration::from_secs(60),
            Duration::from_secs(120),
            Duration::from_secs(240),
        ]
    );
    assert_eq!(config.publish.max_jitter(), Duration::from_millis(5_000));
    assert_eq!(config.logging.format, LogFormat::Text);
    assert!(config.x.access_token.is_none());
}

#[test]
fn test_from_file_overrides_selected_sections() {
    let file = write_config(
        r#"
[site]
public_site_url = "https://news.example.com/"

[thread]
default_mode = "single"

[publish]
inter_post_delay_secs = 1
backoff_schedule_secs = [1, 2]

[logging]
format = "json"
"#,
    );

    let config = HeraldConfig::from_file(file.path()).expect("config parses");

    assert_eq!(
        config.site.public_site_url.as_deref(),
        Some("https://news.example.com/")
    );
    assert_eq!(config.thread.default_mode, PostingMode::Single);
    // Fields missing from a present section keep their defaults
    assert_eq!(config.thread.platform_limit, 280);
    assert_eq!(config.publish.backoff_schedule_secs, vec![1, 2]);
    assert_eq!(config.publish.max_jitter_ms, 5_000);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_from_file_missing_path_is_config_error() {
    let err = HeraldConfig::from_file("/definitely/not/here/herald.toml")
        .expect_err("missing file must fail");
    assert!(err.is_client_error());
}

#[test]
fn test_validate_requires_token_only_for_publishing() {
    let mut config = HeraldConfig::default();
    assert!(config.validate(false).is_ok());
    assert!(config.validate(true).is_err());

    config.x.access_token = Some("   ".to_string());
    assert!(config.validate(true).is_err());

    config.x.access_token = Some("token".to_string());
    assert!(config.validate(true).is_ok());
}

#[test]
fn test_validate_rejects_bad_site_url_and_zero_limits() {
    let mut config = HeraldConfig::default();
    config.site.public_site_url = Some("news.example.com".to_string());
    assert!(config.validate(false).is_err());

    let mut config = HeraldConfig::default();
    config.thread.platform_limit = 0;
    assert!(config.validate(false).is_err());

    let mut config = HeraldConfig::default();
    config.thread.marker = String::new();
    assert!(config.validate(false).is_err());
}

#[test]
fn test_debug_redacts_access_token() {
    let mut config = HeraldConfig::default();
    config.x.access_token = Some("secret-token".to_string());
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("secret-token"));
    assert!(rendered.contains("<redacted>"));
}

//! Herald configuration.
//!
//! Configuration is loaded once at startup and handed to each component at
//! construction. Sources, later overriding earlier:
//! 1. Bundled defaults (`herald.toml` shipped with the library)
//! 2. `~/.config/herald/herald.toml`
//! 3. `./herald.toml`
//! 4. Environment variables prefixed `HERALD_`, with `__` between sections
//!    (e.g. `HERALD_X__ACCESS_TOKEN`, `HERALD_SITE__PUBLIC_SITE_URL`)

use crate::PostingMode;
use config::{Config, Environment, File, FileFormat};
use herald_error::{ConfigError, HeraldResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Public site settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL that CTA links are composed from (`<base>/posts/<slug>`)
    pub public_site_url: Option<String>,
}

/// Segmentation settings.
///
/// ```toml
/// [thread]
/// platform_limit = 280
/// field_budget = 240
/// marker = "="
/// default_mode = "thread"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Maximum characters per post
    pub platform_limit: usize,
    /// Maximum characters per narrative field before numbering
    pub field_budget: usize,
    /// Line-leading editorial marker stripped from content
    pub marker: String,
    /// Text placed before the title in the headline
    pub headline_prefix: String,
    /// Label placed before the call-to-action link
    pub cta_label: String,
    /// Mode used when a draft request does not name one
    pub default_mode: PostingMode,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            platform_limit: 280,
            field_budget: 240,
            marker: "=".to_string(),
            headline_prefix: "BREAKING: ".to_string(),
            cta_label: "Full breakdown with context + sources:".to_string(),
            default_mode: PostingMode::Thread,
        }
    }
}

/// Publish pacing and retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Courtesy spacing between replies (seconds)
    pub inter_post_delay_secs: u64,
    /// Waits before each rate-limited retry (seconds)
    pub backoff_schedule_secs: Vec<u64>,
    /// Upper bound of the random jitter added to each wait (milliseconds)
    pub max_jitter_ms: u64,
    /// Ownership tag written on newly created drafts
    pub created_by: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            inter_post_delay_secs: 35,
            backoff_schedule_secs: vec![30, 60, 120, 240],
            max_jitter_ms: 5_000,
            created_by: "herald".to_string(),
        }
    }
}

impl PublishConfig {
    /// Spacing between replies.
    pub fn inter_post_delay(&self) -> Duration {
        Duration::from_secs(self.inter_post_delay_secs)
    }

    /// Retry waits, in order.
    pub fn backoff_schedule(&self) -> Vec<Duration> {
        self.backoff_schedule_secs
            .iter()
            .map(|secs| Duration::from_secs(*secs))
            .collect()
    }

    /// Upper bound of the jitter added to each retry wait.
    pub fn max_jitter(&self) -> Duration {
        Duration::from_millis(self.max_jitter_ms)
    }
}

/// X API settings.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct XConfig {
    /// API root, without trailing slash
    pub api_base_url: String,
    /// OAuth 2.0 user-context bearer token
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for XConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.x.com".to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for XConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XConfig")
            .field("api_base_url", &self.api_base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub filter: Option<String>,
}

/// Top-level Herald configuration.
///
/// # Example
///
/// ```no_run
/// use herald_core::HeraldConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = HeraldConfig::load()?;
/// config.validate(false)?;
/// println!("Posting limit: {}", config.thread.platform_limit);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct HeraldConfig {
    /// Public site settings
    #[serde(default)]
    pub site: SiteConfig,
    /// Segmentation settings
    #[serde(default)]
    pub thread: ThreadConfig,
    /// Publish pacing and retry settings
    #[serde(default)]
    pub publish: PublishConfig,
    /// X API settings
    #[serde(default)]
    pub x: XConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HeraldConfig {
    /// Load configuration from a specific file path (no other sources).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> HeraldResult<Self> {
        debug!("Loading configuration from file");

        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        Ok(config)
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> HeraldResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled");

        const DEFAULT_CONFIG: &str = include_str!("../../../herald.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/herald/herald.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("herald").required(false))
            .add_source(
                Environment::with_prefix("HERALD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("publish.backoff_schedule_secs"),
            );

        let config = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        Ok(config)
    }

    /// Check the configuration once, before any component is built.
    ///
    /// `require_credentials` demands an X access token; drafting and
    /// previewing work without one.
    pub fn validate(&self, require_credentials: bool) -> HeraldResult<()> {
        if self.thread.platform_limit == 0 {
            return Err(ConfigError::new("thread.platform_limit must be at least 1").into());
        }
        if self.thread.field_budget == 0 {
            return Err(ConfigError::new("thread.field_budget must be at least 1").into());
        }
        if self.thread.marker.is_empty() {
            return Err(ConfigError::new("thread.marker must not be empty").into());
        }
        if let Some(base) = &self.site.public_site_url
            && !(base.starts_with("http://") || base.starts_with("https://"))
        {
            return Err(ConfigError::new(format!(
                "site.public_site_url must be an http(s) URL, got '{}'",
                base
            ))
            .into());
        }
        if require_credentials
            && self
                .x
                .access_token
                .as_deref()
                .is_none_or(|token| token.trim().is_empty())
        {
            return Err(ConfigError::new(
                "x.access_token is required to publish (set HERALD_X__ACCESS_TOKEN)",
            )
            .into());
        }
        Ok(())
    }
}

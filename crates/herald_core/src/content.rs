//! Newsletter content records.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Editorial status of a content record.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    /// Still being edited
    #[default]
    #[display("draft")]
    Draft,
    /// Live on the public site
    #[display("published")]
    Published,
    /// Withdrawn
    #[display("archived")]
    Archived,
}

impl ContentStatus {
    /// Convert to string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for ContentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(ContentStatus::Draft),
            "published" => Ok(ContentStatus::Published),
            "archived" => Ok(ContentStatus::Archived),
            _ => Err(format!("Unknown content status: {}", s)),
        }
    }
}

/// A newsletter issue as stored by the CMS.
///
/// Herald only reads these. The narrative fields may carry the editor's
/// leading `=` markers and hard line breaks; segmentation cleans them.
///
/// # Example
///
/// ```
/// use herald_core::ContentRecordBuilder;
///
/// let record = ContentRecordBuilder::default()
///     .id("issue_1")
///     .slug("x-raises-rates")
///     .title("X raises rates")
///     .whats_going_on("= The central bank hiked by 50bps")
///     .build()
///     .unwrap();
/// assert_eq!(record.slug(), "x-raises-rates");
/// assert!(record.why_it_matters().is_none());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder,
)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Record identifier
    id: String,
    /// URL slug on the public site
    slug: String,
    /// Headline
    title: String,
    /// Email subject line
    #[builder(default)]
    #[serde(default)]
    subject: String,
    /// Short teaser shown in listings
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    preview_text: Option<String>,
    /// Opening paragraph
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    intro: Option<String>,
    /// "What's going on" narrative
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    whats_going_on: Option<String>,
    /// "Why it matters" narrative
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    why_it_matters: Option<String>,
    /// Further reading
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    read_more: Option<String>,
    /// Editorial category
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    category: Option<String>,
    /// Editorial status
    #[builder(default)]
    #[serde(default)]
    status: ContentStatus,
    /// When the issue went live
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    /// Creation time
    #[builder(default = "Utc::now()")]
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    /// Last modification time
    #[builder(default = "Utc::now()")]
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

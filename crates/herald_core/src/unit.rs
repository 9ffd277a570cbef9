//! Post units: the individual posts of a thread.

use chrono::{DateTime, Utc};
use herald_error::{ConfigError, HeraldResult};
use serde::{Deserialize, Serialize};

/// One physical post within a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUnit {
    /// Row id
    pub id: i64,
    /// Owning draft
    pub thread_id: String,
    /// 1-based posting position, unique within the thread
    pub order: i32,
    /// Post body, already within the platform limit
    pub text: String,
    /// Platform id once posted
    pub external_id: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl PostUnit {
    /// True once the platform has confirmed this unit.
    pub fn is_posted(&self) -> bool {
        self.external_id.is_some()
    }
}

/// A unit about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPostUnit {
    /// Owning draft
    pub thread_id: String,
    /// 1-based posting position
    pub order: i32,
    /// Post body
    pub text: String,
}

impl NewPostUnit {
    /// Build the ordered unit specs for a thread from its final texts.
    ///
    /// # Errors
    ///
    /// `ConfigError` when there are more texts than an `i32` order can number.
    pub fn sequence(thread_id: &str, texts: &[String]) -> HeraldResult<Vec<Self>> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| -> HeraldResult<Self> {
                let order = i32::try_from(index + 1).map_err(|_| {
                    ConfigError::new(format!("Unit order {} out of range", index + 1))
                })?;
                Ok(Self {
                    thread_id: thread_id.to_string(),
                    order,
                    text: text.clone(),
                })
            })
            .collect()
    }
}

/// Partial update of a post unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUnitUpdate {
    /// Platform id assigned on posting
    pub external_id: Option<String>,
}

impl PostUnitUpdate {
    /// Record the platform id of a freshly posted unit.
    pub fn posted(external_id: impl Into<String>) -> Self {
        Self {
            external_id: Some(external_id.into()),
        }
    }
}

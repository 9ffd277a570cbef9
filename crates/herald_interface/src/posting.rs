//! The posting platform contract.

use async_trait::async_trait;
use herald_core::{ImageSource, MediaRef, PostedUnit};
use herald_error::PostingResult;

/// A social platform that accepts posts and replies.
///
/// Errors carry the HTTP status code (when there was a response) and the
/// platform's message, which is what rate-limit classification inspects.
#[async_trait]
pub trait PostingClient: Send + Sync {
    /// Publish a top-level post, optionally with attached media.
    async fn create_post(&self, text: &str, media: Option<&MediaRef>) -> PostingResult<PostedUnit>;

    /// Publish a reply to an existing post.
    async fn reply_to(&self, text: &str, parent_external_id: &str) -> PostingResult<PostedUnit>;

    /// Upload an image for later attachment.
    async fn upload_image(&self, image: &ImageSource) -> PostingResult<MediaRef>;

    /// Platform name (e.g., "X").
    fn platform_name(&self) -> &'static str;
}

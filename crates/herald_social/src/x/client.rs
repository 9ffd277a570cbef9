//! HTTP client for posting threads to X.

use super::models::{
    CreateTweetRequest, DataEnvelope, MediaData, MediaSettings, ReplySettings, TweetData,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use herald_core::{ImageSource, MediaRef, PLATFORM_X, PostedUnit, XConfig};
use herald_error::{ConfigError, HeraldResult, PostingError, PostingErrorKind, PostingResult};
use herald_interface::PostingClient;
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";
const DEFAULT_IMAGE_TYPE: &str = "image/png";

/// X API v2 client authenticated with an OAuth 2.0 user-context token.
#[derive(Clone)]
pub struct XClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl std::fmt::Debug for XClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl XClient {
    /// Create a client against `base_url` (e.g. `https://api.x.com`).
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Create a client from the `[x]` configuration section.
    ///
    /// # Errors
    ///
    /// `ConfigError` when the access token is missing or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &XConfig) -> HeraldResult<Self> {
        let token = config
            .access_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::new("x.access_token is not configured"))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new(http, config.api_base_url.clone(), token))
    }

    async fn post_tweet(
        &self,
        text: &str,
        in_reply_to: Option<&str>,
        media: Option<&MediaRef>,
    ) -> PostingResult<PostedUnit> {
        let body = CreateTweetRequest {
            text,
            reply: in_reply_to.map(|id| ReplySettings {
                in_reply_to_tweet_id: id,
            }),
            media: media.map(|media| MediaSettings {
                media_ids: vec![media.0.as_str()],
            }),
        };

        let response = self
            .http
            .post(format!("{}/2/tweets", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let envelope: DataEnvelope<TweetData> = decode(response).await?;
        debug!(external_id = %envelope.data.id, "Tweet created");
        Ok(PostedUnit {
            external_id: envelope.data.id,
            text: envelope.data.text,
        })
    }

    /// Raw bytes and MIME type of an image.
    async fn load_image(&self, image: &ImageSource) -> PostingResult<(Vec<u8>, String)> {
        match image {
            ImageSource::Base64(payload) => decode_base64_image(payload),
            ImageSource::Url(url) => {
                let response = self.http.get(url).send().await.map_err(transport)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(PostingError::new(PostingErrorKind::Media(format!(
                        "Fetching {} returned {}",
                        url, status
                    ))));
                }
                let mime = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .filter(|value| value.starts_with("image/"))
                    .unwrap_or(DEFAULT_IMAGE_TYPE)
                    .to_string();
                let bytes = response.bytes().await.map_err(transport)?;
                Ok((bytes.to_vec(), mime))
            }
        }
    }
}

#[async_trait]
impl PostingClient for XClient {
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn create_post(&self, text: &str, media: Option<&MediaRef>) -> PostingResult<PostedUnit> {
        self.post_tweet(text, None, media).await
    }

    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn reply_to(&self, text: &str, parent_external_id: &str) -> PostingResult<PostedUnit> {
        self.post_tweet(text, Some(parent_external_id), None).await
    }

    #[instrument(skip(self, image))]
    async fn upload_image(&self, image: &ImageSource) -> PostingResult<MediaRef> {
        let (bytes, mime) = self.load_image(image).await?;
        let category = if mime == "image/gif" {
            "tweet_gif"
        } else {
            "tweet_image"
        };

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("image")
            .mime_str(&mime)
            .map_err(|e| {
                PostingError::new(PostingErrorKind::Media(format!(
                    "Invalid mime type {}: {}",
                    mime, e
                )))
            })?;
        let form = reqwest::multipart::Form::new()
            .text("media_category", category)
            .text("media_type", mime.clone())
            .part("media", part);

        let response = self
            .http
            .post(format!("{}/2/media/upload", self.base_url))
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let envelope: DataEnvelope<MediaData> = decode(response).await?;
        debug!(media_id = %envelope.data.id, %mime, "Image uploaded");
        Ok(MediaRef(envelope.data.id))
    }

    fn platform_name(&self) -> &'static str {
        PLATFORM_X
    }
}

fn transport(err: reqwest::Error) -> PostingError {
    PostingError::new(PostingErrorKind::Transport(err.to_string()))
}

/// Turn a response into `T`, or a `PostingError` carrying the status.
async fn decode<T: DeserializeOwned>(response: Response) -> PostingResult<T> {
    let status = response.status();
    let rate_limit_reset = response
        .headers()
        .get(RATE_LIMIT_RESET_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok());
    let body = response.text().await.map_err(transport)?;

    if !status.is_success() {
        return Err(PostingError::new(PostingErrorKind::Http {
            status_code: status.as_u16(),
            message: body,
            rate_limit_reset,
        }));
    }

    serde_json::from_str(&body).map_err(|e| {
        PostingError::new(PostingErrorKind::Decode(format!(
            "{} (body: {})",
            e, body
        )))
    })
}

/// Decode a base64 image, accepting `data:<mime>;base64,<payload>` URLs.
fn decode_base64_image(payload: &str) -> PostingResult<(Vec<u8>, String)> {
    let (mime, data) = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest.split_once(',').ok_or_else(|| {
                PostingError::new(PostingErrorKind::Media(
                    "Malformed data URL: missing ','".to_string(),
                ))
            })?;
            let mime = header.trim_end_matches(";base64");
            let mime = if mime.is_empty() {
                DEFAULT_IMAGE_TYPE
            } else {
                mime
            };
            (mime.to_string(), data)
        }
        None => (DEFAULT_IMAGE_TYPE.to_string(), payload),
    };

    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(|e| {
        PostingError::new(PostingErrorKind::Media(format!("Invalid base64 image: {}", e)))
    })?;
    Ok((bytes, mime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_carries_mime() {
        let (bytes, mime) =
            decode_base64_image("data:image/jpeg;base64,aGVs\nbG8=").expect("decodes");
        assert_eq!(bytes, b"hello");
        assert_eq!(mime, "image/jpeg");
    }

    #[test]
    fn bare_base64_defaults_to_png() {
        let (bytes, mime) = decode_base64_image("aGVsbG8=").expect("decodes");
        assert_eq!(bytes, b"hello");
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn bad_base64_is_media_error_not_rate_limit() {
        let err = decode_base64_image("data:image/png;base64,@@@").expect_err("invalid");
        assert!(matches!(err.kind, PostingErrorKind::Media(_)));
        assert!(err.kind.status_code().is_none());
    }

    #[test]
    fn from_config_requires_token() {
        assert!(XClient::from_config(&XConfig::default()).is_err());

        let config = XConfig {
            access_token: Some("token".to_string()),
            api_base_url: "https://api.x.com/".to_string(),
            ..XConfig::default()
        };
        let client = XClient::from_config(&config).expect("client builds");
        assert_eq!(client.base_url, "https://api.x.com");
        assert_eq!(client.platform_name(), "X");
    }
}

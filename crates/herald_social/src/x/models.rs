//! X API v2 wire types.

use serde::{Deserialize, Serialize};

/// Body of `POST /2/tweets`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateTweetRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplySettings<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaSettings<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReplySettings<'a> {
    pub in_reply_to_tweet_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct MediaSettings<'a> {
    pub media_ids: Vec<&'a str>,
}

/// `{"data": ...}` envelope used by every v2 endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetData {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaData {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_body_shape() {
        let body = CreateTweetRequest {
            text: "2/3 hello",
            reply: Some(ReplySettings {
                in_reply_to_tweet_id: "100",
            }),
            media: None,
        };
        let json = serde_json::to_value(&body).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "text": "2/3 hello",
                "reply": { "in_reply_to_tweet_id": "100" }
            })
        );
    }

    #[test]
    fn tweet_response_without_text() {
        let parsed: DataEnvelope<TweetData> =
            serde_json::from_str(r#"{"data":{"id":"42"}}"#).expect("parses");
        assert_eq!(parsed.data.id, "42");
        assert!(parsed.data.text.is_empty());
    }
}

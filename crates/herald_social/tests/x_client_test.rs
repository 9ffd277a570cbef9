//! X client against a local HTTP server.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use herald_core::{ImageSource, MediaRef};
use herald_error::{PostingErrorKind, RateLimitedError};
use herald_interface::PostingClient;
use herald_social::XClient;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    tweets: Arc<Mutex<Vec<Value>>>,
    uploads: Arc<Mutex<Vec<String>>>,
    auth: Arc<Mutex<Vec<String>>>,
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{}", addr)
}

async fn create_tweet(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if let Some(auth) = headers.get(header::AUTHORIZATION) {
        recorded
            .auth
            .lock()
            .unwrap()
            .push(auth.to_str().unwrap().to_string());
    }
    let mut tweets = recorded.tweets.lock().unwrap();
    tweets.push(body.clone());
    Json(json!({
        "data": { "id": format!("{}", 1000 + tweets.len()), "text": body["text"] }
    }))
}

async fn upload_media(State(recorded): State<Recorded>, body: Bytes) -> Json<Value> {
    recorded
        .uploads
        .lock()
        .unwrap()
        .push(String::from_utf8_lossy(&body).to_string());
    Json(json!({ "data": { "id": "media_77", "media_key": "3_77" } }))
}

async fn image() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/jpeg")], vec![0xFFu8, 0xD8, 0xFF])
}

fn recording_router(recorded: Recorded) -> Router {
    Router::new()
        .route("/2/tweets", post(create_tweet))
        .route("/2/media/upload", post(upload_media))
        .route("/image.jpg", get(image))
        .with_state(recorded)
}

fn client(base_url: &str) -> XClient {
    XClient::new(reqwest::Client::new(), base_url, "test-token")
}

#[tokio::test]
async fn test_root_and_reply_bodies() {
    let recorded = Recorded::default();
    let base = spawn(recording_router(recorded.clone())).await;
    let client = client(&base);

    let root = client
        .create_post("1/2 hello", Some(&MediaRef("media_77".to_string())))
        .await
        .expect("root posted");
    let reply = client
        .reply_to("2/2 world", &root.external_id)
        .await
        .expect("reply posted");

    assert_eq!(root.external_id, "1001");
    assert_eq!(root.text, "1/2 hello");
    assert_eq!(reply.external_id, "1002");

    let tweets = recorded.tweets.lock().unwrap().clone();
    assert_eq!(
        tweets[0],
        json!({ "text": "1/2 hello", "media": { "media_ids": ["media_77"] } })
    );
    assert_eq!(
        tweets[1],
        json!({ "text": "2/2 world", "reply": { "in_reply_to_tweet_id": "1001" } })
    );
    assert!(
        recorded
            .auth
            .lock()
            .unwrap()
            .iter()
            .all(|auth| auth == "Bearer test-token")
    );
}

#[tokio::test]
async fn test_upload_from_base64_and_url() {
    let recorded = Recorded::default();
    let base = spawn(recording_router(recorded.clone())).await;
    let client = client(&base);

    let media = client
        .upload_image(&ImageSource::Base64("data:image/gif;base64,R0lGODlh".to_string()))
        .await
        .expect("uploaded");
    assert_eq!(media, MediaRef("media_77".to_string()));

    client
        .upload_image(&ImageSource::Url(format!("{}/image.jpg", base)))
        .await
        .expect("uploaded");

    let uploads = recorded.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 2);
    assert!(uploads[0].contains("tweet_gif"));
    assert!(uploads[0].contains("image/gif"));
    assert!(uploads[1].contains("tweet_image"));
    assert!(uploads[1].contains("image/jpeg"));
}

#[tokio::test]
async fn test_missing_image_url_is_media_error() {
    let base = spawn(recording_router(Recorded::default())).await;

    let err = client(&base)
        .upload_image(&ImageSource::Url(format!("{}/missing.png", base)))
        .await
        .expect_err("404 image");
    assert!(matches!(err.kind, PostingErrorKind::Media(_)));
    assert!(!err.is_rate_limited());
}

#[tokio::test]
async fn test_429_carries_status_and_reset() {
    let router = Router::new().route(
        "/2/tweets",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                [("x-rate-limit-reset", "1767225600")],
                r#"{"title":"Too Many Requests","status":429}"#,
            )
        }),
    );
    let base = spawn(router).await;

    let err = client(&base)
        .create_post("1/1 hi", None)
        .await
        .expect_err("throttled");

    assert!(err.is_rate_limited());
    match err.kind {
        PostingErrorKind::Http {
            status_code,
            rate_limit_reset,
            ref message,
        } => {
            assert_eq!(status_code, 429);
            assert_eq!(rate_limit_reset, Some(1_767_225_600));
            assert!(message.contains("Too Many Requests"));
        }
        other => panic!("unexpected error kind {:?}", other),
    }
}

#[tokio::test]
async fn test_forbidden_is_not_rate_limited() {
    let router = Router::new().route(
        "/2/tweets",
        post(|| async {
            (
                StatusCode::FORBIDDEN,
                r#"{"detail":"You are not allowed to create a Tweet with duplicate content."}"#,
            )
        }),
    );
    let base = spawn(router).await;

    let err = client(&base)
        .reply_to("2/2 again", "1001")
        .await
        .expect_err("forbidden");

    assert_eq!(err.kind.status_code(), Some(403));
    assert!(!err.is_rate_limited());
}

#[tokio::test]
async fn test_unexpected_body_is_decode_error() {
    let router = Router::new().route("/2/tweets", post(|| async { Json(json!({ "ok": true })) }));
    let base = spawn(router).await;

    let err = client(&base)
        .create_post("1/1 hi", None)
        .await
        .expect_err("bad body");
    assert!(matches!(err.kind, PostingErrorKind::Decode(_)));
}

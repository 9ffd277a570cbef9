//! Segmenter behaviour over whole content records.

use herald_core::{ContentRecordBuilder, PostingMode, ThreadConfig};
use herald_social::ThreadSegmenter;

fn segmenter() -> ThreadSegmenter {
    ThreadSegmenter::new(ThreadConfig::default())
}

#[test]
fn test_every_thread_unit_fits_and_is_numbered() {
    let lengths = [0usize, 1, 50, 239, 240, 241, 276, 277, 280, 281, 1_000];
    for &len in &lengths {
        let record = ContentRecordBuilder::default()
            .id("1")
            .slug("s")
            .title(format!("Title {}", "t".repeat(len)))
            .intro("i".repeat(len))
            .whats_going_on("w".repeat(len))
            .why_it_matters("y".repeat(len))
            .build()
            .expect("valid record");

        let posts = segmenter()
            .segment(PostingMode::Thread, &record, "https://site/posts/s")
            .expect("segments");
        let total = posts.len();
        for (index, post) in posts.iter().enumerate() {
            assert!(
                post.chars().count() <= 280,
                "len {} post {} is {} chars",
                len,
                index,
                post.chars().count()
            );
            assert!(post.starts_with(&format!("{}/{} ", index + 1, total)));
        }
        assert!(posts[total - 1].ends_with("https://site/posts/s"));
    }
}

#[test]
fn test_single_mode_scenario() {
    let record = ContentRecordBuilder::default()
        .id("1")
        .slug("x-raises-rates")
        .title("X raises rates")
        .whats_going_on("= The central bank hiked by 50bps")
        .why_it_matters("")
        .build()
        .expect("valid record");

    let posts = segmenter()
        .segment(PostingMode::Single, &record, "https://site/x-raises-rates")
        .expect("segments");

    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert!(post.starts_with("BREAKING: X raises rates"));
    assert!(
        post.lines()
            .any(|line| line == "• What's going on: The central bank hiked by 50bps")
    );
    assert!(!post.contains("Why it matters"));
    assert!(post.ends_with("https://site/x-raises-rates"));
    assert!(post.chars().count() <= 280);
}

#[test]
fn test_single_mode_overflow_keeps_link() {
    let record = ContentRecordBuilder::default()
        .id("1")
        .slug("s")
        .title("A very long headline ".repeat(10))
        .whats_going_on("w".repeat(200))
        .why_it_matters("y".repeat(200))
        .build()
        .expect("valid record");
    let url = "https://site.example/posts/a-long-slug";

    let post = segmenter()
        .build_single(&record, url)
        .expect("segments");

    assert!(post.chars().count() <= 280);
    assert!(post.ends_with(&format!("\n\n{}", url)));
    assert!(post.contains('…'));
}

#[test]
fn test_single_mode_link_longer_than_limit_is_hard_capped() {
    let record = ContentRecordBuilder::default()
        .id("1")
        .slug("s")
        .title("Headline")
        .build()
        .expect("valid record");
    let url = format!("https://site.example/{}", "p".repeat(300));

    let post = segmenter().build_single(&record, &url).expect("segments");

    assert_eq!(post.chars().count(), 280);
    assert!(post.starts_with("BREAKING: Headline"));
    assert!(post.ends_with('…'));
}

#[test]
fn test_single_mode_without_headline_or_bullets_is_empty() {
    let record = ContentRecordBuilder::default()
        .id("1")
        .slug("s")
        .title("= ")
        .intro("Intro is not used by single posts")
        .build()
        .expect("valid record");

    let err = segmenter()
        .segment(PostingMode::Single, &record, "https://u")
        .expect_err("nothing to post");
    assert!(err.is_client_error());
}

#[test]
fn test_multibyte_text_counts_characters() {
    let record = ContentRecordBuilder::default()
        .id("1")
        .slug("s")
        .title("Ünïcödé ".repeat(60))
        .build()
        .expect("valid record");

    let posts = segmenter()
        .segment(PostingMode::Thread, &record, "https://u")
        .expect("segments");

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].chars().count(), 280);
    assert!(posts[0].len() > 280);
}

#[test]
fn test_custom_limits_from_config() {
    let config = ThreadConfig {
        platform_limit: 40,
        field_budget: 10,
        headline_prefix: "NEW: ".to_string(),
        cta_label: "More:".to_string(),
        ..ThreadConfig::default()
    };
    let record = ContentRecordBuilder::default()
        .id("1")
        .slug("s")
        .title("Short")
        .why_it_matters("A reason that is long")
        .build()
        .expect("valid record");

    let posts = ThreadSegmenter::new(config)
        .segment(PostingMode::Thread, &record, "https://u")
        .expect("segments");

    assert_eq!(
        posts,
        vec![
            "1/3 NEW: Short",
            "2/3 Why it matters: A reason…",
            "3/3 More: https://u",
        ]
    );
}

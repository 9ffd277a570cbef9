//! Content record to platform-sized posts.

use crate::text::{TextNormalizer, cap_to_length, collapse_whitespace};
use derive_getters::Getters;
use herald_core::{ContentRecord, PostingMode, ThreadConfig};
use herald_error::{EmptyThreadError, HeraldResult};
use tracing::{debug, instrument};

const WHATS_GOING_ON: &str = "What's going on";
const WHY_IT_MATTERS: &str = "Why it matters";
const BULLET: &str = "•";

/// Splits a content record into posts that each fit the platform limit.
///
/// # Example
///
/// ```
/// use herald_core::{ContentRecordBuilder, PostingMode, ThreadConfig};
/// use herald_social::ThreadSegmenter;
///
/// let record = ContentRecordBuilder::default()
///     .id("issue_1")
///     .slug("rates")
///     .title("X raises rates")
///     .whats_going_on("= The central bank hiked by 50bps")
///     .build()
///     .unwrap();
///
/// let segmenter = ThreadSegmenter::new(ThreadConfig::default());
/// let posts = segmenter
///     .segment(PostingMode::Thread, &record, "https://site/rates")
///     .unwrap();
///
/// assert_eq!(posts[0], "1/3 BREAKING: X raises rates");
/// assert!(posts.iter().all(|p| p.chars().count() <= 280));
/// ```
#[derive(Debug, Clone, Getters)]
pub struct ThreadSegmenter {
    /// The settings in use
    config: ThreadConfig,
    #[getter(skip)]
    normalizer: TextNormalizer,
}

impl ThreadSegmenter {
    /// Create a segmenter from the `[thread]` configuration section.
    pub fn new(config: ThreadConfig) -> Self {
        let normalizer = TextNormalizer::new(config.marker.clone());
        Self { config, normalizer }
    }

    /// Posts for `record` in the requested mode, in posting order.
    ///
    /// # Errors
    ///
    /// `EmptyThreadError` when the record has no headline and no body.
    #[instrument(skip(self, record, cta_url), fields(content_id = %record.id()))]
    pub fn segment(
        &self,
        mode: PostingMode,
        record: &ContentRecord,
        cta_url: &str,
    ) -> HeraldResult<Vec<String>> {
        let posts = match mode {
            PostingMode::Thread => self.normalize(self.build_raw_units(record, cta_url))?,
            PostingMode::Single => vec![self.build_single(record, cta_url)?],
        };
        debug!(%mode, count = posts.len(), "Segmented content record");
        Ok(posts)
    }

    /// Unnumbered thread blocks: headline, intro, highlights, call to action.
    ///
    /// Narrative fields are capped to the field budget. A record with neither
    /// a headline nor a body yields no blocks at all, since a bare link is
    /// not a thread.
    pub fn build_raw_units(&self, record: &ContentRecord, cta_url: &str) -> Vec<String> {
        let mut blocks = Vec::new();

        if let Some(headline) = self.headline(record) {
            blocks.push(headline);
        }

        if let Some(intro) = record.intro() {
            let intro = cap_to_length(&self.normalizer.clean(intro), self.config.field_budget);
            if !intro.is_empty() {
                blocks.push(intro);
            }
        }

        blocks.extend(
            self.highlights(record)
                .into_iter()
                .map(|(label, text)| format!("{}: {}", label, text)),
        );

        if blocks.is_empty() {
            return blocks;
        }

        blocks.push(format!("{} {}", self.config.cta_label, cta_url));
        blocks
    }

    /// Number the blocks as `i/n` and cap each post to the platform limit.
    ///
    /// # Errors
    ///
    /// `EmptyThreadError` when no non-blank block remains.
    pub fn normalize(&self, raw: Vec<String>) -> HeraldResult<Vec<String>> {
        let blocks: Vec<String> = raw
            .iter()
            .map(|block| collapse_whitespace(block))
            .filter(|block| !block.is_empty())
            .collect();

        if blocks.is_empty() {
            return Err(EmptyThreadError::new("No content available to create a thread").into());
        }

        let total = blocks.len();
        Ok(blocks
            .iter()
            .enumerate()
            .map(|(index, body)| {
                let prefix = format!("{}/{} ", index + 1, total);
                let budget = self
                    .config
                    .platform_limit
                    .saturating_sub(prefix.chars().count())
                    .max(1);
                format!("{}{}", prefix, cap_to_length(body, budget))
            })
            .collect())
    }

    /// One post: headline, blank line, bullet highlights, blank line, link.
    ///
    /// An overflowing message loses text before the link so the link
    /// survives; if the link alone does not fit the whole message is capped.
    ///
    /// # Errors
    ///
    /// `EmptyThreadError` when there is no headline and no highlight.
    pub fn build_single(&self, record: &ContentRecord, cta_url: &str) -> HeraldResult<String> {
        let mut sections = Vec::new();

        if let Some(headline) = self.headline(record) {
            sections.push(headline);
        }

        let bullets: Vec<String> = self
            .highlights(record)
            .into_iter()
            .map(|(label, text)| format!("{} {}: {}", BULLET, label, text))
            .collect();
        if !bullets.is_empty() {
            sections.push(bullets.join("\n"));
        }

        if sections.is_empty() {
            return Err(
                EmptyThreadError::new("No headline or highlights available for a single post")
                    .into(),
            );
        }

        let body = sections.join("\n\n");
        let message = format!("{}\n\n{}", body, cta_url);
        let limit = self.config.platform_limit;

        if message.chars().count() <= limit {
            return Ok(message);
        }

        let reserved = cta_url.chars().count() + 2;
        if reserved < limit {
            let capped = cap_to_length(&body, limit - reserved);
            debug!(limit, "Single post overflowed, shortened body to keep link");
            Ok(format!("{}\n\n{}", capped, cta_url))
        } else {
            debug!(limit, "Link alone exceeds limit, capping whole post");
            Ok(cap_to_length(&message, limit))
        }
    }

    fn headline(&self, record: &ContentRecord) -> Option<String> {
        let title = self.normalizer.clean(record.title());
        (!title.is_empty()).then(|| format!("{}{}", self.config.headline_prefix, title))
    }

    /// Labelled first lines of the narrative fields, skipping blank ones.
    fn highlights(&self, record: &ContentRecord) -> Vec<(&'static str, String)> {
        [
            (WHATS_GOING_ON, record.whats_going_on()),
            (WHY_IT_MATTERS, record.why_it_matters()),
        ]
        .into_iter()
        .filter_map(|(label, field)| {
            let text = cap_to_length(
                &self.normalizer.first_line(field.as_deref()?),
                self.config.field_budget,
            );
            (!text.is_empty()).then_some((label, text))
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::ContentRecordBuilder;

    fn segmenter() -> ThreadSegmenter {
        ThreadSegmenter::new(ThreadConfig::default())
    }

    #[test]
    fn raw_units_follow_editorial_order() {
        let record = ContentRecordBuilder::default()
            .id("1")
            .slug("s")
            .title("Title")
            .intro("= Intro text")
            .whats_going_on("= Line one\n= Line two")
            .why_it_matters("Because")
            .build()
            .expect("valid record");

        let raw = segmenter().build_raw_units(&record, "https://u");
        assert_eq!(
            raw,
            vec![
                "BREAKING: Title",
                "Intro text",
                "What's going on: Line one",
                "Why it matters: Because",
                "Full breakdown with context + sources: https://u",
            ]
        );
    }

    #[test]
    fn blank_title_drops_headline() {
        let record = ContentRecordBuilder::default()
            .id("1")
            .slug("s")
            .title("  ")
            .why_it_matters("Because")
            .build()
            .expect("valid record");

        let raw = segmenter().build_raw_units(&record, "https://u");
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0], "Why it matters: Because");
    }

    #[test]
    fn cta_alone_is_not_a_thread() {
        let record = ContentRecordBuilder::default()
            .id("1")
            .slug("s")
            .title("=")
            .intro("   ")
            .build()
            .expect("valid record");

        assert!(segmenter().build_raw_units(&record, "https://u").is_empty());
        let err = segmenter()
            .segment(PostingMode::Thread, &record, "https://u")
            .expect_err("nothing to post");
        assert!(err.is_client_error());
    }

    #[test]
    fn normalize_numbers_and_caps() {
        // No whitespace at the cut, so nothing is trimmed before the ellipsis
        let long = format!("word {}", "x".repeat(400));
        let posts = segmenter()
            .normalize(vec![" a  b ".to_string(), "".to_string(), long])
            .expect("non-empty");

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0], "1/2 a b");
        assert!(posts[1].starts_with("2/2 word"));
        assert!(posts[1].ends_with('…'));
        assert_eq!(posts[1].chars().count(), 280);
    }

    #[test]
    fn normalize_trims_whitespace_before_ellipsis() {
        let posts = segmenter()
            .normalize(vec!["word ".repeat(100)])
            .expect("non-empty");

        assert!(posts[0].ends_with("word…"));
        assert!(posts[0].chars().count() <= 280);
    }

    #[test]
    fn normalize_rejects_all_blank() {
        assert!(segmenter().normalize(vec![" ".into(), "\n".into()]).is_err());
        assert!(segmenter().normalize(Vec::new()).is_err());
    }

    #[test]
    fn field_budget_caps_highlights() {
        let record = ContentRecordBuilder::default()
            .id("1")
            .slug("s")
            .title("T")
            .whats_going_on("x".repeat(500))
            .build()
            .expect("valid record");

        let raw = segmenter().build_raw_units(&record, "https://u");
        let highlight = &raw[1];
        let body = highlight
            .strip_prefix("What's going on: ")
            .expect("labelled highlight");
        assert_eq!(body.chars().count(), 240);
        assert!(body.ends_with('…'));
    }
}

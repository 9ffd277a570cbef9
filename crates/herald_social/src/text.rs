//! Raw editorial text to single-line post text.
//!
//! Lengths are counted in Unicode scalar values (`char`s).

/// Ellipsis appended to truncated text.
const ELLIPSIS: char = '…';

/// Truncate `text` to at most `max` characters.
///
/// Longer text keeps its first `max - 1` characters, trailing whitespace
/// trimmed, followed by `…`. Shorter text is returned unchanged.
///
/// # Examples
///
/// ```
/// use herald_social::cap_to_length;
///
/// assert_eq!(cap_to_length("hello world", 7), "hello…");
/// assert_eq!(cap_to_length("short", 280), "short");
/// ```
pub fn cap_to_length(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let kept: String = text.chars().take(max - 1).collect();
    let mut capped = kept.trim_end().to_string();
    capped.push(ELLIPSIS);
    capped
}

/// Cleans editorial fields.
///
/// Editors prefix lines with a marker (`=` by default) that has no meaning
/// on social platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNormalizer {
    marker: String,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new("=")
    }
}

impl TextNormalizer {
    /// Create a normalizer that strips the given line-leading marker.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Strip markers, collapse whitespace runs to single spaces, trim.
    ///
    /// ```
    /// use herald_social::TextNormalizer;
    ///
    /// let text = TextNormalizer::default().clean("= First line\n  = second\tline ");
    /// assert_eq!(text, "First line second line");
    /// ```
    pub fn clean(&self, text: &str) -> String {
        collapse_whitespace(&self.strip_markers(text))
    }

    /// The first non-empty line, marker-stripped and collapsed.
    ///
    /// Returns an empty string when every line is blank.
    pub fn first_line(&self, text: &str) -> String {
        self.strip_markers(text)
            .lines()
            .map(collapse_whitespace)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
    }

    fn strip_markers(&self, text: &str) -> String {
        text.lines()
            .map(|line| {
                let trimmed = line.trim_start();
                match trimmed.strip_prefix(self.marker.as_str()) {
                    Some(rest) if !self.marker.is_empty() => rest.trim_start(),
                    _ => line,
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Collapse every whitespace run to one space and trim the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

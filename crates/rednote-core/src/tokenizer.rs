//! Body text tokenizer.
//!
//! Splits free-form text into plain-text and hashtag segments. The segments
//! partition the input: joining their text in order gives back the input
//! byte for byte.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Character that starts a hashtag.
pub const TAG_MARKER: char = '#';

/// `#` followed by one or more characters that are neither whitespace nor
/// another marker.
static HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#[^\s#]+").unwrap());

/// Kind of a [`ContentSegment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    PlainText,
    Hashtag,
}

/// A contiguous run of the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSegment {
    pub text: String,
    pub kind: SegmentKind,
}

impl ContentSegment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SegmentKind::PlainText,
        }
    }

    pub fn hashtag(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SegmentKind::Hashtag,
        }
    }

    pub fn is_hashtag(&self) -> bool {
        self.kind == SegmentKind::Hashtag
    }

    /// Tag name without the leading marker. `None` for plain text.
    pub fn tag_name(&self) -> Option<&str> {
        match self.kind {
            SegmentKind::Hashtag => self.text.strip_prefix(TAG_MARKER),
            SegmentKind::PlainText => None,
        }
    }
}

/// Ordered segments of one body text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenizedContent {
    segments: Vec<ContentSegment>,
}

impl TokenizedContent {
    pub fn segments(&self) -> &[ContentSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentSegment> {
        self.segments.iter()
    }

    /// Tag names (marker stripped) in document order.
    pub fn hashtags(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(ContentSegment::tag_name)
    }

    pub fn into_segments(self) -> Vec<ContentSegment> {
        self.segments
    }
}

impl<'a> IntoIterator for &'a TokenizedContent {
    type Item = &'a ContentSegment;
    type IntoIter = std::slice::Iter<'a, ContentSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Writes the segments back to back, reproducing the tokenized input.
impl fmt::Display for TokenizedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.segments
            .iter()
            .try_for_each(|segment| f.write_str(&segment.text))
    }
}

/// Tokenize `content` into plain-text and hashtag segments.
///
/// Empty input yields no segments.
pub fn tokenize(content: &str) -> TokenizedContent {
    let mut segments = Vec::new();
    let mut last = 0;

    for found in HASHTAG.find_iter(content) {
        if found.start() > last {
            segments.push(ContentSegment::plain(&content[last..found.start()]));
        }
        segments.push(ContentSegment::hashtag(found.as_str()));
        last = found.end();
    }

    if last < content.len() {
        segments.push(ContentSegment::plain(&content[last..]));
    }

    TokenizedContent { segments }
}

#[cfg(test)]
#[path = "tokenizer_tests.rs"]
mod tests;

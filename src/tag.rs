//! Player and clan tag normalization.
//!
//! # Responsibilities
//! - Canonicalize a raw tag: uppercase, exactly one leading `#`
//! - Percent-encode the canonical tag for use as a URL path segment
//!
//! # Design Decisions
//! - `Tag` stores the canonical (unencoded) form, so parsing is idempotent
//! - Encoding happens only when a URL is built, via [`Tag::encoded`]

use std::fmt;
use thiserror::Error;

/// Reserved leading character of every tag.
pub const TAG_MARKER: char = '#';

/// Errors produced while parsing a tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The raw input was empty.
    #[error("Tag is required")]
    Empty,
}

/// A canonical player or clan tag such as `#ABC123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Normalize a raw tag taken from a request path.
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        if raw.is_empty() {
            return Err(TagError::Empty);
        }

        let upper = raw.to_uppercase();
        if upper.starts_with(TAG_MARKER) {
            Ok(Self(upper))
        } else {
            Ok(Self(format!("{}{}", TAG_MARKER, upper)))
        }
    }

    /// Canonical form, e.g. `#ABC123`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form, e.g. `%23ABC123`.
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

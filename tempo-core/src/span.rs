//! Canonical event identity: half-open token spans and their string keys.
//!
//! Every source identifies events differently. The joint-IE pipeline points at
//! tokens whose offset ids look like `"doc:5-7"` (inclusive bounds), while the
//! temporal taggers already hand out keys such as `"[5:8)"`. Both collapse to
//! the same [`EventKey`] so that one trigger discovered by several pipelines
//! lands on one event record.
//!
//! ```text
//! "doc:5-7"  ──from_offset_id──▶  Span { start: 5, end: 8 }  ──key──▶  "[5:8)"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A half-open `[start, end)` interval of token offsets within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// First covered offset (inclusive)
    pub start: usize,
    /// One past the last covered offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a span. `end` is exclusive.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Parse an inclusive offset id of the form `<prefix>:<start>-<end>`.
    ///
    /// The prefix (usually the document id) is ignored and may itself contain
    /// colons. The inclusive end is converted to an exclusive one.
    ///
    /// ```
    /// use tempo_core::Span;
    ///
    /// assert_eq!(Span::from_offset_id("doc:5-7").unwrap(), Span::new(5, 8));
    /// assert_eq!(Span::from_offset_id("doc:3-3").unwrap(), Span::new(3, 4));
    /// ```
    pub fn from_offset_id(offset_id: &str) -> Result<Self> {
        let (_, range) = offset_id
            .rsplit_once(':')
            .ok_or_else(|| Error::invalid_span(offset_id, "missing ':' separator"))?;
        let (start, last) = range
            .split_once('-')
            .ok_or_else(|| Error::invalid_span(offset_id, "missing '-' in offset range"))?;
        let start = parse_bound(offset_id, start)?;
        let last = parse_bound(offset_id, last)?;
        if last < start {
            return Err(Error::invalid_span(offset_id, "end precedes start"));
        }
        let end = last
            .checked_add(1)
            .ok_or_else(|| Error::invalid_span(offset_id, "end offset out of range"))?;
        Ok(Self::new(start, end))
    }

    /// Parse the canonical `[start:end)` rendering.
    pub fn parse(key: &str) -> Result<Self> {
        let inner = key
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| Error::invalid_span(key, "expected '[start:end)'"))?;
        let (start, end) = inner
            .split_once(':')
            .ok_or_else(|| Error::invalid_span(key, "missing ':' separator"))?;
        let start = parse_bound(key, start)?;
        let end = parse_bound(key, end)?;
        if end < start {
            return Err(Error::invalid_span(key, "end precedes start"));
        }
        Ok(Self::new(start, end))
    }

    /// Number of covered offsets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span covers nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The canonical event key for this span.
    #[must_use]
    pub fn key(&self) -> EventKey {
        EventKey(self.to_string())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{})", self.start, self.end)
    }
}

impl FromStr for Span {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_bound(input: &str, bound: &str) -> Result<usize> {
    bound
        .trim()
        .parse()
        .map_err(|_| Error::invalid_span(input, format!("'{}' is not an offset", bound)))
}

/// Canonical identity of an event within one document.
///
/// Keys are opaque strings on the wire. Keys produced by this crate always have
/// the `[start:end)` form, but keys handed in by a temporal source are taken
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKey(String);

impl EventKey {
    /// Wrap a key as given by a source.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the key as a span, if it has the canonical form.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        Span::parse(&self.0).ok()
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Span> for EventKey {
    fn from(span: Span) -> Self {
        span.key()
    }
}

impl From<&str> for EventKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EventKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for EventKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

//! Content items as read from the document store.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque identifier of a content item.
///
/// # Examples
///
/// ```
/// use sundowner_core::ContentId;
///
/// let id = ContentId::new("52a1f0c3");
/// assert_eq!(id.as_str(), "52a1f0c3");
/// assert_eq!(id.to_string(), "52a1f0c3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ContentId(String);

impl ContentId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContentId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for ContentId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Up and down vote counts recorded against a content item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Votes {
    /// Number of up votes.
    pub up: u64,
    /// Number of down votes.
    pub down: u64,
}

impl Votes {
    /// Build a vote tally.
    #[must_use]
    pub const fn new(up: u64, down: u64) -> Self {
        Self { up, down }
    }

    /// Total number of votes cast.
    #[must_use]
    pub const fn total(self) -> u64 {
        self.up.saturating_add(self.down)
    }
}

/// A unit of user-submitted content that can be ranked.
///
/// The item is owned by the document store; the scorer only reads it.
///
/// # Examples
///
/// ```
/// use sundowner_core::{ContentItem, Votes};
///
/// let item = ContentItem::new("a1", Votes::new(8, 2), 1_357_084_800);
/// assert_eq!(item.votes.total(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContentItem {
    /// Store identifier.
    pub id: ContentId,
    /// Vote tally.
    pub votes: Votes,
    /// Creation time as Unix seconds.
    pub created: i64,
}

impl ContentItem {
    /// Construct a content item.
    pub fn new(id: impl Into<ContentId>, votes: Votes, created: i64) -> Self {
        Self {
            id: id.into(),
            votes,
            created,
        }
    }
}

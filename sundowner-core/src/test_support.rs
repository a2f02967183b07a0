//! Test-only, in-memory `ContentStore` implementation used by unit and
//! behaviour tests.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::{ContentId, ContentItem, ContentStore, ScoreResult};

/// Errors raised by [`MemoryStore`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MemoryStoreError {
    /// The store was configured to fail every read.
    #[error("content listing is unavailable")]
    Unavailable,
    /// A write targeted an item the store does not hold.
    #[error("content {0} does not exist")]
    Missing(ContentId),
    /// A write targeted an item configured to reject updates.
    #[error("content {0} rejected the score update")]
    Rejected(ContentId),
}

/// In-memory `ContentStore` holding items and the scores written to them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Vec<ContentItem>,
    known: BTreeSet<ContentId>,
    scores: BTreeMap<ContentId, ScoreResult>,
    rejected: BTreeSet<ContentId>,
    unavailable: bool,
}

impl MemoryStore {
    /// Create a store from a collection of content items.
    pub fn with_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = ContentItem>,
    {
        let collected: Vec<ContentItem> = items.into_iter().collect();
        let known = collected.iter().map(|item| item.id.clone()).collect();
        Self {
            items: collected,
            known,
            ..Self::default()
        }
    }

    /// Make every write to `id` fail.
    #[must_use]
    pub fn rejecting(mut self, id: impl Into<ContentId>) -> Self {
        self.rejected.insert(id.into());
        self
    }

    /// Make [`ContentStore::load_content`] fail.
    #[must_use]
    pub const fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Score written for `id`, if any.
    #[must_use]
    pub fn score(&self, id: &ContentId) -> Option<ScoreResult> {
        self.scores.get(id).copied()
    }

    /// Number of items holding a score.
    #[must_use]
    pub fn scored_len(&self) -> usize {
        self.scores.len()
    }
}

impl ContentStore for MemoryStore {
    type Error = MemoryStoreError;

    fn load_content(&self) -> Result<Vec<ContentItem>, Self::Error> {
        if self.unavailable {
            return Err(MemoryStoreError::Unavailable);
        }
        Ok(self.items.clone())
    }

    fn write_score(&mut self, id: &ContentId, score: &ScoreResult) -> Result<(), Self::Error> {
        if self.rejected.contains(id) {
            return Err(MemoryStoreError::Rejected(id.clone()));
        }
        if !self.known.contains(id) {
            return Err(MemoryStoreError::Missing(id.clone()));
        }
        self.scores.insert(id.clone(), *score);
        Ok(())
    }
}

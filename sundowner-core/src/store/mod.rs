//! Data access traits for content items.
//!
//! The `ContentStore` trait is the seam between the scoring batch and the
//! document store holding content. Implementations read every item and apply
//! partial updates that replace only the stored score.

use crate::{ContentId, ContentItem, ScoreResult};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteContentStore, SqliteContentStoreError};

/// Read content and persist computed scores.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use sundowner_core::{ContentId, ContentItem, ContentStore, ScoreResult, Votes};
///
/// #[derive(Default)]
/// struct MapStore {
///     items: Vec<ContentItem>,
///     scores: HashMap<ContentId, ScoreResult>,
/// }
///
/// impl ContentStore for MapStore {
///     type Error = std::convert::Infallible;
///
///     fn load_content(&self) -> Result<Vec<ContentItem>, Self::Error> {
///         Ok(self.items.clone())
///     }
///
///     fn write_score(&mut self, id: &ContentId, score: &ScoreResult) -> Result<(), Self::Error> {
///         self.scores.insert(id.clone(), *score);
///         Ok(())
///     }
/// }
///
/// let store = MapStore {
///     items: vec![ContentItem::new("a", Votes::new(1, 0), 0)],
///     ..MapStore::default()
/// };
/// assert_eq!(store.load_content().map(|items| items.len()), Ok(1));
/// ```
pub trait ContentStore {
    /// Error raised by the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Return every content item eligible for scoring.
    ///
    /// # Errors
    /// Returns the store's error when items cannot be read.
    fn load_content(&self) -> Result<Vec<ContentItem>, Self::Error>;

    /// Replace the stored score of the item identified by `id`.
    ///
    /// Other fields of the item must be left untouched.
    ///
    /// # Errors
    /// Returns the store's error when the item is missing or the write fails.
    fn write_score(&mut self, id: &ContentId, score: &ScoreResult) -> Result<(), Self::Error>;
}

//! Error types raised while rescoring a content store.
#![forbid(unsafe_code)]

use sundowner_core::ContentId;
use thiserror::Error;

/// Errors raised by [`rescore`](crate::rescore).
#[derive(Debug, Error)]
pub enum RescoreError<E>
where
    E: std::error::Error + 'static,
{
    /// Listing the content to score failed; nothing was written.
    #[error("failed to load content for scoring")]
    Load {
        /// Source error from the content store.
        #[source]
        source: E,
    },
    /// Persisting one item's score failed under the abort policy.
    #[error("failed to write score for content {id} after {scored} successful updates")]
    Write {
        /// Identifier of the item whose update failed.
        id: ContentId,
        /// Items scored before the failure.
        scored: usize,
        /// Source error from the content store.
        #[source]
        source: E,
    },
}

//! Core domain types and scoring for the Sundowner content ranking engine.
//!
//! Content items are ranked by a composite score blending:
//! - a Wilson lower bound over the item's up and down votes;
//! - how close the item's creation time is to the evaluation instant on the
//!   daily cycle;
//! - the same closeness on the weekly cycle.
//!
//! The scoring functions are pure and take the evaluation instant explicitly.
//! The [`ContentStore`] trait describes the document store a batch driver
//! reads items from and writes scores back to.
//!
//! # Examples
//!
//! ```
//! use sundowner_core::{ContentItem, Votes, WeightConfig, compute_score};
//!
//! let now = 1_357_084_800;
//! let item = ContentItem::new("a", Votes::new(0, 0), now - 43_200);
//! let score = compute_score(&item, now, &WeightConfig::default());
//! assert_eq!(score.vote, 0.0);
//! assert_eq!(score.day_offset, 0.0);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod content;
pub mod proximity;
pub mod score;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
mod weights;

pub use content::{ContentId, ContentItem, Votes};
pub use proximity::{
    ProximityQuery, ProximityWeights, RankedContent, ScoredContent, rank_by_proximity,
};
pub use score::{
    CyclePeriod, ScoreResult, compute_score, cyclic_recency_score, day_offset_score,
    overall_score, week_offset_score, wilson_lower_bound,
};
pub use store::ContentStore;
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteContentStore, SqliteContentStoreError};
pub use weights::{WeightConfig, WeightConfigError};

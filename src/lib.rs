//! Facade crate for the Sundowner content ranking engine.
//!
//! This crate re-exports the core scoring types and the batch rescoring
//! driver, and exposes the SQLite content store behind a feature flag.

#![forbid(unsafe_code)]

pub use sundowner_core::{
    ContentId, ContentItem, ContentStore, CyclePeriod, ProximityQuery, ProximityWeights,
    RankedContent, ScoreResult, ScoredContent, Votes, WeightConfig, WeightConfigError,
    compute_score, cyclic_recency_score, day_offset_score, overall_score, rank_by_proximity,
    week_offset_score, wilson_lower_bound,
};
pub use sundowner_scorer::{FailurePolicy, RescoreError, RescoreOptions, RescoreSummary, rescore};

#[cfg(feature = "store-sqlite")]
pub use sundowner_core::{SqliteContentStore, SqliteContentStoreError};

#[cfg(feature = "test-support")]
pub use sundowner_core::test_support;

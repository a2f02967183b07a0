//! Batch rescoring for Sundowner content.
//!
//! The batch walks every item in a [`ContentStore`], computes its score with
//! [`compute_score`] and writes the result back as a partial update that
//! replaces only the stored score. The evaluation instant is captured once by
//! the caller and shared by every item so scores within one run are
//! comparable.
//!
//! # Examples
//!
//! ```no_run
//! use sundowner_core::{SqliteContentStore, WeightConfig};
//! use sundowner_scorer::{FailurePolicy, RescoreOptions, rescore};
//!
//! let mut store = SqliteContentStore::open("artifacts/content.db").expect("open content store");
//! let options = RescoreOptions::new(1_357_084_800, WeightConfig::default())
//!     .with_failure_policy(FailurePolicy::Skip);
//! let summary = rescore(&mut store, &options).expect("rescore content");
//! assert_eq!(summary.failed, 0);
//! ```

#![forbid(unsafe_code)]

use log::{debug, info, warn};
use serde::Serialize;
use sundowner_core::{ContentStore, WeightConfig, compute_score};

mod error;

pub use error::RescoreError;

/// What to do when persisting one item's score fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the batch at the first failed update.
    #[default]
    Abort,
    /// Log the failure and carry on with the next item.
    Skip,
}

/// Parameters shared by every item in one batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RescoreOptions {
    /// Evaluation instant in Unix seconds.
    pub now: i64,
    /// Component weights.
    pub weights: WeightConfig,
    /// Handling of per-item write failures.
    pub on_error: FailurePolicy,
}

impl RescoreOptions {
    /// Options aborting on the first failed update.
    #[must_use]
    pub const fn new(now: i64, weights: WeightConfig) -> Self {
        Self {
            now,
            weights,
            on_error: FailurePolicy::Abort,
        }
    }

    /// Replace the failure policy.
    #[must_use]
    pub const fn with_failure_policy(mut self, on_error: FailurePolicy) -> Self {
        self.on_error = on_error;
        self
    }
}

/// Outcome of a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RescoreSummary {
    /// Evaluation instant every item was scored against.
    pub now: i64,
    /// Items whose score was written.
    pub scored: usize,
    /// Items skipped because their update failed.
    pub failed: usize,
}

/// Score every item in `store` and persist the results.
///
/// # Errors
/// Returns [`RescoreError::Load`] when the store cannot list its content, and
/// [`RescoreError::Write`] when an update fails under
/// [`FailurePolicy::Abort`].
pub fn rescore<S>(
    store: &mut S,
    options: &RescoreOptions,
) -> Result<RescoreSummary, RescoreError<S::Error>>
where
    S: ContentStore,
{
    let items = store
        .load_content()
        .map_err(|source| RescoreError::Load { source })?;
    info!(
        "rescoring {} content items as of {}",
        items.len(),
        options.now
    );

    let mut summary = RescoreSummary {
        now: options.now,
        scored: 0,
        failed: 0,
    };
    for item in &items {
        let score = compute_score(item, options.now, &options.weights);
        match store.write_score(&item.id, &score) {
            Ok(()) => {
                debug!("content {} scored {:.4}", item.id, score.overall);
                summary.scored = summary.scored.saturating_add(1);
            }
            Err(source) => match options.on_error {
                FailurePolicy::Abort => {
                    return Err(RescoreError::Write {
                        id: item.id.clone(),
                        scored: summary.scored,
                        source,
                    });
                }
                FailurePolicy::Skip => {
                    warn!("skipping content {}: {source}", item.id);
                    summary.failed = summary.failed.saturating_add(1);
                }
            },
        }
    }

    info!(
        "rescored {} content items ({} failed)",
        summary.scored, summary.failed
    );
    Ok(summary)
}

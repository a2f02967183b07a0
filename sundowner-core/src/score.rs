//! Ranking score computation for content items.
//!
//! A content item's score blends three components:
//! - the lower bound of the Wilson score interval over its votes, a
//!   confidence-adjusted approval rate;
//! - how close its creation time is to the evaluation instant on the daily
//!   cycle;
//! - the same closeness on the weekly cycle.
//!
//! Every function is pure. The evaluation instant `now` is always an explicit
//! argument so that a batch can score all items against one reference point.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ContentItem, WeightConfig};

/// Standard normal quantile for a two-sided 95% confidence interval.
pub const WILSON_Z: f64 = 1.96;

/// Length of a repeating time cycle in seconds.
///
/// # Examples
///
/// ```
/// use sundowner_core::CyclePeriod;
///
/// assert_eq!(CyclePeriod::DAY.seconds(), 86_400);
/// assert!(CyclePeriod::new(0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CyclePeriod(u32);

impl CyclePeriod {
    /// One day.
    pub const DAY: Self = Self(86_400);
    /// One week.
    pub const WEEK: Self = Self(604_800);

    /// Build a period, rejecting zero.
    #[must_use]
    pub const fn new(seconds: u32) -> Option<Self> {
        if seconds == 0 {
            None
        } else {
            Some(Self(seconds))
        }
    }

    /// Period length in seconds.
    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.0
    }
}

/// Score components computed for one content item.
///
/// All components are kept so that a single dimension can be recomputed later
/// without re-deriving the others.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreResult {
    /// Weighted blend of the other components.
    pub overall: f64,
    /// Wilson lower bound over the item's votes.
    pub vote: f64,
    /// Time-of-day recency.
    pub day_offset: f64,
    /// Time-of-week recency.
    pub week_offset: f64,
}

impl ScoreResult {
    /// Recompute `overall` from the stored components using new weights.
    ///
    /// # Examples
    ///
    /// ```
    /// use sundowner_core::{ContentItem, Votes, WeightConfig, compute_score};
    ///
    /// let item = ContentItem::new("a", Votes::new(0, 0), 0);
    /// let score = compute_score(&item, 0, &WeightConfig::default());
    /// let reweighted = score.with_weights(&WeightConfig::new(0.0, 1.0, 0.0));
    /// assert_eq!(reweighted.overall, 1.0);
    /// assert_eq!(reweighted.vote, score.vote);
    /// ```
    #[must_use]
    pub fn with_weights(self, weights: &WeightConfig) -> Self {
        Self {
            overall: overall_score(self.vote, self.day_offset, self.week_offset, weights),
            ..self
        }
    }
}

/// Lower bound of the 95% Wilson score interval for the positive rating
/// proportion.
///
/// Answers "given these ratings, the true fraction of positive ratings is at
/// least what, with 95% confidence?". Returns `0.0` when no votes have been
/// cast and is never negative.
///
/// # Examples
///
/// ```
/// use sundowner_core::wilson_lower_bound;
///
/// assert_eq!(wilson_lower_bound(0, 0), 0.0);
/// let bound = wilson_lower_bound(8, 2);
/// assert!(bound > 0.49 && bound < 0.491);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "the Wilson interval is a closed-form floating-point formula over vote counts"
)]
pub fn wilson_lower_bound(up: u64, down: u64) -> f64 {
    let total = up.saturating_add(down);
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    let p_hat = up as f64 / n;
    let z_squared = WILSON_Z * WILSON_Z;

    let centre = p_hat + z_squared / (2.0 * n);
    let spread = WILSON_Z * ((p_hat * (1.0 - p_hat) + z_squared / (4.0 * n)) / n).sqrt();
    // Rounding can leave the bound a hair below zero when no vote is positive.
    ((centre - spread) / (1.0 + z_squared / n)).max(0.0)
}

/// Closeness of two timestamps by their position within a repeating cycle.
///
/// Only the phase within the cycle matters, so which day or week either
/// timestamp falls in is ignored. The cycle is circular: the largest possible
/// distance is half a period, at the antipodal phase. Returns `1.0` when the
/// phases coincide and `0.0` at the antipode, falling linearly in between.
///
/// # Examples
///
/// ```
/// use sundowner_core::{CyclePeriod, cyclic_recency_score};
///
/// let noon = 43_200;
/// assert_eq!(cyclic_recency_score(0, noon, CyclePeriod::DAY), 0.0);
/// assert_eq!(cyclic_recency_score(86_400, 0, CyclePeriod::DAY), 1.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "phase distances are bounded by a u32 period and convert to f64 exactly"
)]
pub fn cyclic_recency_score(created: i64, now: i64, period: CyclePeriod) -> f64 {
    let length = i64::from(period.seconds());
    let content_phase = created.rem_euclid(length);
    let now_phase = now.rem_euclid(length);

    let direct = content_phase.abs_diff(now_phase);
    let length_unsigned = u64::from(period.seconds());
    let shortest = if direct.saturating_mul(2) > length_unsigned {
        length_unsigned.saturating_sub(direct)
    } else {
        direct
    };

    1.0 - (2.0 * shortest as f64) / f64::from(period.seconds())
}

/// Time-of-day recency of `created` relative to `now`.
#[must_use]
pub fn day_offset_score(created: i64, now: i64) -> f64 {
    cyclic_recency_score(created, now, CyclePeriod::DAY)
}

/// Time-of-week recency of `created` relative to `now`.
#[must_use]
pub fn week_offset_score(created: i64, now: i64) -> f64 {
    cyclic_recency_score(created, now, CyclePeriod::WEEK)
}

/// Weighted sum of the three score components.
///
/// No normalisation is applied.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the overall score is a linear combination of components"
)]
pub const fn overall_score(
    vote: f64,
    day_offset: f64,
    week_offset: f64,
    weights: &WeightConfig,
) -> f64 {
    vote * weights.vote + day_offset * weights.day_offset + week_offset * weights.week_offset
}

/// Compute every score component for `item` as of `now`.
///
/// # Examples
///
/// ```
/// use sundowner_core::{ContentItem, Votes, WeightConfig, compute_score};
///
/// let now = 1_357_084_800;
/// let item = ContentItem::new("a", Votes::new(8, 2), now);
/// let score = compute_score(&item, now, &WeightConfig::default());
/// assert_eq!(score.day_offset, 1.0);
/// assert_eq!(score.week_offset, 1.0);
/// assert!((score.overall - 0.7921).abs() < 1e-4);
/// ```
#[must_use]
pub fn compute_score(item: &ContentItem, now: i64, weights: &WeightConfig) -> ScoreResult {
    let vote = wilson_lower_bound(item.votes.up, item.votes.down);
    let day_offset = day_offset_score(item.created, now);
    let week_offset = week_offset_score(item.created, now);
    ScoreResult {
        overall: overall_score(vote, day_offset, week_offset, weights),
        vote,
        day_offset,
        week_offset,
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point scores within a tolerance"
)]
mod tests {
    use super::*;
    use crate::Votes;
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-9;
    const SECONDS_PER_HOUR: i64 = 3_600;

    #[rstest]
    #[case(1, 0, 0.206_543_291_473_892_9)]
    #[case(8, 2, 0.490_156_846_720_723_5)]
    #[case(5, 5, 0.236_589_593_615_487_3)]
    #[case(100, 3, 0.917_840_254_311_252_8)]
    fn wilson_matches_reference_values(#[case] up: u64, #[case] down: u64, #[case] expected: f64) {
        let bound = wilson_lower_bound(up, down);
        assert!(
            (bound - expected).abs() < TOLERANCE,
            "expected {expected}, got {bound}"
        );
    }

    #[rstest]
    fn wilson_without_positive_votes_is_zero() {
        assert!(wilson_lower_bound(0, 7).abs() < TOLERANCE);
    }

    #[rstest]
    fn wilson_is_never_negative_without_positive_votes() {
        for down in 1..=200 {
            let bound = wilson_lower_bound(0, down);
            assert!(bound >= 0.0, "down={down} gave {bound}");
        }
    }

    /// Walk two days hour by hour against midnight and compare with the
    /// expected hour distances around the daily circle.
    #[rstest]
    fn day_offset_follows_the_daily_circle() {
        let start = 1_356_998_400; // 2013-01-01T00:00:00Z
        let reference = 1_357_084_800; // 2013-01-02T00:00:00Z
        let expected_hours = [0_i64, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]
            .into_iter()
            .cycle()
            .take(48);

        for (hour, expected) in (0_i64..48).zip(expected_hours) {
            let created = start + hour * SECONDS_PER_HOUR;
            let distance = expected * SECONDS_PER_HOUR;
            #[expect(
                clippy::cast_precision_loss,
                reason = "test distances are small whole numbers of seconds"
            )]
            let expected_score = 1.0 - distance as f64 / 43_200.0;
            let actual = day_offset_score(created, reference);
            assert!(
                (actual - expected_score).abs() < TOLERANCE,
                "hour {hour}: expected {expected_score}, got {actual}"
            );
        }
    }

    #[rstest]
    #[case(-1, 86_399)]
    #[case(-86_400, 0)]
    fn negative_timestamps_use_euclidean_phase(#[case] created: i64, #[case] same_phase: i64) {
        let now = 10_000;
        let lhs = day_offset_score(created, now);
        let rhs = day_offset_score(same_phase, now);
        assert!((lhs - rhs).abs() < TOLERANCE);
    }

    #[rstest]
    fn odd_periods_wrap_at_half_length() {
        let period = CyclePeriod::new(5).unwrap_or(CyclePeriod::DAY);
        assert!((cyclic_recency_score(0, 2, period) - 0.2).abs() < TOLERANCE);
        assert!((cyclic_recency_score(0, 3, period) - 0.2).abs() < TOLERANCE);
    }

    #[rstest]
    fn week_offset_is_zero_half_a_week_later() {
        let now = 1_357_084_800;
        assert!(week_offset_score(now - 302_400, now).abs() < TOLERANCE);
    }

    #[rstest]
    fn compute_score_keeps_every_component() {
        let now = 1_357_084_800;
        let item = ContentItem::new("a", Votes::new(0, 0), now - 43_200);
        let score = compute_score(&item, now, &WeightConfig::default());

        assert!(score.vote.abs() < TOLERANCE);
        assert!(score.day_offset.abs() < TOLERANCE);
        let expected_week = 1.0 - 43_200.0 / 302_400.0;
        assert!((score.week_offset - expected_week).abs() < TOLERANCE);
        assert!((score.overall - 0.1 * expected_week).abs() < TOLERANCE);
    }
}

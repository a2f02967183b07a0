//! Re-rank scored content by distance from a target location.
//!
//! The stored overall score cannot account for where the reader is, so a
//! secondary in-memory pass blends it with how close each item is to the
//! target point. Items outside the query radius are dropped.

use std::cmp::Ordering;

use geo::{Distance, Haversine, Point};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ContentId, ScoreResult};

/// Radius in metres within which content is considered nearby.
pub const DEFAULT_QUERY_RADIUS_M: f64 = 2_000.0;

/// Number of items returned when no limit is configured.
pub const DEFAULT_LIMIT: usize = 10;

/// Content with a known location and a previously computed score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoredContent {
    /// Store identifier.
    pub id: ContentId,
    /// Position as (longitude, latitude) in degrees.
    pub location: Point<f64>,
    /// Stored score components.
    pub score: ScoreResult,
}

/// Relative weight of the stored score against closeness.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProximityWeights {
    /// Multiplier for the stored overall score.
    pub score: f64,
    /// Multiplier for the distance score.
    pub distance: f64,
}

impl Default for ProximityWeights {
    fn default() -> Self {
        Self {
            score: 0.5,
            distance: 0.5,
        }
    }
}

/// Parameters for [`rank_by_proximity`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityQuery {
    /// Items further than this many metres are excluded.
    pub radius_m: f64,
    /// Maximum number of items returned.
    pub limit: usize,
    /// Blend weights.
    pub weights: ProximityWeights,
}

impl Default for ProximityQuery {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_QUERY_RADIUS_M,
            limit: DEFAULT_LIMIT,
            weights: ProximityWeights::default(),
        }
    }
}

/// A content item placed in a proximity ranking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RankedContent {
    /// Store identifier.
    pub id: ContentId,
    /// Blend of the stored overall score and the distance score.
    pub rank: f64,
    /// Great-circle distance to the target in metres.
    pub distance_m: f64,
    /// `1 - distance / radius`.
    pub distance_score: f64,
    /// Stored score components.
    pub score: ScoreResult,
}

/// Rank `items` by a blend of stored score and closeness to `target`.
///
/// Returns at most `query.limit` items, best first. Ties are broken by
/// identifier so the output is deterministic.
///
/// # Examples
///
/// ```
/// use geo::Point;
/// use sundowner_core::{ContentId, ProximityQuery, ScoreResult, ScoredContent, rank_by_proximity};
///
/// let score = ScoreResult { overall: 0.5, vote: 0.5, day_offset: 0.5, week_offset: 0.5 };
/// let here = Point::new(101.69, 3.14);
/// let items = vec![ScoredContent { id: ContentId::new("a"), location: here, score }];
/// let ranked = rank_by_proximity(here, &items, &ProximityQuery::default());
/// assert_eq!(ranked.len(), 1);
/// assert_eq!(ranked[0].distance_score, 1.0);
/// ```
#[must_use]
pub fn rank_by_proximity(
    target: Point<f64>,
    items: &[ScoredContent],
    query: &ProximityQuery,
) -> Vec<RankedContent> {
    let mut ranked: Vec<RankedContent> = items
        .iter()
        .filter_map(|item| rank_item(target, item, query))
        .collect();
    ranked.sort_by(|lhs, rhs| {
        rhs.rank
            .partial_cmp(&lhs.rank)
            .unwrap_or(Ordering::Equal)
            .then_with(|| lhs.id.cmp(&rhs.id))
    });
    ranked.truncate(query.limit);
    ranked
}

#[expect(
    clippy::float_arithmetic,
    reason = "distance standardisation and blending are floating-point operations"
)]
fn rank_item(
    target: Point<f64>,
    item: &ScoredContent,
    query: &ProximityQuery,
) -> Option<RankedContent> {
    let distance_m = Haversine.distance(item.location, target);
    if !distance_m.is_finite() || distance_m > query.radius_m {
        return None;
    }
    let distance_score = 1.0 - distance_m / query.radius_m;
    let rank =
        item.score.overall * query.weights.score + distance_score * query.weights.distance;
    Some(RankedContent {
        id: item.id.clone(),
        rank,
        distance_m,
        distance_score,
        score: item.score,
    })
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point scores within a tolerance"
)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const KUALA_LUMPUR: (f64, f64) = (101.6869, 3.1390);

    fn score(overall: f64) -> ScoreResult {
        ScoreResult {
            overall,
            vote: overall,
            day_offset: overall,
            week_offset: overall,
        }
    }

    fn item(id: &str, dx_degrees: f64, overall: f64) -> ScoredContent {
        ScoredContent {
            id: ContentId::new(id),
            location: Point::new(KUALA_LUMPUR.0 + dx_degrees, KUALA_LUMPUR.1),
            score: score(overall),
        }
    }

    #[fixture]
    fn target() -> Point<f64> {
        Point::new(KUALA_LUMPUR.0, KUALA_LUMPUR.1)
    }

    #[rstest]
    fn closer_items_win_when_scores_tie(target: Point<f64>) {
        let items = [item("far", 0.01, 0.5), item("near", 0.001, 0.5)];
        let ranked = rank_by_proximity(target, &items, &ProximityQuery::default());
        let ids: Vec<&str> = ranked.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, ["near", "far"]);
    }

    #[rstest]
    fn items_outside_radius_are_dropped(target: Point<f64>) {
        // 0.1 degrees of longitude near the equator is roughly 11 km.
        let items = [item("outside", 0.1, 1.0), item("inside", 0.0, 0.0)];
        let ranked = rank_by_proximity(target, &items, &ProximityQuery::default());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked.first().map(|entry| entry.id.as_str()), Some("inside"));
    }

    #[rstest]
    fn stored_score_can_outweigh_distance(target: Point<f64>) {
        let items = [item("popular", 0.005, 1.0), item("close", 0.0, 0.0)];
        let ranked = rank_by_proximity(target, &items, &ProximityQuery::default());
        assert_eq!(ranked.first().map(|entry| entry.id.as_str()), Some("popular"));
    }

    #[rstest]
    fn limit_truncates_and_ties_sort_by_id(target: Point<f64>) {
        let items = [item("c", 0.0, 0.2), item("a", 0.0, 0.2), item("b", 0.0, 0.2)];
        let query = ProximityQuery {
            limit: 2,
            ..ProximityQuery::default()
        };
        let ranked = rank_by_proximity(target, &items, &query);
        let ids: Vec<&str> = ranked.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        let first = ranked.first().map_or(f64::NAN, |entry| entry.rank);
        assert!((first - 0.6).abs() < 1e-9);
    }
}

//! Behavioural coverage for computing content scores.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sundowner_core::{ContentItem, ScoreResult, Votes, WeightConfig, compute_score};

/// Evaluation instant shared by every scenario (2013-01-02T00:00:00Z).
const NOW: i64 = 1_357_084_800;
const TOLERANCE: f64 = 1e-4;

/// Scenario state: the item under test and its computed score.
#[derive(Debug, Default)]
struct ScoreWorld {
    item: RefCell<Option<ContentItem>>,
    score: RefCell<Option<ScoreResult>>,
}

impl ScoreWorld {
    fn score(&self) -> ScoreResult {
        let stored = *self.score.borrow();
        stored.unwrap_or_else(|| panic!("score must be computed before assertions"))
    }
}

#[fixture]
fn world() -> ScoreWorld {
    ScoreWorld::default()
}

#[given(
    "a content item with {up} up votes and {down} down votes created {age} seconds before the evaluation instant"
)]
fn given_item(world: &ScoreWorld, up: u64, down: u64, age: i64) {
    let item = ContentItem::new("scenario", Votes::new(up, down), NOW - age);
    world.item.replace(Some(item));
}

#[when("I compute its score with the default weights")]
fn when_scored(world: &ScoreWorld) {
    let borrowed = world.item.borrow();
    let item = borrowed
        .as_ref()
        .unwrap_or_else(|| panic!("content item must be initialised"));
    let score = compute_score(item, NOW, &WeightConfig::default());
    world.score.replace(Some(score));
}

#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point scores"
)]
fn assert_close(label: &str, actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "{label}: expected {expected}, got {actual}"
    );
}

#[then("the vote score is approximately {expected}")]
fn then_vote(world: &ScoreWorld, expected: f64) {
    assert_close("vote", world.score().vote, expected);
}

#[then("the day offset score is approximately {expected}")]
fn then_day_offset(world: &ScoreWorld, expected: f64) {
    assert_close("day offset", world.score().day_offset, expected);
}

#[then("the week offset score is approximately {expected}")]
fn then_week_offset(world: &ScoreWorld, expected: f64) {
    assert_close("week offset", world.score().week_offset, expected);
}

#[then("the overall score is approximately {expected}")]
fn then_overall(world: &ScoreWorld, expected: f64) {
    assert_close("overall", world.score().overall, expected);
}

#[scenario(path = "tests/features/score.feature", index = 0)]
fn well_liked_item_created_now(world: ScoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/score.feature", index = 1)]
fn unvoted_item_has_no_vote_signal(world: ScoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/score.feature", index = 2)]
fn half_day_old_item_is_furthest_on_daily_cycle(world: ScoreWorld) {
    let _ = world;
}

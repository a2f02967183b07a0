#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for rescoring a SQLite content database.

use std::cell::RefCell;
use std::path::PathBuf;

use geo::Point;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use rusqlite::Connection;
use sundowner_core::{
    ContentId, ContentItem, SqliteContentStore, SqliteContentStoreError, Votes, WeightConfig,
};
use sundowner_scorer::{RescoreError, RescoreOptions, RescoreSummary, rescore};
use tempfile::TempDir;

/// Evaluation instant shared by every scenario (2013-01-02T00:00:00Z).
const NOW: i64 = 1_357_084_800;
const SECONDS_PER_DAY: i64 = 86_400;

type Outcome = Result<RescoreSummary, RescoreError<SqliteContentStoreError>>;

/// Aggregate fixtures shared across the BDD scenarios.
pub struct RescoreContext {
    temp_dir: TempDir,
    db_path: RefCell<Option<PathBuf>>,
    outcome: RefCell<Option<Outcome>>,
}

impl RescoreContext {
    fn db_path(&self) -> PathBuf {
        self.db_path
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("database path must be initialised"))
    }

    fn store(&self) -> SqliteContentStore {
        SqliteContentStore::open(self.db_path()).expect("reopen content store")
    }
}

#[fixture]
/// Build a fresh `RescoreContext` for each scenario run.
pub fn context() -> RescoreContext {
    RescoreContext {
        temp_dir: TempDir::new().expect("create tempdir for scenario"),
        db_path: RefCell::new(None),
        outcome: RefCell::new(None),
    }
}

fn new_store(context: &RescoreContext) -> SqliteContentStore {
    let path = context.temp_dir.path().join("content.db");
    let store = SqliteContentStore::create(&path).expect("create content store");
    context.db_path.replace(Some(path));
    store
}

#[given("a SQLite content database with three items")]
fn database_with_items(context: &RescoreContext) {
    let store = new_store(context);
    let rows = [
        (
            ContentItem::new("fresh", Votes::new(8, 2), NOW),
            Some(Point::new(101.69, 3.14)),
        ),
        (
            ContentItem::new("unvoted", Votes::new(0, 0), NOW - SECONDS_PER_DAY),
            None,
        ),
        (
            ContentItem::new("disliked", Votes::new(1, 20), NOW - 7 * SECONDS_PER_DAY),
            Some(Point::new(101.70, 3.15)),
        ),
    ];
    for (item, location) in &rows {
        store
            .insert_content(item, *location)
            .expect("insert content item");
    }
}

#[given("a SQLite content database with a negative vote count")]
fn database_with_negative_votes(context: &RescoreContext) {
    let store = new_store(context);
    store
        .insert_content(&ContentItem::new("valid", Votes::new(2, 0), NOW), None)
        .expect("insert valid item");
    drop(store);
    let connection = Connection::open(context.db_path()).expect("open database");
    connection
        .execute(
            "INSERT INTO content (id, votes_up, votes_down, created) VALUES ('broken', 1, -4, ?1)",
            [NOW],
        )
        .expect("insert invalid item");
}

#[when("I rescore the database at the evaluation instant")]
fn rescore_database(context: &RescoreContext) {
    let mut store = context.store();
    let outcome = rescore(&mut store, &RescoreOptions::new(NOW, WeightConfig::default()));
    context.outcome.replace(Some(outcome));
}

#[then("every item has a stored score")]
fn every_item_scored(context: &RescoreContext) {
    let binding = context.outcome.borrow();
    match binding.as_ref() {
        Some(Ok(summary)) => assert_eq!(summary.scored, 3),
        Some(Err(err)) => panic!("rescore should succeed, got {err}"),
        None => panic!("rescore outcome must be recorded"),
    }
    let store = context.store();
    for id in ["fresh", "unvoted", "disliked"] {
        let score = store
            .stored_score(&ContentId::new(id))
            .expect("read stored score");
        assert!(score.is_some(), "{id} should have a score");
    }
}

#[then("the overall score of item {id} is approximately {expected}")]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point scores"
)]
fn overall_score_of(context: &RescoreContext, id: String, expected: f64) {
    let score = context
        .store()
        .stored_score(&ContentId::new(id.as_str()))
        .expect("read stored score")
        .unwrap_or_else(|| panic!("{id} should have a score"));
    assert!(
        (score.overall - expected).abs() < 1e-4,
        "{id}: expected {expected}, got {}",
        score.overall
    );
}

#[then("the other content columns are unchanged")]
fn other_columns_unchanged(context: &RescoreContext) {
    let connection = Connection::open(context.db_path()).expect("open database");
    let (up, down, created, lng): (i64, i64, i64, Option<f64>) = connection
        .query_row(
            "SELECT votes_up, votes_down, created, lng FROM content WHERE id = 'fresh'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .expect("read fresh row");
    assert_eq!((up, down, created, lng), (8, 2, NOW, Some(101.69)));
}

#[then("rescoring fails while loading content")]
fn rescore_fails_on_load(context: &RescoreContext) {
    let binding = context.outcome.borrow();
    match binding.as_ref() {
        Some(Err(RescoreError::Load {
            source: SqliteContentStoreError::NegativeVotes { id, field, raw },
        })) => {
            assert_eq!(id.as_str(), "broken");
            assert_eq!(*field, "votes_down");
            assert_eq!(*raw, -4);
        }
        Some(Err(other)) => panic!("unexpected error: {other}"),
        Some(Ok(summary)) => panic!("expected rescoring to fail, got {summary:?}"),
        None => panic!("rescore outcome must be recorded"),
    }
}

#[then("no item has a stored score")]
fn nothing_written(context: &RescoreContext) {
    let store = context.store();
    for id in ["valid", "broken"] {
        let score = store
            .stored_score(&ContentId::new(id))
            .expect("read stored score");
        assert!(score.is_none(), "{id} should not have a score");
    }
}

#[scenario(path = "tests/features/rescore.feature", index = 0)]
fn rescoring_stores_every_score(context: RescoreContext) {
    let _ = context;
}

#[scenario(path = "tests/features/rescore.feature", index = 1)]
fn negative_votes_abort_the_batch(context: RescoreContext) {
    let _ = context;
}

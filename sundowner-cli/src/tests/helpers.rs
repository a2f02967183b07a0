//! Test helpers for building scratch content databases.

use camino::{Utf8Path, Utf8PathBuf};
use geo::Point;
use sundowner_core::{
    ContentId, ContentItem, ContentStore, ScoreResult, SqliteContentStore, Votes,
};
use tempfile::TempDir;

/// Evaluation instant shared by CLI tests: 2013-01-02T00:00:00Z.
pub(super) const NOW: i64 = 1_357_084_800;

/// Scratch directory holding a content database.
#[derive(Debug)]
pub(super) struct ContentDb {
    _dir: TempDir,
    root: Utf8PathBuf,
    path: Utf8PathBuf,
}

impl ContentDb {
    /// Create an empty content database in a fresh temporary directory.
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let path = root.join("content.db");
        SqliteContentStore::create(path.as_std_path()).expect("create content db");
        Self {
            _dir: dir,
            root,
            path,
        }
    }

    pub(super) fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn insert(&self, item: &ContentItem, location: Option<Point<f64>>) {
        self.store()
            .insert_content(item, location)
            .expect("insert content");
    }

    /// Insert a located item that already carries `overall` as its score.
    pub(super) fn insert_scored(&self, id: &str, location: Point<f64>, overall: f64) {
        let item = ContentItem::new(id, Votes::new(0, 0), NOW);
        let mut store = self.store();
        store
            .insert_content(&item, Some(location))
            .expect("insert content");
        let score = ScoreResult {
            overall,
            vote: 0.0,
            day_offset: 0.0,
            week_offset: 0.0,
        };
        store
            .write_score(&ContentId::new(id), &score)
            .expect("write score");
    }

    pub(super) fn stored_score(&self, id: &str) -> Option<ScoreResult> {
        self.store()
            .stored_score(&ContentId::new(id))
            .expect("read stored score")
    }

    fn store(&self) -> SqliteContentStore {
        SqliteContentStore::open(self.path.as_std_path()).expect("open content db")
    }
}

/// Assert two floats agree to four decimal places.
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point scores"
)]
pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, found {actual}"
    );
}

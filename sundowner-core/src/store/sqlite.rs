//! SQLite-backed content store.
//!
//! Content lives in a single `content` table. The computed score is kept as a
//! JSON object in the `score` column so that the four components travel
//! together and a score update never touches the other columns.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use geo::Point;
use log::debug;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use thiserror::Error;

use crate::{ContentId, ContentItem, ContentStore, ScoreResult, ScoredContent, Votes};

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS content (
    id TEXT PRIMARY KEY,
    votes_up INTEGER NOT NULL DEFAULT 0,
    votes_down INTEGER NOT NULL DEFAULT 0,
    created INTEGER NOT NULL,
    lng REAL,
    lat REAL,
    score TEXT
)";

/// Error raised when reading content or persisting scores.
#[derive(Debug, Error)]
pub enum SqliteContentStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Preparing or executing a statement failed.
    #[error("failed to {operation}: {source}")]
    Query {
        /// Description of the failed operation.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A stored vote count was negative.
    #[error("content {id} has a negative {field} count ({raw})")]
    NegativeVotes {
        /// Identifier of the affected item.
        id: ContentId,
        /// Column holding the invalid count.
        field: &'static str,
        /// Raw value read from the database.
        raw: i64,
    },
    /// A vote count was too large to store as a SQLite integer.
    #[error("content {id} has a {field} count too large to store ({value})")]
    VoteCountOverflow {
        /// Identifier of the affected item.
        id: ContentId,
        /// Column that would hold the count.
        field: &'static str,
        /// Count supplied by the caller.
        value: u64,
    },
    /// A score update targeted an item that does not exist.
    #[error("content {id} does not exist")]
    MissingContent {
        /// Identifier passed to the update.
        id: ContentId,
    },
    /// Encoding a score as JSON failed.
    #[error("failed to encode score for content {id}: {source}")]
    EncodeScore {
        /// Identifier of the affected item.
        id: ContentId,
        /// JSON encoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored score was not valid JSON.
    #[error("failed to parse stored score for content {id}: {source}")]
    InvalidScore {
        /// Identifier of the affected item.
        id: ContentId,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Content store persisted in a SQLite database.
pub struct SqliteContentStore {
    connection: Connection,
    path: PathBuf,
}

impl fmt::Debug for SqliteContentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteContentStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteContentStore {
    /// Open an existing database for reading and score updates.
    ///
    /// # Errors
    /// Returns [`SqliteContentStoreError::OpenDatabase`] when the file is
    /// missing or cannot be opened.
    pub fn open<P>(database_path: P) -> Result<Self, SqliteContentStoreError>
    where
        P: AsRef<Path>,
    {
        let path = database_path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)
            .map_err(|source| SqliteContentStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            connection,
            path: path.to_path_buf(),
        })
    }

    /// Create (or open) a database and ensure the `content` table exists.
    ///
    /// # Errors
    /// Returns [`SqliteContentStoreError`] when the file cannot be opened or
    /// the schema cannot be applied.
    pub fn create<P>(database_path: P) -> Result<Self, SqliteContentStoreError>
    where
        P: AsRef<Path>,
    {
        let path = database_path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqliteContentStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        connection
            .execute(SCHEMA_SQL, [])
            .map_err(|source| SqliteContentStoreError::Query {
                operation: "create content table",
                source,
            })?;
        Ok(Self {
            connection,
            path: path.to_path_buf(),
        })
    }

    /// Insert a new content item with an optional location and no score.
    ///
    /// # Errors
    /// Returns [`SqliteContentStoreError::Query`] when the insert fails, for
    /// example on a duplicate identifier, and
    /// [`SqliteContentStoreError::VoteCountOverflow`] when a vote count exceeds
    /// `i64::MAX`.
    pub fn insert_content(
        &self,
        item: &ContentItem,
        location: Option<Point<f64>>,
    ) -> Result<(), SqliteContentStoreError> {
        let up = stored_vote_count(&item.id, "votes_up", item.votes.up)?;
        let down = stored_vote_count(&item.id, "votes_down", item.votes.down)?;
        self.connection
            .execute(
                "INSERT INTO content (id, votes_up, votes_down, created, lng, lat)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    item.id.as_str(),
                    up,
                    down,
                    item.created,
                    location.map(|point| point.x()),
                    location.map(|point| point.y()),
                ],
            )
            .map_err(|source| SqliteContentStoreError::Query {
                operation: "insert content",
                source,
            })?;
        Ok(())
    }

    /// Read the stored score of one item, if it has been scored.
    ///
    /// # Errors
    /// Returns [`SqliteContentStoreError`] when the query fails, the item is
    /// missing, or the stored JSON is malformed.
    pub fn stored_score(
        &self,
        id: &ContentId,
    ) -> Result<Option<ScoreResult>, SqliteContentStoreError> {
        let row: Option<Option<String>> = self
            .connection
            .query_row(
                "SELECT score FROM content WHERE id = ?1",
                [id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| SqliteContentStoreError::Query {
                operation: "read stored score",
                source,
            })?;
        let Some(raw) = row else {
            return Err(SqliteContentStoreError::MissingContent { id: id.clone() });
        };
        raw.map(|json| parse_score(id, &json)).transpose()
    }

    /// Return scored items that carry a location, ordered by identifier.
    ///
    /// # Errors
    /// Returns [`SqliteContentStoreError`] when the query fails or a stored
    /// score is malformed.
    pub fn load_scored_content(&self) -> Result<Vec<ScoredContent>, SqliteContentStoreError> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT id, lng, lat, score FROM content
                 WHERE lng IS NOT NULL AND lat IS NOT NULL AND score IS NOT NULL
                 ORDER BY id",
            )
            .map_err(|source| SqliteContentStoreError::Query {
                operation: "prepare scored content selection",
                source,
            })?;
        let rows = statement
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let lng: f64 = row.get(1)?;
                let lat: f64 = row.get(2)?;
                let score: String = row.get(3)?;
                Ok((id, lng, lat, score))
            })
            .map_err(|source| SqliteContentStoreError::Query {
                operation: "query scored content",
                source,
            })?;

        let mut scored = Vec::new();
        for row in rows {
            let (raw_id, lng, lat, json) = row.map_err(|source| SqliteContentStoreError::Query {
                operation: "read scored content row",
                source,
            })?;
            let id = ContentId::new(raw_id);
            let score = parse_score(&id, &json)?;
            scored.push(ScoredContent {
                id,
                location: Point::new(lng, lat),
                score,
            });
        }
        Ok(scored)
    }
}

impl ContentStore for SqliteContentStore {
    type Error = SqliteContentStoreError;

    fn load_content(&self) -> Result<Vec<ContentItem>, Self::Error> {
        let mut statement = self
            .connection
            .prepare("SELECT id, votes_up, votes_down, created FROM content ORDER BY id")
            .map_err(|source| SqliteContentStoreError::Query {
                operation: "prepare content selection",
                source,
            })?;
        let rows = statement
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let up: i64 = row.get(1)?;
                let down: i64 = row.get(2)?;
                let created: i64 = row.get(3)?;
                Ok((id, up, down, created))
            })
            .map_err(|source| SqliteContentStoreError::Query {
                operation: "query content",
                source,
            })?;

        let mut items = Vec::new();
        for row in rows {
            let (raw_id, up, down, created) =
                row.map_err(|source| SqliteContentStoreError::Query {
                    operation: "read content row",
                    source,
                })?;
            let id = ContentId::new(raw_id);
            let votes = Votes::new(
                vote_count(&id, "votes_up", up)?,
                vote_count(&id, "votes_down", down)?,
            );
            items.push(ContentItem { id, votes, created });
        }
        debug!("loaded {} content items from {}", items.len(), self.path.display());
        Ok(items)
    }

    fn write_score(&mut self, id: &ContentId, score: &ScoreResult) -> Result<(), Self::Error> {
        let json =
            serde_json::to_string(score).map_err(|source| SqliteContentStoreError::EncodeScore {
                id: id.clone(),
                source,
            })?;
        let updated = self
            .connection
            .execute(
                "UPDATE content SET score = ?1 WHERE id = ?2",
                params![json, id.as_str()],
            )
            .map_err(|source| SqliteContentStoreError::Query {
                operation: "update content score",
                source,
            })?;
        if updated == 0 {
            return Err(SqliteContentStoreError::MissingContent { id: id.clone() });
        }
        Ok(())
    }
}

fn vote_count(
    id: &ContentId,
    field: &'static str,
    raw: i64,
) -> Result<u64, SqliteContentStoreError> {
    u64::try_from(raw).map_err(|_| SqliteContentStoreError::NegativeVotes {
        id: id.clone(),
        field,
        raw,
    })
}

fn stored_vote_count(
    id: &ContentId,
    field: &'static str,
    value: u64,
) -> Result<i64, SqliteContentStoreError> {
    i64::try_from(value).map_err(|_| SqliteContentStoreError::VoteCountOverflow {
        id: id.clone(),
        field,
        value,
    })
}

fn parse_score(id: &ContentId, json: &str) -> Result<ScoreResult, SqliteContentStoreError> {
    serde_json::from_str(json).map_err(|source| SqliteContentStoreError::InvalidScore {
        id: id.clone(),
        source,
    })
}

//! Error types emitted by the Sundowner CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sundowner_core::{SqliteContentStoreError, WeightConfigError};
use sundowner_scorer::RescoreError;
use thiserror::Error;

/// Errors emitted by the Sundowner CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Option name.
        field: &'static str,
        /// Environment variable that can supply the option.
        env: &'static str,
    },
    /// The content database does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The content database path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Option name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// The content database path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Option name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Configured score weights were rejected.
    #[error("invalid score weights: {0}")]
    InvalidWeights(#[from] WeightConfigError),
    /// A coordinate was outside its valid range.
    #[error("{field} {value} is outside {min}..={max}")]
    CoordinateOutOfRange {
        /// Option name.
        field: &'static str,
        /// Rejected value.
        value: f64,
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// The proximity radius was not a positive finite number.
    #[error("radius must be a positive number of metres, got {value}")]
    InvalidRadius {
        /// Rejected value.
        value: f64,
    },
    /// The system clock reported a time that cannot be used as `now`.
    #[error("system clock is unusable: {reason}")]
    Clock {
        /// Description of the clock failure.
        reason: String,
    },
    /// Opening or reading the content store failed.
    #[error(transparent)]
    ContentStore(#[from] Box<SqliteContentStoreError>),
    /// Rescoring the content store failed.
    #[error("rescore failed: {0}")]
    Rescore(#[source] Box<RescoreError<SqliteContentStoreError>>),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<SqliteContentStoreError> for CliError {
    fn from(source: SqliteContentStoreError) -> Self {
        Self::ContentStore(Box::new(source))
    }
}

impl From<RescoreError<SqliteContentStoreError>> for CliError {
    fn from(source: RescoreError<SqliteContentStoreError>) -> Self {
        Self::Rescore(Box::new(source))
    }
}

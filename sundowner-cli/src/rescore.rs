//! Rescore command implementation for the Sundowner CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sundowner_core::{SqliteContentStore, WeightConfig};
use sundowner_scorer::{FailurePolicy, RescoreOptions, RescoreSummary, rescore};

use crate::{
    ARG_DATABASE, ARG_DAY_OFFSET_WEIGHT, ARG_NOW, ARG_ON_ERROR, ARG_VOTE_WEIGHT,
    ARG_WEEK_OFFSET_WEIGHT, CliError, ENV_RESCORE_DATABASE, require_existing, write_json,
};

/// How the batch reacts when one item's score cannot be written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OnError {
    /// Stop at the first failed update.
    #[default]
    Abort,
    /// Log the failure and continue.
    Skip,
}

impl From<OnError> for FailurePolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Abort => Self::Abort,
            OnError::Skip => Self::Skip,
        }
    }
}

/// CLI arguments for the `rescore` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "rescore",
    long_about = "Recompute the score of every content item in a SQLite \
                 database and store it back on the item. All items are \
                 scored against a single evaluation instant captured when \
                 the command starts. Weights can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Recompute stored content scores"
)]
#[ortho_config(prefix = "SUNDOWNER")]
pub(crate) struct RescoreArgs {
    /// Path to the SQLite content database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Weight of the vote score (default 0.8).
    #[arg(long = ARG_VOTE_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) vote_weight: Option<f64>,
    /// Weight of the time-of-day score (default 0.3).
    #[arg(long = ARG_DAY_OFFSET_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) day_offset_weight: Option<f64>,
    /// Weight of the time-of-week score (default 0.1).
    #[arg(long = ARG_WEEK_OFFSET_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) week_offset_weight: Option<f64>,
    /// Evaluation instant in Unix seconds (defaults to the current time).
    #[arg(long = ARG_NOW, value_name = "seconds")]
    #[serde(default)]
    pub(crate) now: Option<i64>,
    /// Whether to abort or skip when an item's score cannot be written.
    #[arg(long = ARG_ON_ERROR, value_enum, value_name = "policy")]
    #[serde(default)]
    pub(crate) on_error: Option<OnError>,
}

impl RescoreArgs {
    pub(crate) fn into_config(self, started_at: i64) -> Result<RescoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RescoreConfig::resolve(merged, started_at)
    }
}

/// Resolved `rescore` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RescoreConfig {
    /// Path to the SQLite content database.
    pub(crate) database: Utf8PathBuf,
    /// Batch options shared by every item.
    pub(crate) options: RescoreOptions,
}

impl RescoreConfig {
    pub(crate) fn resolve(args: RescoreArgs, started_at: i64) -> Result<Self, CliError> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_RESCORE_DATABASE,
        })?;
        let defaults = WeightConfig::default();
        let weights = WeightConfig::new(
            args.vote_weight.unwrap_or(defaults.vote),
            args.day_offset_weight.unwrap_or(defaults.day_offset),
            args.week_offset_weight.unwrap_or(defaults.week_offset),
        )
        .validate()?;
        let now = args.now.unwrap_or(started_at);
        let options = RescoreOptions::new(now, weights)
            .with_failure_policy(args.on_error.unwrap_or_default().into());
        Ok(Self { database, options })
    }

    fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)
    }
}

pub(crate) fn run_rescore(
    args: RescoreArgs,
    started_at: i64,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config(started_at)?;
    let summary = execute_rescore(&config)?;
    write_json(writer, &summary)
}

pub(crate) fn execute_rescore(config: &RescoreConfig) -> Result<RescoreSummary, CliError> {
    config.validate_sources()?;
    let mut store = SqliteContentStore::open(config.database.as_std_path())?;
    Ok(rescore(&mut store, &config.options)?)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
    started_at: i64,
) -> Result<RescoreConfig, CliError> {
    let merged = RescoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RescoreConfig::resolve(merged, started_at)
}

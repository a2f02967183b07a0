//! Rank command implementation for the Sundowner CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Point;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sundowner_core::{
    ProximityQuery, RankedContent, SqliteContentStore,
    proximity::{DEFAULT_LIMIT, DEFAULT_QUERY_RADIUS_M},
    rank_by_proximity,
};

use crate::{
    ARG_DATABASE, ARG_LAT, ARG_LIMIT, ARG_LNG, ARG_RADIUS, CliError, ENV_RANK_DATABASE,
    ENV_RANK_LAT, ENV_RANK_LNG, require_existing, write_json,
};

const LNG_RANGE: (f64, f64) = (-180.0, 180.0);
const LAT_RANGE: (f64, f64) = (-90.0, 90.0);

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "rank",
    long_about = "Rank previously scored content by a blend of its stored \
                 score and its great-circle distance from a location. Items \
                 outside the radius or without a location are left out.",
    about = "Rank scored content near a location"
)]
#[ortho_config(prefix = "SUNDOWNER")]
pub(crate) struct RankArgs {
    /// Path to the SQLite content database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Target longitude in degrees.
    #[arg(long = ARG_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Target latitude in degrees.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Search radius in metres (default 2000).
    #[arg(long = ARG_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    /// Maximum number of items to print (default 10).
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankConfig {
    /// Path to the SQLite content database.
    pub(crate) database: Utf8PathBuf,
    /// Location to rank around.
    pub(crate) target: Point<f64>,
    /// Radius, limit and blend weights.
    pub(crate) query: ProximityQuery,
}

impl RankConfig {
    fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)
    }
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_RANK_DATABASE,
        })?;
        let lng = args.lng.ok_or(CliError::MissingArgument {
            field: ARG_LNG,
            env: ENV_RANK_LNG,
        })?;
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_RANK_LAT,
        })?;
        check_coordinate(ARG_LNG, lng, LNG_RANGE)?;
        check_coordinate(ARG_LAT, lat, LAT_RANGE)?;

        let radius_m = args.radius.unwrap_or(DEFAULT_QUERY_RADIUS_M);
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(CliError::InvalidRadius { value: radius_m });
        }

        Ok(Self {
            database,
            target: Point::new(lng, lat),
            query: ProximityQuery {
                radius_m,
                limit: args.limit.unwrap_or(DEFAULT_LIMIT),
                ..ProximityQuery::default()
            },
        })
    }
}

fn check_coordinate(field: &'static str, value: f64, range: (f64, f64)) -> Result<(), CliError> {
    let (min, max) = range;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CliError::CoordinateOutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

pub(crate) fn run_rank(args: RankArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let ranked = execute_rank(&config)?;
    write_json(writer, &ranked)
}

pub(crate) fn execute_rank(config: &RankConfig) -> Result<Vec<RankedContent>, CliError> {
    config.validate_sources()?;
    let store = SqliteContentStore::open(config.database.as_std_path())?;
    let scored = store.load_scored_content()?;
    let ranked = rank_by_proximity(config.target, &scored, &config.query);
    log::info!(
        "ranked {} of {} scored items within {} m",
        ranked.len(),
        scored.len(),
        config.query.radius_m
    );
    Ok(ranked)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}

//! Command-line interface for Sundowner's offline ranking tools.
#![forbid(unsafe_code)]

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use camino::Utf8Path;
use clap::{Parser, Subcommand, error::ErrorKind};
use serde::Serialize;

mod error;
mod logging;
mod rank;
mod rescore;

pub use error::CliError;

use rank::{RankArgs, run_rank};
use rescore::{RescoreArgs, run_rescore};

const ARG_DATABASE: &str = "database";
const ARG_VOTE_WEIGHT: &str = "vote-weight";
const ARG_DAY_OFFSET_WEIGHT: &str = "day-offset-weight";
const ARG_WEEK_OFFSET_WEIGHT: &str = "week-offset-weight";
const ARG_NOW: &str = "now";
const ARG_ON_ERROR: &str = "on-error";
const ARG_LNG: &str = "lng";
const ARG_LAT: &str = "lat";
const ARG_RADIUS: &str = "radius";
const ARG_LIMIT: &str = "limit";
const ENV_RESCORE_DATABASE: &str = "SUNDOWNER_CMDS_RESCORE_DATABASE";
const ENV_RANK_DATABASE: &str = "SUNDOWNER_CMDS_RANK_DATABASE";
const ENV_RANK_LNG: &str = "SUNDOWNER_CMDS_RANK_LNG";
const ENV_RANK_LAT: &str = "SUNDOWNER_CMDS_RANK_LAT";

/// Run the Sundowner CLI with the current process arguments and environment.
///
/// The evaluation instant for rescoring is read from the wall clock once,
/// before any command runs.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration, or the selected
/// command fails.
pub fn run() -> Result<(), CliError> {
    let started_at = wall_clock_seconds()?;
    let cli = parse_cli()?;
    logging::init_logging();
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Rescore(args) => run_rescore(args, started_at, &mut stdout),
        Command::Rank(args) => run_rank(args, &mut stdout),
    }
}

fn parse_cli() -> Result<Cli, CliError> {
    Cli::try_parse().or_else(|err| {
        if is_informational(&err) {
            err.exit()
        }
        Err(CliError::ArgumentParsing(err))
    })
}

/// Help and version requests arrive as clap errors but exit successfully.
fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

#[derive(Debug, Parser)]
#[command(
    name = "sundowner",
    about = "Offline ranking utilities for Sundowner content",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recompute and store the score of every content item.
    Rescore(RescoreArgs),
    /// Rank scored content by proximity to a location.
    Rank(RankArgs),
}

fn wall_clock_seconds() -> Result<i64, CliError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| CliError::Clock {
            reason: err.to_string(),
        })?;
    i64::try_from(elapsed.as_secs()).map_err(|err| CliError::Clock {
        reason: err.to_string(),
    })
}

/// Require `path` to name an existing regular file.
fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match is_regular_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Inspect `path` through its parent directory using capability-based IO.
fn is_regular_file(path: &Utf8Path) -> std::io::Result<bool> {
    use cap_std::{ambient_authority, fs_utf8::Dir};

    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Write `value` as pretty JSON followed by a newline.
fn write_json<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;

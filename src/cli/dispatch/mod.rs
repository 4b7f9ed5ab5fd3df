//! Maps validated command-line matches to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{ARG_CORS_ORIGIN, ARG_DSN, ARG_MAX_CONNECTIONS, ARG_PORT};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if a required argument is missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;
    let max_connections = matches
        .get_one::<u32>(ARG_MAX_CONNECTIONS)
        .copied()
        .unwrap_or(5);
    let cors_origin = matches
        .get_one::<String>(ARG_CORS_ORIGIN)
        .filter(|origin| !origin.trim().is_empty())
        .cloned();

    Ok(Action::Server(Args {
        port,
        dsn,
        max_connections,
        cors_origin,
    }))
}
